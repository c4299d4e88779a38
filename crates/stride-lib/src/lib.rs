pub mod activity;
pub mod config;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod series;
pub mod signal;

pub use activity::*;
pub use detectors::*;
pub use error::AnalysisError;
pub use metrics::*;
pub use series::*;
pub use signal::*;
