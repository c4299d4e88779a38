pub mod best_split;
pub mod min_time;

pub use best_split::{best_averages_for_windows, BestAverages, EngineKind, ReferenceEngine};
#[cfg(feature = "parallel")]
pub use best_split::ParallelEngine;
pub use min_time::min_times_per_distance;
