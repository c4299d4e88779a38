pub mod gaps;
pub mod resample;
pub mod smoothing;

pub use gaps::{fill_missing_indices, interpolate_null_values};
pub use resample::downsample;
pub use smoothing::{moving_average, moving_average_by};
