pub mod peaks;
pub mod steps;

pub use peaks::{find_peaks_and_troughs, Extremum};
pub use steps::{
    detect_intervals, detected_steps, discrepancy_curve, enforce_min_duration, segment_intervals,
    IntervalDetectionParams, StepDetection,
};
