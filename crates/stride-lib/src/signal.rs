use serde::{Deserialize, Serialize};

/// Anything that sits at a (possibly fractional) position on a unit-spaced axis.
pub trait Indexed {
    fn index(&self) -> f64;
}

/// One unit-spaced observation; `None` means no data at this index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub index: i64,
    pub value: Option<f64>,
}

impl Indexed for Sample {
    fn index(&self) -> f64 {
        self.index as f64
    }
}

/// Slot of a dense series. Placeholders synthesized for missing indices carry no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseEntry<T> {
    pub index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> DenseEntry<T> {
    pub fn is_gap(&self) -> bool {
        self.data.is_none()
    }
}

/// Consecutive integer indices, one entry per index from the first to the last observation.
pub type DenseSeries<T> = Vec<DenseEntry<T>>;

/// Plottable point; `y` is `None` where the plot should show a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub x: f64,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestAverage {
    pub start_index: usize,
    pub average: f64,
}

/// Best split for one window length. `distance` is the requested length, echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    pub distance: usize,
    pub best: Option<BestAverage>,
}

/// One `(elapsed time, cumulative distance)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    pub time: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestTime {
    pub start_time: f64,
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinTimeResult {
    pub distance: f64,
    pub best: Option<BestTime>,
}

/// Step indicator at sample `t`: (sum after - sum before) / window radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancyPoint {
    pub t: usize,
    pub delta: f64,
}

/// Contiguous segment of an activity with a single representative intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub duration_seconds: usize,
    pub average: f64,
}

impl Interval {
    /// Average expressed as a percentage of functional threshold power.
    pub fn intensity_percent(&self, ftp: f64) -> f64 {
        if ftp > 0.0 {
            self.average / ftp * 100.0
        } else {
            0.0
        }
    }
}
