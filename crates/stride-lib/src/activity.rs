//! Channel-aware entry points over a loaded activity.
//!
//! Ingestion (GPX/TCX parsing, GPS distance) happens elsewhere; this module only needs
//! per-sample points carrying a timestamp and whichever channels were recorded.

use crate::{
    detectors::steps::{detect_intervals, IntervalDetectionParams, StepDetection},
    error::AnalysisError,
    metrics::{best_split::BestAverages, min_time::min_times_per_distance},
    series::{
        gaps::{fill_missing_indices, interpolate_null_values},
        resample::downsample,
    },
    signal::{
        DenseSeries, DiscrepancyPoint, DistanceSample, Indexed, Interval, MinTimeResult,
        TimeSeriesPoint, WindowResult,
    },
};
use serde::{Deserialize, Serialize};

/// One recorded sample of an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub seconds_since_start: f64,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(default)]
    pub cadence: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Metres from the start of the activity.
    #[serde(default)]
    pub cumulative_distance: Option<f64>,
}

impl Indexed for ActivityPoint {
    fn index(&self) -> f64 {
        self.seconds_since_start
    }
}

/// Physiological or mechanical signal recorded per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    HeartRate,
    Power,
    Cadence,
    Elevation,
    Time,
}

impl Channel {
    pub fn value(self, point: &ActivityPoint) -> Option<f64> {
        match self {
            Channel::HeartRate => point.heart_rate,
            Channel::Power => point.power,
            Channel::Cadence => point.cadence,
            Channel::Elevation => point.elevation,
            Channel::Time => Some(point.seconds_since_start),
        }
    }
}

/// Quantity a best-split curve can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMetric {
    HeartRate,
    Power,
    Cadence,
    Elevation,
    Time,
    /// Metres per second, derived from cumulative distance.
    Speed,
}

impl SplitMetric {
    pub fn channel(self) -> Option<Channel> {
        match self {
            SplitMetric::HeartRate => Some(Channel::HeartRate),
            SplitMetric::Power => Some(Channel::Power),
            SplitMetric::Cadence => Some(Channel::Cadence),
            SplitMetric::Elevation => Some(Channel::Elevation),
            SplitMetric::Time => Some(Channel::Time),
            SplitMetric::Speed => None,
        }
    }
}

/// An activity as recorded plus its one-sample-per-second dense form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub flat_points: Vec<ActivityPoint>,
    pub filled_points: DenseSeries<ActivityPoint>,
}

impl Activity {
    /// Rebase timestamps to the earliest point and build the dense series.
    pub fn from_points(mut points: Vec<ActivityPoint>) -> Self {
        let earliest = points
            .iter()
            .map(|p| p.seconds_since_start)
            .fold(f64::INFINITY, f64::min);
        if earliest.is_finite() {
            for point in &mut points {
                point.seconds_since_start -= earliest;
            }
        }
        let filled_points = fill_missing_indices(points.iter().cloned());
        Self {
            flat_points: points,
            filled_points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flat_points.is_empty()
    }

    /// Channel values per dense index, `None` where there was no point or no reading.
    pub fn channel_values(&self, channel: Channel) -> Vec<Option<f64>> {
        self.filled_points
            .iter()
            .map(|e| e.data.as_ref().and_then(|p| channel.value(p)))
            .collect()
    }

    /// Points that carry a cumulative distance, ordered by time.
    ///
    /// Fails when the distance ever goes backwards, which the fastest-time scan cannot use.
    pub fn distance_samples(&self) -> Result<Vec<DistanceSample>, AnalysisError> {
        let mut samples: Vec<DistanceSample> = self
            .flat_points
            .iter()
            .filter_map(|p| {
                p.cumulative_distance.map(|distance| DistanceSample {
                    time: p.seconds_since_start,
                    distance,
                })
            })
            .collect();
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(w) = samples.windows(2).find(|w| w[1].distance < w[0].distance) {
            return Err(AnalysisError::DecreasingDistance {
                time: w[1].time,
                from: w[0].distance,
                to: w[1].distance,
            });
        }
        Ok(samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    pub interpolate_null: bool,
    pub max_gap_for_interpolation: usize,
    /// Samples averaged into one output point.
    pub resolution: usize,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            interpolate_null: true,
            max_gap_for_interpolation: 3,
            resolution: 1,
        }
    }
}

/// Channel as plot points. With `filled`, `x` is the dense index and gaps are explicit;
/// otherwise `x` is the recorded time of each point.
pub fn time_series(activity: &Activity, channel: Channel, filled: bool) -> Vec<TimeSeriesPoint> {
    if filled {
        activity
            .filled_points
            .iter()
            .map(|e| TimeSeriesPoint {
                x: e.index as f64,
                y: e.data.as_ref().and_then(|p| channel.value(p)),
            })
            .collect()
    } else {
        activity
            .flat_points
            .iter()
            .map(|p| TimeSeriesPoint {
                x: p.seconds_since_start,
                y: channel.value(p),
            })
            .collect()
    }
}

/// Dense channel series with optional gap interpolation and downsampling.
pub fn processed_time_series(
    activity: &Activity,
    channel: Channel,
    options: &ProcessingOptions,
) -> Vec<TimeSeriesPoint> {
    let raw = time_series(activity, channel, true);
    let values: Vec<Option<f64>> = raw.iter().map(|p| p.y).collect();
    let values = if options.interpolate_null {
        interpolate_null_values(&values, options.max_gap_for_interpolation)
    } else {
        values
    };
    let interpolated: Vec<TimeSeriesPoint> = raw
        .iter()
        .zip(values)
        .map(|(p, y)| TimeSeriesPoint { x: p.x, y })
        .collect();
    downsample(&interpolated, options.resolution)
}

/// Per-second speed from cumulative distances.
///
/// Distances are interpolated first. Each sample's speed is the increase over the last
/// known distance, or zero when the distance is unknown or did not increase.
pub fn speeds_from_distances(distances: &[Option<f64>], max_gap: usize) -> Vec<f64> {
    let interpolated = interpolate_null_values(distances, max_gap);
    let mut speeds = vec![0.0; interpolated.len()];
    let mut previous = interpolated.first().copied().flatten().unwrap_or(0.0);
    for (i, distance) in interpolated.iter().enumerate().skip(1) {
        if let Some(distance) = *distance {
            let delta = distance - previous;
            if delta > 0.0 {
                speeds[i] = delta;
            }
            previous = distance;
        }
    }
    speeds
}

/// Dense, interpolated values a best-split curve is computed over.
pub fn split_values(activity: &Activity, metric: SplitMetric, max_gap: usize) -> Vec<Option<f64>> {
    match metric.channel() {
        Some(channel) => interpolate_null_values(&activity.channel_values(channel), max_gap),
        None => {
            let distances: Vec<Option<f64>> = activity
                .filled_points
                .iter()
                .map(|e| e.data.as_ref().and_then(|p| p.cumulative_distance))
                .collect();
            speeds_from_distances(&distances, max_gap)
                .into_iter()
                .map(Some)
                .collect()
        }
    }
}

/// Best average of `metric` for every window length (in seconds).
pub fn best_splits_vs_time(
    activity: &Activity,
    metric: SplitMetric,
    windows: &[usize],
    max_gap: usize,
    engine: &dyn BestAverages,
) -> Vec<WindowResult> {
    let values = split_values(activity, metric, max_gap);
    engine.best_averages_for_windows(&values, windows)
}

/// Fastest time over each target distance (metres).
pub fn min_times_for_activity(
    activity: &Activity,
    distances: &[f64],
) -> Result<Vec<MinTimeResult>, AnalysisError> {
    Ok(min_times_per_distance(&activity.distance_samples()?, distances))
}

/// Step detection over an activity's power channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalDetectionResult {
    pub intervals: Vec<Interval>,
    pub raw_input: Vec<TimeSeriesPoint>,
    pub smoothed_input: Vec<TimeSeriesPoint>,
    pub discrepancy_curve: Vec<DiscrepancyPoint>,
    pub detected_steps: Vec<usize>,
    /// Steps that survived minimum-duration filtering and start a new interval.
    pub boundaries: Vec<usize>,
}

/// Detect workout steps in the power channel. Gaps of up to three seconds are
/// interpolated; longer gaps count as zero power.
pub fn perform_interval_detection(
    activity: &Activity,
    params: &IntervalDetectionParams,
) -> IntervalDetectionResult {
    let raw_input = processed_time_series(activity, Channel::Power, &ProcessingOptions::default());
    let intensity: Vec<f64> = raw_input.iter().map(|p| p.y.unwrap_or(0.0)).collect();
    let StepDetection {
        smoothed,
        discrepancy_curve,
        detected_steps,
        boundaries,
        intervals,
    } = detect_intervals(&intensity, params);
    let smoothed_input = raw_input
        .iter()
        .zip(smoothed)
        .map(|(p, y)| TimeSeriesPoint { x: p.x, y: Some(y) })
        .collect();
    IntervalDetectionResult {
        intervals,
        raw_input,
        smoothed_input,
        discrepancy_curve,
        detected_steps,
        boundaries,
    }
}
