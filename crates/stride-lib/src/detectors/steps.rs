//! Step detection: find sustained changes of intensity and cut the series into intervals.
//!
//! The pipeline is smoothing → discrepancy curve → peak picking on `|delta|` →
//! minimum-duration filtering → segmentation.

use crate::{
    detectors::peaks::{find_peaks_and_troughs, Extremum},
    error::AnalysisError,
    series::smoothing::{moving_average, moving_average_by},
    signal::{DiscrepancyPoint, Interval},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Tunables for the step detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalDetectionParams {
    /// Shortest interval kept, in samples; closer step boundaries are dropped.
    pub min_interval_duration: usize,
    /// Moving-average radius applied to the input before differencing.
    pub input_smoothing_radius: usize,
    /// Moving-average radius applied to the discrepancy curve.
    pub discrepancy_smoothing_radius: usize,
    /// Number of samples summed on each side of a candidate step.
    pub window_radius: usize,
    /// `|delta|` at or below this is not a step.
    pub step_threshold: f64,
}

impl Default for IntervalDetectionParams {
    fn default() -> Self {
        Self {
            min_interval_duration: 10,
            input_smoothing_radius: 1,
            discrepancy_smoothing_radius: 1,
            window_radius: 10,
            step_threshold: 0.1,
        }
    }
}

impl IntervalDetectionParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_radius == 0 {
            return Err(AnalysisError::invalid("window_radius", "must be at least 1"));
        }
        if !self.step_threshold.is_finite() || self.step_threshold < 0.0 {
            return Err(AnalysisError::invalid(
                "step_threshold",
                format!("must be a finite, non-negative number, got {}", self.step_threshold),
            ));
        }
        Ok(())
    }
}

/// Everything the step detector derived from one intensity series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDetection {
    pub smoothed: Vec<f64>,
    pub discrepancy_curve: Vec<DiscrepancyPoint>,
    /// Sample indices where a step was detected, before minimum-duration filtering.
    pub detected_steps: Vec<usize>,
    /// Steps kept after minimum-duration filtering; `intervals` are cut at these indices.
    pub boundaries: Vec<usize>,
    pub intervals: Vec<Interval>,
}

/// Run the full step detector over a gap-free intensity series.
pub fn detect_intervals(intensity: &[f64], params: &IntervalDetectionParams) -> StepDetection {
    debug_assert!(params.validate().is_ok());
    debug!(
        "interval detection: {} samples, window radius {}, threshold {}",
        intensity.len(),
        params.window_radius,
        params.step_threshold
    );
    let smoothed = moving_average(intensity, params.input_smoothing_radius);
    let curve = discrepancy_curve(
        &smoothed,
        params.window_radius,
        params.discrepancy_smoothing_radius,
    );
    let steps = detected_steps(&curve, params.step_threshold);
    let boundaries = enforce_min_duration(&steps, smoothed.len(), params.min_interval_duration);
    let intervals = segment_intervals(&smoothed, &boundaries);
    debug!(
        "interval detection: {} steps, {} intervals",
        steps.len(),
        intervals.len()
    );
    StepDetection {
        smoothed,
        discrepancy_curve: curve,
        detected_steps: steps,
        boundaries,
        intervals,
    }
}

/// Signed, normalized difference between the `window_radius` samples after and before
/// every index in `[window_radius, len - window_radius)`, smoothed afterwards.
///
/// Positive deltas mark rising intensity, negative ones falling intensity.
pub fn discrepancy_curve(
    intensity: &[f64],
    window_radius: usize,
    smoothing_radius: usize,
) -> Vec<DiscrepancyPoint> {
    debug_assert!(window_radius > 0, "window radius must be positive");
    if window_radius == 0 || intensity.len() < 2 * window_radius {
        return Vec::new();
    }
    let multiplier = 1.0 / window_radius as f64;
    let curve: Vec<DiscrepancyPoint> = (window_radius..intensity.len() - window_radius)
        .map(|t| {
            let before: f64 = intensity[t - window_radius..t].iter().sum();
            let after: f64 = intensity[t..t + window_radius].iter().sum();
            DiscrepancyPoint {
                t,
                delta: (after - before) * multiplier,
            }
        })
        .collect();
    moving_average_by(&curve, smoothing_radius, |p| p.delta, |p, v| p.delta = v)
}

/// Sample indices of discrepancy peaks whose magnitude exceeds `threshold`.
pub fn detected_steps(curve: &[DiscrepancyPoint], threshold: f64) -> Vec<usize> {
    let magnitudes: Vec<f64> = curve
        .iter()
        .map(|p| p.delta.abs())
        .map(|d| if d > threshold { d } else { 0.0 })
        .collect();
    find_peaks_and_troughs(&magnitudes)
        .into_iter()
        .zip(curve)
        .filter(|(class, _)| *class == Some(Extremum::Peak))
        .map(|(_, point)| point.t)
        .collect()
}

/// Drop step boundaries that would create an interval shorter than `min_duration`.
///
/// Boundaries are taken in order, each measured from the last kept one. If the tail from
/// the last kept boundary to `len` is too short, that boundary is dropped so the tail
/// joins the previous interval.
pub fn enforce_min_duration(boundaries: &[usize], len: usize, min_duration: usize) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(boundaries.len());
    let mut previous = 0usize;
    for &b in boundaries {
        if b <= previous || b >= len {
            continue;
        }
        if b - previous >= min_duration {
            kept.push(b);
            previous = b;
        }
    }
    if len - previous < min_duration {
        kept.pop();
    }
    kept
}

/// Cut `intensity` at `boundaries` into contiguous intervals covering the whole series.
///
/// The series start and end are implicit boundaries; boundaries outside `(0, len)` or
/// not strictly increasing are ignored. Durations always sum to `intensity.len()`.
pub fn segment_intervals(intensity: &[f64], boundaries: &[usize]) -> Vec<Interval> {
    let len = intensity.len();
    if len == 0 {
        return Vec::new();
    }
    let mut cuts = Vec::with_capacity(boundaries.len() + 2);
    cuts.push(0usize);
    for &b in boundaries {
        if b > *cuts.last().unwrap_or(&0) && b < len {
            cuts.push(b);
        }
    }
    cuts.push(len);

    cuts.windows(2)
        .map(|w| {
            let segment = &intensity[w[0]..w[1]];
            Interval {
                duration_seconds: segment.len(),
                average: segment.iter().sum::<f64>() / segment.len() as f64,
            }
        })
        .collect()
}
