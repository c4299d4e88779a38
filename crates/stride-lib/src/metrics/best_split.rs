//! Best splits: the highest average of a signal over every requested window length.
//!
//! Gaps (`None`) are summed as zero, so a window spanning missing data scores lower
//! rather than being skipped. Two engines are provided behind [`BestAverages`]; both
//! share the same window kernel and produce bit-identical results.

use crate::signal::{BestAverage, WindowResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Strategy for computing best splits over a set of window lengths.
pub trait BestAverages: Send + Sync {
    /// One result per entry of `windows`, ordered ascending by window length.
    fn best_averages_for_windows(
        &self,
        values: &[Option<f64>],
        windows: &[usize],
    ) -> Vec<WindowResult>;
}

/// Single-threaded engine, O(n) per window length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEngine;

impl BestAverages for ReferenceEngine {
    fn best_averages_for_windows(
        &self,
        values: &[Option<f64>],
        windows: &[usize],
    ) -> Vec<WindowResult> {
        let sorted = sorted_windows(windows);
        let prefix = prefix_sums(values);
        debug!(
            "best averages: {} samples, {} windows (reference)",
            values.len(),
            sorted.len()
        );
        sorted
            .into_iter()
            .map(|distance| WindowResult {
                distance,
                best: best_window(values, &prefix, distance),
            })
            .collect()
    }
}

/// Engine that spreads window lengths across the rayon thread pool.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelEngine;

#[cfg(feature = "parallel")]
impl BestAverages for ParallelEngine {
    fn best_averages_for_windows(
        &self,
        values: &[Option<f64>],
        windows: &[usize],
    ) -> Vec<WindowResult> {
        use rayon::prelude::*;

        let sorted = sorted_windows(windows);
        let prefix = prefix_sums(values);
        debug!(
            "best averages: {} samples, {} windows (parallel)",
            values.len(),
            sorted.len()
        );
        sorted
            .par_iter()
            .map(|&distance| WindowResult {
                distance,
                best: best_window(values, &prefix, distance),
            })
            .collect()
    }
}

/// Engine selection made by the caller, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Reference,
    Parallel,
}

static REFERENCE: ReferenceEngine = ReferenceEngine;
#[cfg(feature = "parallel")]
static PARALLEL: ParallelEngine = ParallelEngine;

impl EngineKind {
    /// Resolve to an engine; `Parallel` falls back to the reference engine when the
    /// `parallel` feature is not compiled in.
    pub fn engine(self) -> &'static dyn BestAverages {
        match self {
            EngineKind::Reference => &REFERENCE,
            #[cfg(feature = "parallel")]
            EngineKind::Parallel => &PARALLEL,
            #[cfg(not(feature = "parallel"))]
            EngineKind::Parallel => {
                log::warn!("parallel engine not compiled in, using reference engine");
                &REFERENCE
            }
        }
    }
}

/// Best splits with the reference engine.
pub fn best_averages_for_windows(values: &[Option<f64>], windows: &[usize]) -> Vec<WindowResult> {
    ReferenceEngine.best_averages_for_windows(values, windows)
}

fn sorted_windows(windows: &[usize]) -> Vec<usize> {
    let mut sorted = windows.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Compensated running sums of the series with gaps as zero.
struct PrefixSums {
    sums: Vec<f64>,
    /// Window sums closer than this are indistinguishable after rounding.
    tolerance: f64,
}

fn prefix_sums(values: &[Option<f64>]) -> PrefixSums {
    let mut sums = Vec::with_capacity(values.len() + 1);
    let (mut acc, mut comp) = (0.0f64, 0.0f64);
    let mut scale = 0.0f64;
    sums.push(0.0);
    for value in values {
        let v = value.unwrap_or(0.0);
        let t = acc + v;
        comp += if acc.abs() >= v.abs() {
            (acc - t) + v
        } else {
            (v - t) + acc
        };
        acc = t;
        let total = acc + comp;
        scale = scale.max(total.abs());
        sums.push(total);
    }
    PrefixSums {
        sums,
        tolerance: 8.0 * f64::EPSILON * scale,
    }
}

/// Neumaier sum of one window, used for the reported average.
fn window_sum(values: &[Option<f64>]) -> f64 {
    let (mut acc, mut comp) = (0.0f64, 0.0f64);
    for v in values.iter().map(|v| v.unwrap_or(0.0)) {
        let t = acc + v;
        comp += if acc.abs() >= v.abs() {
            (acc - t) + v
        } else {
            (v - t) + acc
        };
        acc = t;
    }
    acc + comp
}

/// Earliest start with the maximal window sum, or `None` when the window does not fit.
///
/// Sums within rounding tolerance of the current best count as ties, so the earliest
/// start is kept even when equal windows differ in the last bits.
fn best_window(values: &[Option<f64>], prefix: &PrefixSums, window: usize) -> Option<BestAverage> {
    let n = values.len();
    if window == 0 || window > n {
        return None;
    }
    let sums = &prefix.sums;
    let mut best_index = 0usize;
    let mut best_sum = sums[window] - sums[0];
    for start in 1..=n - window {
        let sum = sums[start + window] - sums[start];
        if sum - best_sum > prefix.tolerance {
            best_sum = sum;
            best_index = start;
        }
    }
    Some(BestAverage {
        start_index: best_index,
        average: window_sum(&values[best_index..best_index + window]) / window as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn all_equal_input_prefers_earliest_start() {
        let input = some(&[1.0; 6]);
        let windows = [1, 2, 3, 4, 5];
        let result = best_averages_for_windows(&input, &windows);
        assert_eq!(result.len(), windows.len());
        for (r, w) in result.iter().zip(windows) {
            assert_eq!(r.distance, w);
            let best = r.best.expect("window fits");
            assert_eq!(best.start_index, 0);
            assert_eq!(best.average, 1.0);
        }
    }

    #[test]
    fn fractional_uniform_input_prefers_earliest_start() {
        for v in [0.1, 0.3, 0.7, 123.456] {
            let input = vec![Some(v); 200];
            for r in best_averages_for_windows(&input, &[3, 7, 10, 30]) {
                let best = r.best.expect("window fits");
                assert_eq!(best.start_index, 0, "value {} window {}", v, r.distance);
                assert!((best.average - v).abs() < 1e-12, "value {} window {}", v, r.distance);
            }
        }
    }

    #[test]
    fn small_real_differences_still_win() {
        let mut input = vec![Some(250.1); 50];
        input[30] = Some(250.2);
        let result = best_averages_for_windows(&input, &[1, 5]);
        assert_eq!(result[0].best.map(|b| b.start_index), Some(30));
        assert_eq!(result[1].best.map(|b| b.start_index), Some(26));
    }

    #[test]
    fn windows_longer_than_data_have_no_best() {
        let input = some(&[1.0; 6]);
        let result = best_averages_for_windows(&input, &[5, 10, 15]);
        assert_eq!(
            result[0].best,
            Some(BestAverage {
                start_index: 0,
                average: 1.0
            })
        );
        assert_eq!(result[1].distance, 10);
        assert!(result[1].best.is_none());
        assert_eq!(result[2].distance, 15);
        assert!(result[2].best.is_none());
    }

    #[test]
    fn simple_interval() {
        let input = some(&[1.0, 1.0, 5.0, 5.0, 1.0, 1.0, 5.0, 5.0]);
        let result = best_averages_for_windows(&input, &[1, 2, 3, 4, 5, 6]);
        let expected = [
            (2, 5.0),
            (2, 5.0),
            (1, 11.0 / 3.0),
            (0, 3.0),
            (2, 17.0 / 5.0),
            (2, 22.0 / 6.0),
        ];
        for (r, (start, average)) in result.iter().zip(expected) {
            let best = r.best.expect("window fits");
            assert_eq!(best.start_index, start, "window {}", r.distance);
            assert_eq!(best.average, average, "window {}", r.distance);
        }
    }

    #[test]
    fn results_are_sorted_and_keep_duplicates() {
        let input = some(&[3.0, 1.0, 2.0]);
        let result = best_averages_for_windows(&input, &[3, 1, 3, 2]);
        let distances: Vec<usize> = result.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![1, 2, 3, 3]);
        assert_eq!(result[2], result[3]);
    }

    #[test]
    fn gaps_count_as_zero() {
        let input = vec![Some(4.0), None, Some(4.0), Some(4.0)];
        let result = best_averages_for_windows(&input, &[2, 3]);
        assert_eq!(result[0].best.map(|b| b.start_index), Some(2));
        let three = result[1].best.expect("window fits");
        assert_eq!(three.start_index, 0);
        assert!((three.average - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_and_zero_window() {
        let result = best_averages_for_windows(&[], &[1, 2]);
        assert!(result.iter().all(|r| r.best.is_none()));
        assert!(best_averages_for_windows(&some(&[1.0]), &[0])[0].best.is_none());
        assert!(best_averages_for_windows(&some(&[1.0]), &[]).is_empty());
    }

    #[test]
    fn engine_kind_resolves() {
        let input = some(&[1.0, 2.0, 3.0]);
        for kind in [EngineKind::Reference, EngineKind::Parallel] {
            let result = kind.engine().best_averages_for_windows(&input, &[2]);
            assert_eq!(result[0].best.map(|b| b.start_index), Some(1));
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_engine_matches_reference_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cases: Vec<Vec<Option<f64>>> = vec![
            Vec::new(),
            vec![None; 5],
            some(&[0.0; 10]),
            some(&[1.0, 1.0, 5.0, 5.0, 1.0, 1.0, 5.0, 5.0]),
        ];
        for _ in 0..40 {
            let len = rng.gen_range(1..400);
            let series = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.1) {
                        None
                    } else {
                        Some(rng.gen_range(0.0..600.0))
                    }
                })
                .collect();
            cases.push(series);
        }
        let windows = [1, 2, 3, 5, 10, 30, 60, 120, 399, 400, 1000, 7, 7];
        for values in &cases {
            let reference = ReferenceEngine.best_averages_for_windows(values, &windows);
            let parallel = ParallelEngine.best_averages_for_windows(values, &windows);
            assert_eq!(reference.len(), parallel.len());
            for (r, p) in reference.iter().zip(&parallel) {
                assert_eq!(r.distance, p.distance);
                assert_eq!(r.best.map(|b| b.start_index), p.best.map(|b| b.start_index));
                assert_eq!(
                    r.best.map(|b| b.average.to_bits()),
                    p.best.map(|b| b.average.to_bits())
                );
            }
        }
    }

    #[test]
    fn matches_brute_force_on_random_series() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..25 {
            let len = rng.gen_range(1..60);
            let values: Vec<Option<f64>> = (0..len)
                .map(|_| Some(rng.gen_range(0..20) as f64))
                .collect();
            for window in 1..=len {
                let result = best_averages_for_windows(&values, &[window]);
                let best = result[0].best.expect("window fits");
                let mut expected = (0usize, f64::MIN);
                for start in 0..=len - window {
                    let sum: f64 = values[start..start + window]
                        .iter()
                        .map(|v| v.unwrap_or(0.0))
                        .sum();
                    if sum > expected.1 {
                        expected = (start, sum);
                    }
                }
                assert_eq!(best.start_index, expected.0);
                assert_eq!(best.average, expected.1 / window as f64);
            }
        }
    }
}
