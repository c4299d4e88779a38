use crate::signal::{BestTime, DistanceSample, MinTimeResult};
use log::debug;

/// Shortest elapsed time in which each target distance was covered, from any start point.
///
/// `samples` must be non-decreasing in both time and distance. Results are ordered
/// ascending by target distance; a target never reached has `best: None`.
///
/// Every start point is scanned forward until the largest target is covered, so the cost
/// is quadratic in the worst case.
pub fn min_times_per_distance(samples: &[DistanceSample], targets: &[f64]) -> Vec<MinTimeResult> {
    debug_assert!(samples
        .windows(2)
        .all(|w| w[1].time >= w[0].time && w[1].distance >= w[0].distance));

    let mut sorted = targets.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut results: Vec<MinTimeResult> = sorted
        .iter()
        .map(|&distance| MinTimeResult {
            distance,
            best: None,
        })
        .collect();
    if results.is_empty() {
        return results;
    }
    debug!(
        "min times: {} samples, {} targets",
        samples.len(),
        results.len()
    );

    for (i, start) in samples.iter().enumerate() {
        // Index of the smallest target not yet covered from this start.
        let mut pending = 0usize;
        for end in &samples[i..] {
            let delta_distance = end.distance - start.distance;
            let delta_time = end.time - start.time;
            while pending < results.len() && delta_distance >= results[pending].distance {
                let result = &mut results[pending];
                if result.best.map_or(true, |b| delta_time < b.time) {
                    result.best = Some(BestTime {
                        start_time: start.time,
                        time: delta_time,
                    });
                }
                pending += 1;
            }
            if pending == results.len() {
                break;
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(points: &[(f64, f64)]) -> Vec<DistanceSample> {
        points
            .iter()
            .map(|&(time, distance)| DistanceSample { time, distance })
            .collect()
    }

    #[test]
    fn finds_fastest_segment() {
        // 10 m/s for 10 s, then 20 m/s for 10 s.
        let mut points = Vec::new();
        for t in 0..=10 {
            points.push((t as f64, t as f64 * 10.0));
        }
        for t in 11..=20 {
            points.push((t as f64, 100.0 + (t - 10) as f64 * 20.0));
        }
        let samples = track(&points);
        let results = min_times_per_distance(&samples, &[200.0, 40.0]);
        assert_eq!(results[0].distance, 40.0);
        assert_eq!(
            results[0].best,
            Some(BestTime {
                start_time: 10.0,
                time: 2.0
            })
        );
        assert_eq!(results[1].distance, 200.0);
        assert_eq!(
            results[1].best,
            Some(BestTime {
                start_time: 10.0,
                time: 10.0
            })
        );
    }

    #[test]
    fn unreachable_distance_has_no_best() {
        let samples = track(&[(0.0, 0.0), (1.0, 5.0), (2.0, 10.0)]);
        let results = min_times_per_distance(&samples, &[10.0, 50.0]);
        assert_eq!(results[0].best.map(|b| b.time), Some(2.0));
        assert!(results[1].best.is_none());
    }

    #[test]
    fn zero_distance_start_is_considered() {
        let samples = track(&[(0.0, 0.0), (1.0, 100.0), (5.0, 110.0)]);
        let results = min_times_per_distance(&samples, &[100.0]);
        assert_eq!(
            results[0].best,
            Some(BestTime {
                start_time: 0.0,
                time: 1.0
            })
        );
    }

    #[test]
    fn overshooting_sample_counts_for_every_smaller_target() {
        let samples = track(&[(0.0, 0.0), (3.0, 500.0)]);
        let results = min_times_per_distance(&samples, &[100.0, 400.0, 100.0]);
        let distances: Vec<f64> = results.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![100.0, 100.0, 400.0]);
        assert!(results.iter().all(|r| r.best.map(|b| b.time) == Some(3.0)));
    }

    #[test]
    fn empty_inputs() {
        assert!(min_times_per_distance(&[], &[]).is_empty());
        let results = min_times_per_distance(&[], &[100.0]);
        assert_eq!(results.len(), 1);
        assert!(results[0].best.is_none());
    }
}
