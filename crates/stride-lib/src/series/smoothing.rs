/// Centered moving average over `[i - radius, i + radius]`, clamped to the slice bounds.
///
/// The window shrinks near the ends instead of padding. `radius == 0` returns the input.
pub fn moving_average(data: &[f64], radius: usize) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    if radius == 0 {
        return data.to_vec();
    }
    let n = data.len();
    let mut out = Vec::with_capacity(n);
    let mut acc: f64 = data[..(radius + 1).min(n)].iter().sum();
    let mut lo = 0usize;
    let mut hi = radius.min(n - 1);
    for i in 0..n {
        let want_lo = i.saturating_sub(radius);
        let want_hi = (i + radius).min(n - 1);
        while hi < want_hi {
            hi += 1;
            acc += data[hi];
        }
        while lo < want_lo {
            acc -= data[lo];
            lo += 1;
        }
        out.push(acc / (hi - lo + 1) as f64);
    }
    out
}

/// Moving average of a numeric field projected out of each record.
///
/// Records are cloned and the smoothed value written back through `set`.
pub fn moving_average_by<T, K, S>(items: &[T], radius: usize, key: K, set: S) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> f64,
    S: Fn(&mut T, f64),
{
    let values: Vec<f64> = items.iter().map(&key).collect();
    let smoothed = moving_average(&values, radius);
    items
        .iter()
        .zip(smoothed)
        .map(|(item, value)| {
            let mut item = item.clone();
            set(&mut item, value);
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::TimeSeriesPoint;

    fn assert_all_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn zero_radius_is_identity() {
        let data = [0.1, 0.2, 0.7, 1.3];
        assert_eq!(moving_average(&data, 0), data.to_vec());
    }

    #[test]
    fn window_shrinks_at_edges() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_all_close(&moving_average(&data, 1), &[1.5, 2.0, 3.0, 4.0, 4.5]);
        assert_all_close(&moving_average(&data, 2), &[2.0, 2.5, 3.0, 3.5, 4.0]);
    }

    #[test]
    fn radius_larger_than_series_averages_everything() {
        let data = [2.0, 4.0, 6.0];
        assert_all_close(&moving_average(&data, 10), &[4.0, 4.0, 4.0]);
    }

    #[test]
    fn empty_input() {
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn smooths_projected_field() {
        let points: Vec<TimeSeriesPoint> = [0.0, 3.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, y)| TimeSeriesPoint {
                x: i as f64,
                y: Some(*y),
            })
            .collect();
        let smoothed = moving_average_by(
            &points,
            1,
            |p| p.y.unwrap_or(0.0),
            |p, v| p.y = Some(v),
        );
        let xs: Vec<f64> = smoothed.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = smoothed.iter().filter_map(|p| p.y).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert_all_close(&ys, &[1.5, 1.0, 1.5]);
    }
}
