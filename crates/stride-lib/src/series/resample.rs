use crate::signal::TimeSeriesPoint;

/// Average consecutive buckets of `resolution` points into one point each.
///
/// A bucket's `y` is the sum of its known values divided by the bucket length, so gaps
/// pull the average down. A bucket with no known value stays a gap. `x` is taken from
/// the first point of the bucket. `resolution <= 1` returns the input unchanged.
pub fn downsample(points: &[TimeSeriesPoint], resolution: usize) -> Vec<TimeSeriesPoint> {
    if resolution <= 1 {
        return points.to_vec();
    }
    points
        .chunks(resolution)
        .map(|bucket| {
            let sum = bucket
                .iter()
                .filter_map(|p| p.y)
                .fold(None, |acc: Option<f64>, y| Some(acc.unwrap_or(0.0) + y));
            TimeSeriesPoint {
                x: bucket[0].x,
                y: sum.map(|s| s / bucket.len() as f64),
            }
        })
        .collect()
}
