use crate::signal::{DenseEntry, DenseSeries, Indexed};

/// Convert an ordered, irregularly indexed record list into a dense unit-step series.
///
/// Indices are floored. Missing integers between consecutive records become placeholder
/// entries without data. A record whose floored index does not advance past the last
/// emitted index (a duplicate or an out-of-order sample) is dropped.
pub fn fill_missing_indices<T, I>(records: I) -> DenseSeries<T>
where
    T: Indexed,
    I: IntoIterator<Item = T>,
{
    let mut dense = Vec::new();
    let mut last_index: Option<i64> = None;

    for record in records {
        let index = record.index().floor() as i64;
        match last_index {
            None => {}
            Some(last) if index > last => {
                dense.extend((last + 1..index).map(|missing| DenseEntry {
                    index: missing,
                    data: None,
                }));
            }
            Some(_) => continue,
        }
        dense.push(DenseEntry {
            index,
            data: Some(record),
        });
        last_index = Some(index);
    }

    debug_assert!(dense.windows(2).all(|w| w[1].index == w[0].index + 1));
    dense
}

/// Linearly interpolate runs of `None` no longer than `max_gap` index steps.
///
/// A run is filled only when both of its ends are known and the distance between those
/// ends is at most `max_gap`; leading and trailing runs are left untouched.
pub fn interpolate_null_values(values: &[Option<f64>], max_gap: usize) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let mut last_non_null: Option<(usize, f64)> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(y1) = *value else {
            continue;
        };
        if let Some((x0, y0)) = last_non_null {
            let gap = i - x0;
            if gap > 1 && gap <= max_gap {
                let slope = (y1 - y0) / gap as f64;
                for (x, slot) in out.iter_mut().enumerate().take(i).skip(x0 + 1) {
                    *slot = Some(y0 + slope * (x - x0) as f64);
                }
            }
        }
        last_non_null = Some((i, y1));
    }
    out
}
