use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Peak,
    Trough,
}

/// Classify every sample as a peak, a trough or neither.
///
/// A peak ends a strictly increasing run and is followed by a value that does not rise;
/// a trough ends a strictly decreasing run and is followed by a value that does not fall.
/// The first and last samples have no neighbour on one side and are never classified.
pub fn find_peaks_and_troughs(values: &[f64]) -> Vec<Option<Extremum>> {
    let mut out = vec![None; values.len()];
    if values.len() < 3 {
        return out;
    }
    for i in 1..values.len() - 1 {
        let (prev, cur, next) = (values[i - 1], values[i], values[i + 1]);
        out[i] = if cur > prev && next <= cur {
            Some(Extremum::Peak)
        } else if cur < prev && next >= cur {
            Some(Extremum::Trough)
        } else {
            None
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use Extremum::{Peak, Trough};

    #[test]
    fn flat() {
        assert_eq!(find_peaks_and_troughs(&[1.0; 5]), vec![None; 5]);
    }

    #[test]
    fn increasing_then_flat_has_one_peak() {
        let result = find_peaks_and_troughs(&[1.0, 2.0, 3.0, 3.0, 3.0]);
        assert_eq!(result, vec![None, None, Some(Peak), None, None]);
    }

    #[test]
    fn start_high() {
        let result = find_peaks_and_troughs(&[5.0, 5.0, 4.0, 3.0, 2.0, 3.0]);
        assert_eq!(result, vec![None, None, None, None, Some(Trough), None]);
    }

    #[test]
    fn start_low() {
        let result = find_peaks_and_troughs(&[2.0, 2.0, 3.0, 4.0, 3.0, 4.0]);
        assert_eq!(
            result,
            vec![None, None, None, Some(Peak), Some(Trough), None]
        );
    }

    #[test]
    fn staircase_marks_each_step_top() {
        let result = find_peaks_and_troughs(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 2.0, 1.0]);
        assert_eq!(
            result,
            vec![None, None, Some(Peak), None, Some(Peak), None, None, None]
        );
    }

    #[test]
    fn thresholded_bumps() {
        let result = find_peaks_and_troughs(&[0.0, 0.0, 0.4, 0.9, 0.5, 0.0, 0.0, 0.7, 0.0]);
        let peaks: Vec<usize> = result
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == Some(Peak))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(peaks, vec![3, 7]);
    }

    #[test]
    fn short_input() {
        assert!(find_peaks_and_troughs(&[]).is_empty());
        assert_eq!(find_peaks_and_troughs(&[1.0, 2.0]), vec![None, None]);
    }
}
