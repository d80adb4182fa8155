//! Quartile calculation without any statistics library.

use serde::Serialize;

use super::sort::sort_values;

/// The three quartiles of a numeric sample, with `q1 <= q2 <= q3`.
///
/// An empty sample produces the all-zero triple rather than an error.
/// Callers needing statistical weight behind the numbers gate on sample
/// size themselves (see [`crate::analytics::outliers`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Median of an ascending-sorted slice.
///
/// Empty input yields 0. Odd lengths take the single middle element; even
/// lengths average the two middle elements.
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }

    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Computes Q1, Q2, and Q3 of an unsorted sample.
///
/// The sample is sorted ascending, Q2 is the median of the whole, and the
/// halves are split at index n/2: the lower half is everything before the
/// split; the upper half excludes the middle element for odd lengths and
/// starts at the split for even lengths. A half that comes up empty falls
/// back to the sample's extreme value. The exact split determines which
/// elements count toward Q1/Q3 for small samples, so it must not be
/// approximated with an interpolating percentile.
pub fn quartiles(sample: &[f64]) -> Quartiles {
    if sample.is_empty() {
        return Quartiles::default();
    }

    let sorted = sort_values(sample);
    let n = sorted.len();
    let q2 = median_of_sorted(&sorted);

    let mid = n / 2;
    let lower_half = &sorted[..mid];
    let upper_half = if n % 2 != 0 {
        &sorted[mid + 1..]
    } else {
        &sorted[mid..]
    };

    let q1 = if lower_half.is_empty() {
        sorted[0]
    } else {
        median_of_sorted(lower_half)
    };
    let q3 = if upper_half.is_empty() {
        sorted[n - 1]
    } else {
        median_of_sorted(upper_half)
    };

    Quartiles { q1, q2, q3 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_of_sorted_empty() {
        assert_eq!(median_of_sorted(&[]), 0.0);
    }

    #[test]
    fn test_median_of_sorted_odd() {
        assert_eq!(median_of_sorted(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_median_of_sorted_even() {
        assert_eq!(median_of_sorted(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_quartiles_even_sample() {
        let q = quartiles(&[1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0]);
        assert_eq!(q.q1, 4.0);
        assert_eq!(q.q2, 8.0);
        assert_eq!(q.q3, 12.0);
    }

    #[test]
    fn test_quartiles_odd_sample_excludes_median_from_halves() {
        // [10, 11, 11, 12, 12, 13, 100]: lower half [10, 11, 11], upper
        // half [12, 13, 100] with the middle 12 excluded.
        let q = quartiles(&[10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 100.0]);
        assert_eq!(q.q1, 11.0);
        assert_eq!(q.q2, 12.0);
        assert_eq!(q.q3, 13.0);
    }

    #[test]
    fn test_quartiles_empty_sample_is_zeroed() {
        assert_eq!(quartiles(&[]), Quartiles::default());
    }

    #[test]
    fn test_quartiles_single_value() {
        let q = quartiles(&[42.0]);
        // Lower half is empty, so Q1 falls back to the smallest value; the
        // upper half is empty too, so Q3 falls back to the largest.
        assert_eq!(q.q1, 42.0);
        assert_eq!(q.q2, 42.0);
        assert_eq!(q.q3, 42.0);
    }

    #[test]
    fn test_quartiles_ordering_invariant() {
        let samples: [&[f64]; 4] = [
            &[2.0, 2.0, 2.0, 2.0],
            &[5.0, 1.0, 4.0, 2.0, 3.0],
            &[0.5, 100.0],
            &[7.0, 7.0, 1.0, 9.0, 3.0, 3.0],
        ];
        for sample in samples {
            let q = quartiles(sample);
            assert!(q.q1 <= q.q2, "q1 > q2 for {sample:?}");
            assert!(q.q2 <= q.q3, "q2 > q3 for {sample:?}");
        }
    }

    #[test]
    fn test_quartiles_unsorted_input() {
        let q = quartiles(&[15.0, 1.0, 11.0, 5.0, 9.0, 3.0, 13.0, 7.0]);
        assert_eq!(q.q1, 4.0);
        assert_eq!(q.q2, 8.0);
        assert_eq!(q.q3, 12.0);
    }
}
