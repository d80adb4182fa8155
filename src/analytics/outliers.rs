//! IQR-based outlier detection over keyed records.

use super::quartiles::quartiles;
use super::types::Keyed;

/// Quartile computation needs at least this many values to say anything
/// meaningful; smaller samples produce no outliers at all.
pub const MIN_SAMPLE_SIZE: usize = 4;

const IQR_MULTIPLIER: f64 = 1.5;

/// Flags records whose `key` value falls outside the Tukey fences
/// `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
///
/// Records with an absent `key` contribute nothing to the quartiles and are
/// never flagged. The returned records keep their original relative order,
/// duplicates included. No rounding happens anywhere in the bound
/// computation; presentation layers round if they want to.
pub fn detect_outliers<T: Keyed + Clone>(records: &[T], key: &str) -> Vec<T> {
    let sample: Vec<f64> = records.iter().filter_map(|r| r.numeric(key)).collect();
    if sample.len() < MIN_SAMPLE_SIZE {
        return Vec::new();
    }

    let q = quartiles(&sample);
    let iqr = q.q3 - q.q1;
    let lower_bound = q.q1 - IQR_MULTIPLIER * iqr;
    let upper_bound = q.q3 + IQR_MULTIPLIER * iqr;

    records
        .iter()
        .filter(|r| {
            r.numeric(key)
                .is_some_and(|v| v < lower_bound || v > upper_bound)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::TripRecord;

    fn fare(amount: f64) -> TripRecord {
        TripRecord {
            fare_amount: Some(amount),
            ..Default::default()
        }
    }

    #[test]
    fn test_detects_high_outlier() {
        let trips: Vec<TripRecord> = [10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 100.0]
            .into_iter()
            .map(fare)
            .collect();

        // Q1=11, Q3=13, IQR=2, fences [8, 16].
        let outliers = detect_outliers(&trips, "fare_amount");
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].fare_amount, Some(100.0));
    }

    #[test]
    fn test_detects_low_outlier() {
        let trips: Vec<TripRecord> = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 1.0]
            .into_iter()
            .map(fare)
            .collect();

        let outliers = detect_outliers(&trips, "fare_amount");
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].fare_amount, Some(1.0));
    }

    #[test]
    fn test_insufficient_sample_returns_empty() {
        let trips: Vec<TripRecord> = [1.0, 2.0, 10_000.0].into_iter().map(fare).collect();
        assert!(detect_outliers(&trips, "fare_amount").is_empty());
    }

    #[test]
    fn test_absent_values_excluded_from_sample() {
        // Three present fares plus one absent: below the minimum sample
        // size, so nothing is flagged no matter how extreme.
        let mut trips: Vec<TripRecord> = [5.0, 6.0, 9_999.0].into_iter().map(fare).collect();
        trips.push(TripRecord::default());

        assert!(detect_outliers(&trips, "fare_amount").is_empty());
    }

    #[test]
    fn test_preserves_original_order_and_duplicates() {
        let trips: Vec<TripRecord> = [
            200.0, 10.0, 11.0, 12.0, 13.0, 200.0, 11.0, 12.0, 13.0, 10.0, 11.0,
        ]
        .into_iter()
        .map(fare)
        .collect();

        let outliers = detect_outliers(&trips, "fare_amount");
        let values: Vec<Option<f64>> = outliers.iter().map(|t| t.fare_amount).collect();
        assert_eq!(values, vec![Some(200.0), Some(200.0)]);
    }

    #[test]
    fn test_no_outliers_in_tight_sample() {
        let trips: Vec<TripRecord> = [10.0, 11.0, 12.0, 13.0].into_iter().map(fare).collect();
        assert!(detect_outliers(&trips, "fare_amount").is_empty());
    }

    #[test]
    fn test_unknown_key_returns_empty() {
        let trips: Vec<TripRecord> = [10.0, 11.0, 12.0, 13.0, 99.0].into_iter().map(fare).collect();
        assert!(detect_outliers(&trips, "not_a_field").is_empty());
    }

    #[test]
    fn test_input_unchanged() {
        let trips: Vec<TripRecord> = [10.0, 11.0, 12.0, 13.0, 99.0].into_iter().map(fare).collect();
        let before = trips.clone();
        let _ = detect_outliers(&trips, "fare_amount");
        assert_eq!(trips, before);
    }
}
