//! Comparison sorts over keyed records, written from first principles.
//!
//! Two families are provided. [`sort_by`] is a partition (quicksort-style)
//! sort used for ranking routes; [`exchange_sort_by`] is an adjacent-swap
//! (bubble-style) sort used where the reference analysis applies brute
//! force. Both return a sorted copy, leave the input untouched, and treat a
//! missing key value as zero so heterogeneous record collections never
//! panic mid-sort.

use super::types::Keyed;

/// Sort direction for the keyed sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

fn key_or_zero<T: Keyed>(record: &T, key: &str) -> f64 {
    record.numeric(key).unwrap_or(0.0)
}

/// Partition-based sort of `records` by the numeric field `key`.
///
/// The pivot is always the key value of the last element in the current
/// range; a single left-to-right scan swaps every element that compares
/// favorably to the pivot into the boundary region, then places the pivot at
/// the boundary. Average O(n log n); worst case O(n²) when the input is
/// already ordered against the fixed pivot choice (for example an
/// already-sorted collection). Ties may land in any relative order.
pub fn sort_by<T: Keyed + Clone>(records: &[T], key: &str, direction: Direction) -> Vec<T> {
    let mut sorted = records.to_vec();
    if sorted.len() > 1 {
        let high = sorted.len() - 1;
        quicksort(&mut sorted, 0, high, key, direction);
    }
    sorted
}

fn quicksort<T: Keyed>(arr: &mut [T], low: usize, high: usize, key: &str, direction: Direction) {
    if low < high {
        let pivot_index = partition(arr, low, high, key, direction);
        if pivot_index > 0 {
            quicksort(arr, low, pivot_index - 1, key, direction);
        }
        quicksort(arr, pivot_index + 1, high, key, direction);
    }
}

fn partition<T: Keyed>(
    arr: &mut [T],
    low: usize,
    high: usize,
    key: &str,
    direction: Direction,
) -> usize {
    let pivot = key_or_zero(&arr[high], key);
    let mut boundary = low;

    for j in low..high {
        let value = key_or_zero(&arr[j], key);
        let favors_pivot = match direction {
            Direction::Descending => value >= pivot,
            Direction::Ascending => value <= pivot,
        };
        if favors_pivot {
            arr.swap(boundary, j);
            boundary += 1;
        }
    }

    arr.swap(boundary, high);
    boundary
}

/// Exchange (adjacent-swap) sort of `records` by the numeric field `key`.
///
/// Runs n passes over a range that shrinks by one each pass; after each pass
/// the extreme remaining element has settled at the end. O(n²) time, O(1)
/// space beyond the output copy.
pub fn exchange_sort_by<T: Keyed + Clone>(records: &[T], key: &str, direction: Direction) -> Vec<T> {
    let mut sorted = records.to_vec();
    let n = sorted.len();

    for i in 0..n {
        for j in 0..n - i - 1 {
            let a = key_or_zero(&sorted[j], key);
            let b = key_or_zero(&sorted[j + 1], key);
            let out_of_order = match direction {
                Direction::Ascending => a > b,
                Direction::Descending => a < b,
            };
            if out_of_order {
                sorted.swap(j, j + 1);
            }
        }
    }

    sorted
}

/// Ascending exchange sort of a plain numeric sample. This is the entry
/// point the quartile calculation uses to order raw values.
pub fn sort_values(values: &[f64]) -> Vec<f64> {
    exchange_sort_by(values, "", Direction::Ascending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::RouteSummary;

    fn route(name: &str, trip_count: u64) -> RouteSummary {
        RouteSummary {
            route: name.to_string(),
            trip_count,
            avg_fare: 0.0,
            total_revenue: 0.0,
        }
    }

    #[test]
    fn test_sort_by_descending() {
        let routes = vec![route("a", 100), route("b", 500), route("c", 200)];
        let sorted = sort_by(&routes, "trip_count", Direction::Descending);

        let counts: Vec<u64> = sorted.iter().map(|r| r.trip_count).collect();
        assert_eq!(counts, vec![500, 200, 100]);
    }

    #[test]
    fn test_sort_by_ascending() {
        let routes = vec![route("a", 100), route("b", 500), route("c", 200)];
        let sorted = sort_by(&routes, "trip_count", Direction::Ascending);

        let counts: Vec<u64> = sorted.iter().map(|r| r.trip_count).collect();
        assert_eq!(counts, vec![100, 200, 500]);
    }

    #[test]
    fn test_sort_by_does_not_mutate_input() {
        let routes = vec![route("a", 3), route("b", 1), route("c", 2)];
        let before = routes.clone();

        let _ = sort_by(&routes, "trip_count", Direction::Ascending);
        assert_eq!(routes, before);
    }

    #[test]
    fn test_sort_by_preserves_multiset() {
        let routes = vec![route("a", 2), route("b", 2), route("c", 1), route("d", 9)];
        let sorted = sort_by(&routes, "trip_count", Direction::Descending);

        assert_eq!(sorted.len(), routes.len());
        let mut names: Vec<&str> = sorted.iter().map(|r| r.route.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_by_already_sorted_input() {
        // Worst case for the last-element pivot; must still terminate and
        // produce the right order.
        let routes: Vec<RouteSummary> = (0..50).map(|i| route("r", i)).collect();
        let sorted = sort_by(&routes, "trip_count", Direction::Ascending);

        for pair in sorted.windows(2) {
            assert!(pair[0].trip_count <= pair[1].trip_count);
        }
    }

    #[test]
    fn test_sort_by_missing_key_treated_as_zero() {
        let trips = vec![
            crate::trips::TripRecord {
                fare_amount: Some(10.0),
                ..Default::default()
            },
            crate::trips::TripRecord {
                fare_amount: None,
                ..Default::default()
            },
            crate::trips::TripRecord {
                fare_amount: Some(-5.0),
                ..Default::default()
            },
        ];

        let sorted = sort_by(&trips, "fare_amount", Direction::Descending);
        let fares: Vec<Option<f64>> = sorted.iter().map(|t| t.fare_amount).collect();
        // Missing sorts as 0.0: above -5, below 10.
        assert_eq!(fares, vec![Some(10.0), None, Some(-5.0)]);
    }

    #[test]
    fn test_sort_by_empty_and_single() {
        let empty: Vec<RouteSummary> = vec![];
        assert!(sort_by(&empty, "trip_count", Direction::Descending).is_empty());

        let one = vec![route("a", 7)];
        let sorted = sort_by(&one, "trip_count", Direction::Descending);
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].trip_count, 7);
    }

    #[test]
    fn test_exchange_sort_both_directions() {
        let values = vec![5.0, 1.0, 4.0, 2.0, 3.0];

        let asc = exchange_sort_by(&values, "", Direction::Ascending);
        assert_eq!(asc, vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let desc = exchange_sort_by(&values, "", Direction::Descending);
        assert_eq!(desc, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_sort_values_ascending() {
        let sorted = sort_values(&[9.0, 11.0, 10.0, 12.0]);
        assert_eq!(sorted, vec![9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_sort_values_handles_duplicates() {
        let sorted = sort_values(&[3.0, 1.0, 3.0, 1.0]);
        assert_eq!(sorted, vec![1.0, 1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_sort_idempotent() {
        let routes = vec![route("a", 4), route("b", 2), route("c", 8)];
        let first = sort_by(&routes, "trip_count", Direction::Descending);
        let second = sort_by(&routes, "trip_count", Direction::Descending);
        assert_eq!(first, second);
    }
}
