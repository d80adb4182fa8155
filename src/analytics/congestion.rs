//! Congestion detection over hourly aggregates.

use super::types::HourlyPattern;

/// Hours at or below this trip count are too thin to trust as a speed
/// signal and never qualify.
pub const SIGNIFICANCE_FLOOR: u64 = 10;

/// Hours within 10% of the slowest qualifying hour count as congested, so
/// the result is a cluster of slow hours rather than a single minimum.
const SPEED_TOLERANCE: f64 = 1.1;

/// Returns the hours whose average speed sits within the tolerance band
/// above the slowest qualifying hour.
///
/// Qualifying hours must have more than [`SIGNIFICANCE_FLOOR`] trips; an
/// hour below the floor is excluded from both the minimum computation and
/// the result, however slow it is. When every qualifying hour has the same
/// speed, all of them are returned. Empty input yields an empty result.
pub fn find_congestion_hours(hourly_data: &[HourlyPattern]) -> Vec<u32> {
    let qualifying: Vec<&HourlyPattern> = hourly_data
        .iter()
        .filter(|h| h.trip_count > SIGNIFICANCE_FLOOR)
        .collect();
    if qualifying.is_empty() {
        return Vec::new();
    }

    let min_speed = qualifying
        .iter()
        .map(|h| h.avg_speed)
        .fold(f64::INFINITY, f64::min);
    let threshold = min_speed * SPEED_TOLERANCE;

    qualifying
        .iter()
        .filter(|h| h.avg_speed <= threshold)
        .map(|h| h.hour)
        .collect()
}
