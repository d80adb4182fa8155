//! Dataset-wide summaries: overall statistics, route rollups, and the fare
//! bracket distribution.

use std::collections::BTreeMap;

use super::types::{FareRangeCount, RouteSummary, SummaryStats};
use super::utility::{mean, round2};
use crate::trips::TripRecord;

/// Fare brackets in display order. Matches the `fare_range` values the
/// feature engineering step assigns.
pub const FARE_BRACKETS: [&str; 5] = ["$0-10", "$10-20", "$20-30", "$30-50", "$50+"];

/// Overall statistics across the whole trip collection.
///
/// Averages are taken over the values actually present for each field, the
/// way an SQL `AVG` ignores NULLs; revenue sums every present fare.
pub fn summary_stats(trips: &[TripRecord]) -> SummaryStats {
    let collect = |f: fn(&TripRecord) -> Option<f64>| -> Vec<f64> {
        trips.iter().filter_map(f).collect()
    };

    let fares = collect(|t| t.fare_amount);

    SummaryStats {
        total_trips: trips.len(),
        avg_distance: mean(&collect(|t| t.trip_distance)),
        avg_fare: mean(&fares),
        avg_total: mean(&collect(|t| t.total_amount)),
        avg_passengers: mean(&collect(|t| t.passenger_count.map(|v| v as f64))),
        total_revenue: fares.iter().sum(),
        avg_duration: mean(&collect(|t| t.duration_mins)),
        avg_speed: mean(&collect(|t| t.avg_speed_mph)),
        avg_tip_pct: mean(&collect(|t| t.tip_percentage)),
        earliest_trip: trips.iter().filter_map(|t| t.pickup_datetime).min(),
        latest_trip: trips.iter().filter_map(|t| t.pickup_datetime).max(),
    }
}

/// Rolls trips up into per-route summaries, keyed by the pickup and dropoff
/// zone names. Zones missing from the record fall back to "Unknown".
///
/// Output order is the route name order; ranking by popularity is the
/// caller's job (see [`crate::api::sort_by_trip_count`]).
pub fn summarize_routes(trips: &[TripRecord]) -> Vec<RouteSummary> {
    #[derive(Default)]
    struct RouteAcc {
        trips: u64,
        fare_sum: f64,
        fare_count: u64,
    }

    let mut routes: BTreeMap<String, RouteAcc> = BTreeMap::new();

    for trip in trips {
        let pu = trip.pu_zone.as_deref().unwrap_or("Unknown");
        let dst = trip.do_zone.as_deref().unwrap_or("Unknown");
        let acc = routes.entry(format!("{pu} -> {dst}")).or_default();

        acc.trips += 1;
        if let Some(fare) = trip.fare_amount {
            acc.fare_sum += fare;
            acc.fare_count += 1;
        }
    }

    routes
        .into_iter()
        .map(|(route, acc)| RouteSummary {
            route,
            trip_count: acc.trips,
            avg_fare: if acc.fare_count > 0 {
                round2(acc.fare_sum / acc.fare_count as f64)
            } else {
                0.0
            },
            total_revenue: round2(acc.fare_sum),
        })
        .collect()
}

/// Counts trips per fare bracket, all brackets present in bracket order.
pub fn fare_distribution(trips: &[TripRecord]) -> Vec<FareRangeCount> {
    FARE_BRACKETS
        .iter()
        .map(|bracket| FareRangeCount {
            fare_range: bracket.to_string(),
            trip_count: trips
                .iter()
                .filter(|t| t.fare_range.as_deref() == Some(*bracket))
                .count() as u64,
        })
        .collect()
}
