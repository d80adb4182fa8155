//! In-process entry points for a request-handling layer.
//!
//! These functions take decoded query parameters plus record collections
//! already fetched from storage, and return JSON-serializable values. They
//! are the stable call shapes the HTTP layer consumes; the analytics
//! modules behind them stay free of any transport concern.

use serde::Serialize;

use crate::analytics::congestion;
use crate::analytics::hourly;
use crate::analytics::outliers::detect_outliers;
use crate::analytics::sort::{self, Direction};
use crate::analytics::summary;
use crate::analytics::types::{FareRangeCount, HourlyPattern, RouteSummary, SummaryStats};
use crate::trips::TripRecord;

/// How many outlier trips the outlier report carries as a sample.
pub const OUTLIER_SAMPLE_LIMIT: usize = 10;

/// Routes ranked by popularity, most trips first. Tie order is unspecified.
pub fn sort_by_trip_count(routes: &[RouteSummary]) -> Vec<RouteSummary> {
    sort::sort_by(routes, "trip_count", Direction::Descending)
}

/// The highest-fare trips, most expensive first, capped at `limit`.
pub fn top_fares(trips: &[TripRecord], limit: usize) -> Vec<TripRecord> {
    let mut ranked = sort::exchange_sort_by(trips, "fare_amount", Direction::Descending);
    ranked.truncate(limit);
    ranked
}

/// Trips with anomalous fares, in their original order.
pub fn detect_fare_outliers(trips: &[TripRecord]) -> Vec<TripRecord> {
    detect_outliers(trips, "fare_amount")
}

/// Outlier count plus a capped sample of the flagged trips.
#[derive(Debug, Clone, Serialize)]
pub struct FareOutlierReport {
    pub outlier_count: usize,
    pub sample: Vec<TripRecord>,
}

pub fn fare_outlier_report(trips: &[TripRecord]) -> FareOutlierReport {
    let outliers = detect_fare_outliers(trips);
    FareOutlierReport {
        outlier_count: outliers.len(),
        sample: outliers.into_iter().take(OUTLIER_SAMPLE_LIMIT).collect(),
    }
}

pub use crate::analytics::congestion::find_congestion_hours;
pub use crate::analytics::hourly::aggregate_by_hour;
pub use crate::analytics::summary::{fare_distribution, summarize_routes, summary_stats};

/// Everything the `analyze` subcommand reports, bundled for JSON output.
#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub summary: SummaryStats,
    pub top_routes: Vec<RouteSummary>,
    pub top_fares: Vec<TripRecord>,
    pub fare_outliers: FareOutlierReport,
    pub fare_distribution: Vec<FareRangeCount>,
    pub hourly_patterns: Vec<HourlyPattern>,
    pub congestion_hours: Vec<u32>,
}

/// Runs the full analytics suite over a processed trip collection.
pub fn analyze_trips(trips: &[TripRecord], top: usize) -> AnalyticsReport {
    let routes = summary::summarize_routes(trips);
    let mut top_routes = sort_by_trip_count(&routes);
    top_routes.truncate(top);

    let hourly_patterns = hourly::aggregate_by_hour(trips);
    let congestion_hours = congestion::find_congestion_hours(&hourly_patterns);

    AnalyticsReport {
        summary: summary::summary_stats(trips),
        top_routes,
        top_fares: top_fares(trips, top),
        fare_outliers: fare_outlier_report(trips),
        fare_distribution: summary::fare_distribution(trips),
        hourly_patterns,
        congestion_hours,
    }
}
