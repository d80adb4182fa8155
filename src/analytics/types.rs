//! Record types produced and consumed by the analytics routines.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::trips::tlc_datetime;

/// Field-name based numeric access over heterogeneous record types.
///
/// The analytics routines address fields by name so the same ordering and
/// outlier machinery works over trips, route summaries, and hourly patterns
/// alike. Unknown or absent fields yield `None`; the sorts substitute zero,
/// everything else skips the record.
pub trait Keyed {
    fn numeric(&self, key: &str) -> Option<f64>;
}

// A plain number is its own key, which lets raw samples flow through the
// same sort routines as full records.
impl Keyed for f64 {
    fn numeric(&self, _key: &str) -> Option<f64> {
        Some(*self)
    }
}

/// Aggregated trip metrics for one hour of the day (0-23).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPattern {
    pub hour: u32,
    pub trip_count: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub avg_duration: f64,
    pub avg_speed: f64,
    pub avg_tip_pct: f64,
}

impl Keyed for HourlyPattern {
    fn numeric(&self, key: &str) -> Option<f64> {
        match key {
            "hour" => Some(self.hour as f64),
            "trip_count" => Some(self.trip_count as f64),
            "avg_fare" => Some(self.avg_fare),
            "avg_distance" => Some(self.avg_distance),
            "avg_duration" => Some(self.avg_duration),
            "avg_speed" => Some(self.avg_speed),
            "avg_tip_pct" => Some(self.avg_tip_pct),
            _ => None,
        }
    }
}

/// Trip volume and revenue for one pickup-to-dropoff zone pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub route: String,
    pub trip_count: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
}

impl Keyed for RouteSummary {
    fn numeric(&self, key: &str) -> Option<f64> {
        match key {
            "trip_count" => Some(self.trip_count as f64),
            "avg_fare" => Some(self.avg_fare),
            "total_revenue" => Some(self.total_revenue),
            _ => None,
        }
    }
}

/// Dataset-wide summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_trips: usize,
    pub avg_distance: f64,
    pub avg_fare: f64,
    pub avg_total: f64,
    pub avg_passengers: f64,
    pub total_revenue: f64,
    pub avg_duration: f64,
    pub avg_speed: f64,
    pub avg_tip_pct: f64,
    #[serde(with = "tlc_datetime")]
    pub earliest_trip: Option<NaiveDateTime>,
    #[serde(with = "tlc_datetime")]
    pub latest_trip: Option<NaiveDateTime>,
}

/// Trip count for one fare bracket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRangeCount {
    pub fare_range: String,
    pub trip_count: u64,
}
