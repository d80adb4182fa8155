//! Validation rules for raw trip records.
//!
//! Each rule pass drops the rows that fail it and records the count under a
//! human-readable reason. Rejected rows are kept so the pipeline can write
//! them to a rejection file for later inspection.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use super::load::RawTrip;

const MAX_TRIP_DISTANCE_MILES: f64 = 100.0;
const MAX_FARE_DOLLARS: f64 = 500.0;
const MAX_PASSENGERS: i64 = 6;
const ZONE_ID_RANGE: std::ops::RangeInclusive<i64> = 1..=263;

/// Count of rows excluded for one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub reason: String,
    pub count: usize,
}

/// Summary of a cleaning run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub initial_count: usize,
    pub final_count: usize,
    pub exclusions: Vec<Exclusion>,
}

impl CleanReport {
    pub fn total_excluded(&self) -> usize {
        self.exclusions.iter().map(|e| e.count).sum()
    }
}

/// Kept and rejected rows plus the per-reason accounting.
#[derive(Debug)]
pub struct CleanOutcome {
    pub kept: Vec<RawTrip>,
    pub rejected: Vec<RawTrip>,
    pub report: CleanReport,
}

/// Runs every cleaning rule over the raw rows.
///
/// Rules, in order: exact duplicates, missing critical fields, distance
/// bounds, fare bounds, passenger-count bounds, dropoff-after-pickup, and
/// zone-id bounds. Row order is preserved for the survivors.
pub fn clean_trips(raw: Vec<RawTrip>) -> CleanOutcome {
    let initial_count = raw.len();
    info!(records = initial_count, "Starting cleaning pass");

    let mut report = CleanReport {
        initial_count,
        ..Default::default()
    };
    let mut rejected = Vec::new();

    let trips = remove_duplicates(raw, &mut rejected, &mut report);

    let trips = apply_rule(
        trips,
        "Missing critical values",
        |t| {
            t.pickup_datetime.is_some()
                && t.dropoff_datetime.is_some()
                && t.pu_location_id.is_some()
                && t.do_location_id.is_some()
                && t.trip_distance.is_some()
                && t.fare_amount.is_some()
        },
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Invalid trip distance (<=0 or >100 miles)",
        |t| {
            t.trip_distance
                .is_some_and(|d| d > 0.0 && d <= MAX_TRIP_DISTANCE_MILES)
        },
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Invalid fare amount (<=0 or >$500)",
        |t| t.fare_amount.is_some_and(|f| f > 0.0 && f <= MAX_FARE_DOLLARS),
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Invalid passenger count (<=0 or >6)",
        |t| {
            t.passenger_count
                .is_some_and(|p| p > 0 && p <= MAX_PASSENGERS)
        },
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Dropoff time before pickup time",
        |t| match (t.pickup_datetime, t.dropoff_datetime) {
            (Some(pickup), Some(dropoff)) => dropoff > pickup,
            _ => false,
        },
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Invalid pickup location ID",
        |t| t.pu_location_id.is_some_and(|id| ZONE_ID_RANGE.contains(&id)),
        &mut rejected,
        &mut report,
    );

    let trips = apply_rule(
        trips,
        "Invalid dropoff location ID",
        |t| t.do_location_id.is_some_and(|id| ZONE_ID_RANGE.contains(&id)),
        &mut rejected,
        &mut report,
    );

    report.final_count = trips.len();
    info!(
        kept = report.final_count,
        excluded = report.total_excluded(),
        "Cleaning complete"
    );

    CleanOutcome {
        kept: trips,
        rejected,
        report,
    }
}

fn remove_duplicates(
    trips: Vec<RawTrip>,
    rejected: &mut Vec<RawTrip>,
    report: &mut CleanReport,
) -> Vec<RawTrip> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(trips.len());
    let mut removed = 0usize;

    for trip in trips {
        if seen.insert(identity_key(&trip)) {
            kept.push(trip);
        } else {
            removed += 1;
            rejected.push(trip);
        }
    }

    if removed > 0 {
        debug!(removed, "Removed duplicate records");
        report.exclusions.push(Exclusion {
            reason: "Duplicate records".to_string(),
            count: removed,
        });
    }

    kept
}

// Floats forbid a derived Hash, so duplicates are matched on a formatted
// key over the identifying columns.
fn identity_key(trip: &RawTrip) -> String {
    format!(
        "{:?}|{:?}|{:?}|{:?}|{:?}|{:?}|{:?}",
        trip.pickup_datetime,
        trip.dropoff_datetime,
        trip.pu_location_id,
        trip.do_location_id,
        trip.trip_distance,
        trip.fare_amount,
        trip.total_amount,
    )
}

fn apply_rule(
    trips: Vec<RawTrip>,
    reason: &str,
    keep: impl Fn(&RawTrip) -> bool,
    rejected: &mut Vec<RawTrip>,
    report: &mut CleanReport,
) -> Vec<RawTrip> {
    let before = trips.len();
    let (kept, dropped): (Vec<RawTrip>, Vec<RawTrip>) = trips.into_iter().partition(keep);

    let removed = before - kept.len();
    if removed > 0 {
        debug!(reason, removed, "Excluded records");
        report.exclusions.push(Exclusion {
            reason: reason.to_string(),
            count: removed,
        });
        rejected.extend(dropped);
    }

    kept
}
