//! Derived features computed from cleaned trips.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use tracing::info;

use super::load::{RawTrip, Zone};
use crate::analytics::quartiles::median_of_sorted;
use crate::analytics::sort::sort_values;
use crate::analytics::types::Keyed;
use crate::analytics::utility::{mean, round2, stddev};
use crate::trips::TripRecord;

const MAX_DURATION_MINS: f64 = 180.0;
const MAX_FARE_PER_MILE: f64 = 100.0;
const MAX_SPEED_MPH: f64 = 80.0;

/// Turns cleaned raw rows into processed [`TripRecord`]s with the derived
/// fields filled in. Rows whose duration comes out non-positive or above
/// three hours are dropped here rather than in the cleaning stage, because
/// the duration only exists after this computation.
pub fn engineer_features(trips: Vec<RawTrip>, zones: &HashMap<i64, Zone>) -> Vec<TripRecord> {
    let input = trips.len();
    let records: Vec<TripRecord> = trips
        .into_iter()
        .filter_map(|t| build_record(t, zones))
        .collect();

    info!(
        input,
        output = records.len(),
        dropped = input - records.len(),
        "Feature engineering complete"
    );
    records
}

fn build_record(trip: RawTrip, zones: &HashMap<i64, Zone>) -> Option<TripRecord> {
    let pickup = trip.pickup_datetime?;
    let dropoff = trip.dropoff_datetime?;

    let duration_mins = (dropoff - pickup).num_seconds() as f64 / 60.0;
    if duration_mins <= 0.0 || duration_mins > MAX_DURATION_MINS {
        return None;
    }

    let distance = trip.trip_distance;
    let fare = trip.fare_amount;

    let fare_per_mile = match (fare, distance) {
        (Some(f), Some(d)) if d > 0.0 => Some((f / d).min(MAX_FARE_PER_MILE)),
        (Some(_), Some(_)) => Some(0.0),
        _ => None,
    };

    let avg_speed_mph =
        distance.map(|d| (d / (duration_mins / 60.0)).clamp(0.0, MAX_SPEED_MPH));

    let tip_percentage = match (trip.tip_amount, fare) {
        (Some(tip), Some(f)) if f > 0.0 => Some(tip / f * 100.0),
        _ => None,
    };

    let (pu_borough, pu_zone) = zone_names(trip.pu_location_id, zones);
    let (do_borough, do_zone) = zone_names(trip.do_location_id, zones);

    Some(TripRecord {
        pickup_datetime: Some(pickup),
        dropoff_datetime: Some(dropoff),
        passenger_count: trip.passenger_count,
        trip_distance: distance,
        fare_amount: fare,
        tip_amount: trip.tip_amount,
        total_amount: trip.total_amount,
        payment_type: trip.payment_type,
        pu_borough,
        pu_zone,
        do_borough,
        do_zone,
        duration_mins: Some(round2(duration_mins)),
        avg_speed_mph: avg_speed_mph.map(round2),
        tip_percentage: tip_percentage.map(round2),
        fare_per_mile: fare_per_mile.map(round2),
        pickup_hour: Some(pickup.hour() as i64),
        day_of_week: Some(pickup.format("%A").to_string()),
        is_weekend: Some(matches!(pickup.weekday(), Weekday::Sat | Weekday::Sun)),
        time_of_day: Some(time_of_day(pickup).to_string()),
        fare_range: fare.map(|f| fare_range(f).to_string()),
        distance_category: distance.map(|d| distance_category(d).to_string()),
    })
}

fn zone_names(
    location_id: Option<i64>,
    zones: &HashMap<i64, Zone>,
) -> (Option<String>, Option<String>) {
    let zone = location_id.and_then(|id| zones.get(&id));
    match zone {
        Some(z) => (
            Some(z.borough.clone().unwrap_or_else(|| "Unknown".to_string())),
            Some(z.zone.clone().unwrap_or_else(|| "Unknown".to_string())),
        ),
        None => (
            Some("Unknown".to_string()),
            Some("Unknown".to_string()),
        ),
    }
}

fn time_of_day(pickup: NaiveDateTime) -> &'static str {
    match pickup.hour() {
        5..=8 => "Morning Rush",
        9..=16 => "Midday",
        17..=19 => "Evening Rush",
        _ => "Off-Peak",
    }
}

fn fare_range(fare: f64) -> &'static str {
    if fare < 10.0 {
        "$0-10"
    } else if fare < 20.0 {
        "$10-20"
    } else if fare < 30.0 {
        "$20-30"
    } else if fare < 50.0 {
        "$30-50"
    } else {
        "$50+"
    }
}

fn distance_category(distance: f64) -> &'static str {
    if distance <= 2.0 {
        "Short"
    } else if distance <= 5.0 {
        "Medium"
    } else if distance <= 10.0 {
        "Long"
    } else {
        "Very Long"
    }
}

/// Distribution statistics for one derived feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub feature: String,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarizes the numeric derived features across the processed records.
/// Features with no present values are omitted.
pub fn feature_summary(records: &[TripRecord]) -> Vec<FeatureSummary> {
    ["duration_mins", "fare_per_mile", "avg_speed_mph", "pickup_hour"]
        .iter()
        .filter_map(|key| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.numeric(key)).collect();
            if values.is_empty() {
                return None;
            }

            let sorted = sort_values(&values);
            let avg = mean(&values);
            Some(FeatureSummary {
                feature: key.to_string(),
                mean: round2(avg),
                median: round2(median_of_sorted(&sorted)),
                stddev: round2(stddev(&values, avg)),
                min: sorted[0],
                max: sorted[sorted.len() - 1],
            })
        })
        .collect()
}
