//! Single-pass aggregation of trips into 24 fixed hour buckets.

use super::types::HourlyPattern;
use super::utility::round2;
use crate::trips::TripRecord;

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, Default)]
struct HourBucket {
    count: u64,
    fare: f64,
    distance: f64,
    duration: f64,
    speed: f64,
    tip_pct: f64,
}

/// Groups trips by pickup hour and averages each metric per hour.
///
/// One pass over the input. Trips with no pickup hour, or an hour outside
/// 0-23, are skipped silently. Each metric accumulates independently: a trip
/// missing its fare still counts toward the hour's trip total and toward
/// every other sum. Averages are rounded to two decimals; an hour with no
/// trips reports zero for all five averages.
///
/// The output always contains exactly 24 entries, hour ascending, no matter
/// what order the input arrives in.
pub fn aggregate_by_hour(trips: &[TripRecord]) -> Vec<HourlyPattern> {
    let mut buckets = [HourBucket::default(); HOURS_PER_DAY];

    for trip in trips {
        let Some(hour) = trip.pickup_hour else {
            continue;
        };
        if !(0..HOURS_PER_DAY as i64).contains(&hour) {
            continue;
        }

        let bucket = &mut buckets[hour as usize];
        bucket.count += 1;

        if let Some(v) = trip.fare_amount {
            bucket.fare += v;
        }
        if let Some(v) = trip.trip_distance {
            bucket.distance += v;
        }
        if let Some(v) = trip.duration_mins {
            bucket.duration += v;
        }
        if let Some(v) = trip.avg_speed_mph {
            bucket.speed += v;
        }
        if let Some(v) = trip.tip_percentage {
            bucket.tip_pct += v;
        }
    }

    buckets
        .iter()
        .enumerate()
        .map(|(hour, bucket)| {
            let hour = hour as u32;
            if bucket.count > 0 {
                let count = bucket.count as f64;
                HourlyPattern {
                    hour,
                    trip_count: bucket.count,
                    avg_fare: round2(bucket.fare / count),
                    avg_distance: round2(bucket.distance / count),
                    avg_duration: round2(bucket.duration / count),
                    avg_speed: round2(bucket.speed / count),
                    avg_tip_pct: round2(bucket.tip_pct / count),
                }
            } else {
                HourlyPattern {
                    hour,
                    trip_count: 0,
                    avg_fare: 0.0,
                    avg_distance: 0.0,
                    avg_duration: 0.0,
                    avg_speed: 0.0,
                    avg_tip_pct: 0.0,
                }
            }
        })
        .collect()
}
