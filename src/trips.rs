//! The processed trip record shared by the ETL pipeline and the analytics
//! routines.
//!
//! Field names are the stable contract with the storage and request-handling
//! layers: `fare_amount`, `trip_distance`, `duration_mins`, `avg_speed_mph`,
//! `tip_percentage`, `pickup_hour`. Every metric is optional so that "field
//! absent" stays distinct from "field present with value zero"; the
//! analytics routines skip absent values rather than counting them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics::types::Keyed;

/// One cleaned, feature-engineered taxi trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(default, with = "tlc_datetime")]
    pub pickup_datetime: Option<NaiveDateTime>,
    #[serde(default, with = "tlc_datetime")]
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub passenger_count: Option<i64>,
    pub trip_distance: Option<f64>,
    pub fare_amount: Option<f64>,
    pub tip_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_type: Option<i64>,

    // zone lookup join
    pub pu_borough: Option<String>,
    pub pu_zone: Option<String>,
    pub do_borough: Option<String>,
    pub do_zone: Option<String>,

    // engineered features
    pub duration_mins: Option<f64>,
    pub avg_speed_mph: Option<f64>,
    pub tip_percentage: Option<f64>,
    pub fare_per_mile: Option<f64>,
    pub pickup_hour: Option<i64>,
    pub day_of_week: Option<String>,
    pub is_weekend: Option<bool>,
    pub time_of_day: Option<String>,
    pub fare_range: Option<String>,
    pub distance_category: Option<String>,
}

impl Keyed for TripRecord {
    fn numeric(&self, key: &str) -> Option<f64> {
        match key {
            "fare_amount" => self.fare_amount,
            "trip_distance" => self.trip_distance,
            "duration_mins" => self.duration_mins,
            "avg_speed_mph" => self.avg_speed_mph,
            "tip_percentage" => self.tip_percentage,
            "fare_per_mile" => self.fare_per_mile,
            "tip_amount" => self.tip_amount,
            "total_amount" => self.total_amount,
            "passenger_count" => self.passenger_count.map(|v| v as f64),
            "pickup_hour" => self.pickup_hour.map(|v| v as f64),
            _ => None,
        }
    }
}

/// Serde adapter for the `%Y-%m-%d %H:%M:%S` timestamp format used by the
/// TLC trip files. Empty or missing values map to `None`, which keeps CSV
/// and JSON round-trips symmetric.
pub mod tlc_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_known_fields() {
        let trip = TripRecord {
            fare_amount: Some(12.5),
            trip_distance: Some(3.2),
            pickup_hour: Some(8),
            ..Default::default()
        };

        assert_eq!(trip.numeric("fare_amount"), Some(12.5));
        assert_eq!(trip.numeric("trip_distance"), Some(3.2));
        assert_eq!(trip.numeric("pickup_hour"), Some(8.0));
    }

    #[test]
    fn test_numeric_absent_field_is_none() {
        let trip = TripRecord::default();
        assert_eq!(trip.numeric("fare_amount"), None);
    }

    #[test]
    fn test_numeric_unknown_key_is_none() {
        let trip = TripRecord {
            fare_amount: Some(10.0),
            ..Default::default()
        };
        assert_eq!(trip.numeric("no_such_field"), None);
    }

    #[test]
    fn test_trip_record_csv_round_trip() {
        let trip = TripRecord {
            pickup_datetime: chrono::NaiveDate::from_ymd_opt(2019, 1, 15)
                .unwrap()
                .and_hms_opt(8, 30, 0),
            fare_amount: Some(14.0),
            pu_zone: Some("Midtown Center".to_string()),
            pickup_hour: Some(8),
            is_weekend: Some(false),
            ..Default::default()
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&trip).unwrap();
        let data = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let parsed: TripRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(parsed, trip);
    }
}
