//! Loading of raw TLC trip files and the zone lookup table.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::trips::{TripRecord, tlc_datetime};

/// One row of a TLC yellow-taxi trip file, column names as published.
/// Everything is optional; validation happens in the cleaning stage, not
/// here, so a ragged row never aborts a whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "VendorID")]
    pub vendor_id: Option<i64>,
    #[serde(rename = "tpep_pickup_datetime", default, with = "tlc_datetime")]
    pub pickup_datetime: Option<NaiveDateTime>,
    #[serde(rename = "tpep_dropoff_datetime", default, with = "tlc_datetime")]
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub passenger_count: Option<i64>,
    pub trip_distance: Option<f64>,
    #[serde(rename = "RatecodeID")]
    pub ratecode_id: Option<i64>,
    pub store_and_fwd_flag: Option<String>,
    #[serde(rename = "PULocationID")]
    pub pu_location_id: Option<i64>,
    #[serde(rename = "DOLocationID")]
    pub do_location_id: Option<i64>,
    pub payment_type: Option<i64>,
    pub fare_amount: Option<f64>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tip_amount: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub improvement_surcharge: Option<f64>,
    pub total_amount: Option<f64>,
    pub congestion_surcharge: Option<f64>,
}

/// One row of `taxi_zone_lookup.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Zone {
    #[serde(rename = "LocationID")]
    pub location_id: i64,
    #[serde(rename = "Borough")]
    pub borough: Option<String>,
    #[serde(rename = "Zone")]
    pub zone: Option<String>,
    #[serde(rename = "service_zone")]
    pub service_zone: Option<String>,
}

/// Reads raw trips from a CSV file, stopping at `row_limit` rows when one
/// is given. Files ending in `.gz` are decompressed on the fly.
pub fn load_trips(path: &Path, row_limit: Option<usize>) -> Result<Vec<RawTrip>> {
    let reader = open_maybe_gzip(path)?;
    let mut rdr = csv::Reader::from_reader(reader);

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        if let Some(limit) = row_limit {
            if trips.len() >= limit {
                break;
            }
        }
        let record: RawTrip = result.with_context(|| format!("bad row in {}", path.display()))?;
        trips.push(record);
    }

    info!(rows = trips.len(), path = %path.display(), "Loaded raw trip data");
    Ok(trips)
}

/// Reads the zone lookup table into a location-id map.
pub fn load_zone_lookup(path: &Path) -> Result<HashMap<i64, Zone>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut zones = HashMap::new();
    for result in rdr.deserialize() {
        let zone: Zone = result?;
        zones.insert(zone.location_id, zone);
    }

    info!(zones = zones.len(), path = %path.display(), "Loaded zone lookup");
    Ok(zones)
}

/// Reads processed trip records back from a pipeline output file.
pub fn load_processed(path: &Path) -> Result<Vec<TripRecord>> {
    let reader = open_maybe_gzip(path)?;
    let mut rdr = csv::Reader::from_reader(reader);

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let record: TripRecord = result?;
        trips.push(record);
    }

    info!(rows = trips.len(), path = %path.display(), "Loaded processed trips");
    Ok(trips)
}

fn open_maybe_gzip(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIP_HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,trip_distance,RatecodeID,store_and_fwd_flag,PULocationID,DOLocationID,payment_type,fare_amount,extra,mta_tax,tip_amount,tolls_amount,improvement_surcharge,total_amount,congestion_surcharge";

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    fn write_sample_csv(path: &Path) {
        let mut file = File::create(path).unwrap();
        writeln!(file, "{TRIP_HEADER}").unwrap();
        writeln!(
            file,
            "1,2019-01-15 08:05:00,2019-01-15 08:25:00,1,3.2,1,N,161,237,1,14.0,0.5,0.5,2.0,0.0,0.3,17.3,0.0"
        )
        .unwrap();
        writeln!(
            file,
            "2,2019-01-15 09:00:00,2019-01-15 09:10:00,2,1.1,1,N,48,68,2,6.5,0.0,0.5,0.0,0.0,0.3,7.3,"
        )
        .unwrap();
    }

    #[test]
    fn test_load_trips_parses_rows() {
        let path = temp_path("urban_mobility_load_test.csv");
        write_sample_csv(&path);

        let trips = load_trips(&path, None).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].fare_amount, Some(14.0));
        assert_eq!(trips[0].pu_location_id, Some(161));
        // Trailing empty field maps to absent, not zero.
        assert_eq!(trips[1].congestion_surcharge, None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_trips_respects_row_limit() {
        let path = temp_path("urban_mobility_limit_test.csv");
        write_sample_csv(&path);

        let trips = load_trips(&path, Some(1)).unwrap();
        assert_eq!(trips.len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_trips_gzip() {
        let path = temp_path("urban_mobility_gzip_test.csv.gz");
        let plain = temp_path("urban_mobility_gzip_src.csv");
        write_sample_csv(&plain);

        let bytes = std::fs::read(&plain).unwrap();
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(&bytes).unwrap();
        encoder.finish().unwrap();

        let trips = load_trips(&path, None).unwrap();
        assert_eq!(trips.len(), 2);

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_file(&plain).unwrap();
    }

    #[test]
    fn test_load_zone_lookup() {
        let path = temp_path("urban_mobility_zones_test.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "\"LocationID\",\"Borough\",\"Zone\",\"service_zone\"").unwrap();
        writeln!(file, "161,Manhattan,Midtown Center,Yellow Zone").unwrap();
        writeln!(file, "237,Manhattan,Upper East Side South,Yellow Zone").unwrap();

        let zones = load_zone_lookup(&path).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[&161].zone.as_deref(), Some("Midtown Center"));

        std::fs::remove_file(&path).unwrap();
    }
}
