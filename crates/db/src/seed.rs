//! Fixture loader that fills a [`Database`] from the source JSON exports.
//!
//! Three files are read from one directory:
//!
//! | File                        | Record keys |
//! |-----------------------------|-------------|
//! | `vessels.json`              | `IMONo`, `Name`, `VesselType`, optional `DWT` |
//! | `pp-reference.json`         | `RowID`, `Category`, `VesselTypeID`, `Size`, `Traj`, `a`..`e` |
//! | `daily-log-emissions.json`  | `EID`, `VesselID` (IMO), `LOGID`, `FromUTC`, `TOUTC`, totals |
//!
//! A malformed vessel or reference line fails the load. Emission records
//! that cannot be parsed or whose vessel is unknown are skipped and counted.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use ppscc_core::decimal::{self, Decimal};
use ppscc_core::emission::{EmissionObservation, EmissionTotals};
use ppscc_core::error::CoreError;
use ppscc_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DbError;
use crate::models::reference_line::ReferenceLine;
use crate::models::vessel::UpsertVessel;
use crate::repositories::{EmissionRepo, ReferenceLineRepo, VesselRepo};
use crate::Database;

pub const VESSELS_FILE: &str = "vessels.json";
pub const REFERENCE_FILE: &str = "pp-reference.json";
pub const EMISSIONS_FILE: &str = "daily-log-emissions.json";

/// Counts reported after a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub vessels: usize,
    pub reference_lines: usize,
    pub emissions: usize,
    pub skipped_emissions: usize,
}

// ---------------------------------------------------------------------------
// Fixture records
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VesselFixture {
    #[serde(rename = "IMONo")]
    imo_no: i64,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "VesselType")]
    vessel_type: i64,
    #[serde(rename = "DWT", default)]
    dwt: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReferenceFixture {
    #[serde(rename = "RowID")]
    row_id: i64,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "VesselTypeID")]
    vessel_type_id: i64,
    #[serde(rename = "Size", default)]
    size: String,
    #[serde(rename = "Traj", default)]
    traj: String,
    #[serde(default)]
    a: Option<Value>,
    #[serde(default)]
    b: Option<Value>,
    #[serde(default)]
    c: Option<Value>,
    #[serde(default)]
    d: Option<Value>,
    #[serde(default)]
    e: Option<Value>,
}

/// Source keys of the totals kept on each observation.
const TOTAL_KEYS: [&str; 7] = [
    "TotT2WCO2",
    "ToTW2WCO2",
    "TotSOx",
    "TotNOx",
    "TotPM10",
    "TotCh4",
    "TotN2O",
];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load all three fixture files from `dir`.
pub async fn load_dir(db: &Database, dir: &Path) -> Result<LoadSummary, DbError> {
    let vessels = load_vessels(db, &read_file(&dir.join(VESSELS_FILE))?).await?;
    let reference_lines =
        load_reference_lines(db, &read_file(&dir.join(REFERENCE_FILE))?).await?;
    let (emissions, skipped_emissions) =
        load_emissions(db, &read_file(&dir.join(EMISSIONS_FILE))?).await?;

    let summary = LoadSummary {
        vessels,
        reference_lines,
        emissions,
        skipped_emissions,
    };
    tracing::info!(
        dir = %dir.display(),
        vessels,
        reference_lines,
        emissions,
        skipped_emissions,
        "Fixtures loaded",
    );
    Ok(summary)
}

/// Upsert vessels by IMO number. Returns the number of records read.
pub async fn load_vessels(db: &Database, json: &str) -> Result<usize, DbError> {
    let fixtures: Vec<VesselFixture> = parse_json(VESSELS_FILE, json)?;

    for fixture in &fixtures {
        let record = format!("vessel IMO {}", fixture.imo_no);
        let capacity = parse_number(&record, "DWT", fixture.dwt.as_ref())?;
        VesselRepo::upsert_by_imo(
            db,
            UpsertVessel {
                imo_no: fixture.imo_no,
                name: fixture.name.clone(),
                vessel_type: fixture.vessel_type,
                capacity,
            },
        )
        .await;
    }

    tracing::debug!(count = fixtures.len(), "Vessels loaded");
    Ok(fixtures.len())
}

/// Upsert reference lines by row id, trimming size and trajectory tags.
///
/// A non-numeric coefficient fails the whole load with
/// `MalformedCoefficientRow`.
pub async fn load_reference_lines(db: &Database, json: &str) -> Result<usize, DbError> {
    let fixtures: Vec<ReferenceFixture> = parse_json(REFERENCE_FILE, json)?;

    for fixture in &fixtures {
        let row = fixture.row_id.to_string();
        let line = ReferenceLine {
            id: fixture.row_id,
            category: fixture.category.trim().to_string(),
            vessel_type_id: fixture.vessel_type_id,
            size: fixture.size.trim().to_string(),
            traj: fixture.traj.trim().to_string(),
            a: decimal::parse_json_field(&row, "a", fixture.a.as_ref())?,
            b: decimal::parse_json_field(&row, "b", fixture.b.as_ref())?,
            c: decimal::parse_json_field(&row, "c", fixture.c.as_ref())?,
            d: decimal::parse_json_field(&row, "d", fixture.d.as_ref())?,
            e: decimal::parse_json_field(&row, "e", fixture.e.as_ref())?,
        };
        ReferenceLineRepo::upsert(db, line).await;
    }

    tracing::debug!(count = fixtures.len(), "Reference lines loaded");
    Ok(fixtures.len())
}

/// Upsert emission observations by emission id.
///
/// Returns `(loaded, skipped)`. Records are skipped when their vessel IMO is
/// unknown or a field cannot be parsed.
pub async fn load_emissions(db: &Database, json: &str) -> Result<(usize, usize), DbError> {
    let records: Vec<Map<String, Value>> = parse_json(EMISSIONS_FILE, json)?;
    let mut loaded = 0;
    let mut skipped = 0;

    for record in &records {
        let eid = record.get("EID").cloned().unwrap_or(Value::Null);
        let imo_no = match record.get("VesselID").and_then(as_i64) {
            Some(imo) => imo,
            None => {
                tracing::warn!(eid = %eid, "Emission record has no vessel IMO, skipping");
                skipped += 1;
                continue;
            }
        };

        let Some(vessel) = VesselRepo::find_by_imo(db, imo_no).await else {
            tracing::warn!(eid = %eid, imo_no, "Vessel not found, skipping emission record");
            skipped += 1;
            continue;
        };

        match parse_emission(record, vessel.id) {
            Ok(observation) => {
                EmissionRepo::upsert(db, observation).await;
                loaded += 1;
            }
            Err(e) => {
                tracing::warn!(eid = %eid, error = %e, "Invalid emission record, skipping");
                skipped += 1;
            }
        }
    }

    tracing::debug!(loaded, skipped, "Emission records loaded");
    Ok((loaded, skipped))
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, DbError> {
    std::fs::read_to_string(path).map_err(|source| DbError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(file: &str, json: &str) -> Result<T, DbError> {
    serde_json::from_str(json).map_err(|source| DbError::Json {
        file: file.to_string(),
        source,
    })
}

/// Integers may arrive as JSON numbers or numeric strings.
fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Same parsing as reference coefficients, reported as an invalid field.
fn parse_number(
    record: &str,
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<Decimal>, DbError> {
    decimal::parse_json_field(record, field, value).map_err(|e| match e {
        CoreError::MalformedCoefficientRow { row, field, value } => DbError::InvalidField {
            record: row,
            field,
            value,
        },
        other => DbError::Core(other),
    })
}

/// Parse RFC 3339, or a naive ISO timestamp taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_timestamp_field(
    record: &str,
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Timestamp, DbError> {
    let value = map.get(field).cloned().unwrap_or(Value::Null);
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| DbError::InvalidField {
            record: record.to_string(),
            field,
            value: value.to_string(),
        })
}

fn parse_emission(
    map: &Map<String, Value>,
    vessel_id: i64,
) -> Result<EmissionObservation, DbError> {
    let eid_value = map.get("EID").cloned().unwrap_or(Value::Null);
    let record = format!("emission {eid_value}");
    let id = as_i64(&eid_value).ok_or_else(|| DbError::InvalidField {
        record: record.clone(),
        field: "EID",
        value: eid_value.to_string(),
    })?;
    let log_id = map.get("LOGID").and_then(as_i64).unwrap_or_default();

    let mut totals = [Decimal::ZERO; 7];
    for (slot, key) in totals.iter_mut().zip(TOTAL_KEYS) {
        *slot = parse_number(&record, key, map.get(key))?.unwrap_or(Decimal::ZERO);
    }
    let [tot_t2w_co2, tot_w2w_co2, tot_sox, tot_nox, tot_pm, tot_ch4, tot_n2o] = totals;

    Ok(EmissionObservation {
        id,
        vessel_id,
        log_id,
        from_utc: parse_timestamp_field(&record, map, "FromUTC")?,
        to_utc: parse_timestamp_field(&record, map, "TOUTC")?,
        totals: EmissionTotals {
            tot_t2w_co2,
            tot_w2w_co2,
            tot_sox,
            tot_nox,
            tot_pm,
            tot_ch4,
            tot_n2o,
        },
    })
}
