//! Cleaned incident record reader.
//!
//! Expected header (extra columns are ignored, so the raw homicide export
//! with `victim_last`, `state`, `lat`, etc. reads as-is):
//!
//! ```text
//! uid,reported_date,victim_race,victim_age,victim_sex,city
//! ```

use std::io::Read;
use std::path::Path;

use crime_link_profile_models::IncidentRecord;
use serde::Deserialize;

use crate::IngestError;
use crate::parsing::{parse_age, parse_report_date};

/// A CSV row before field validation.
#[derive(Debug, Deserialize)]
struct RawIncident {
    uid: String,
    reported_date: String,
    city: String,
    victim_race: String,
    victim_age: String,
    victim_sex: String,
}

/// Reads incident records from CSV.
///
/// # Errors
///
/// Returns [`IngestError`] if the CSV is malformed, a required column is
/// missing, or a date or age cannot be parsed.
pub fn read_incidents<R: Read>(reader: R) -> Result<Vec<IncidentRecord>, IngestError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let mut records = Vec::new();

    for row in csv.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let raw: RawIncident = row.deserialize(Some(&headers))?;
        records.push(validate(raw, line)?);
    }

    Ok(records)
}

/// Reads incident records from a CSV file.
///
/// # Errors
///
/// See [`read_incidents`].
pub fn read_incidents_path(path: &Path) -> Result<Vec<IncidentRecord>, IngestError> {
    let file = std::fs::File::open(path)?;
    let records = read_incidents(file)?;
    log::info!("Read {} incident records from {}", records.len(), path.display());
    Ok(records)
}

fn validate(raw: RawIncident, line: u64) -> Result<IncidentRecord, IngestError> {
    let reported_date =
        parse_report_date(&raw.reported_date).ok_or_else(|| IngestError::MalformedRecord {
            line,
            message: format!("unparseable reported_date '{}'", raw.reported_date),
        })?;

    let victim_age = parse_age(&raw.victim_age).ok_or_else(|| IngestError::MalformedRecord {
        line,
        message: format!("unparseable victim_age '{}'", raw.victim_age),
    })?;

    if raw.city.is_empty() {
        return Err(IngestError::MalformedRecord {
            line,
            message: format!("record {} has no city", raw.uid),
        });
    }

    Ok(IncidentRecord {
        uid: raw.uid,
        city: raw.city,
        reported_date,
        victim_race: raw.victim_race,
        victim_sex: raw.victim_sex,
        victim_age,
    })
}
