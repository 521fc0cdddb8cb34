//! Reader for the cached city coordinate file (`city,lat,lon`).
//!
//! Row order is preserved; it decides nearest-city tie breaks.

use std::io::Read;
use std::path::Path;

use crime_link_profile_models::CityLocation;

use crate::IngestError;

/// Reads city coordinates from CSV.
///
/// # Errors
///
/// Returns [`IngestError`] if the CSV is malformed or a coordinate is not
/// a finite number.
pub fn read_city_locations<R: Read>(reader: R) -> Result<Vec<CityLocation>, IngestError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let mut locations = Vec::new();

    for row in csv.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let location: CityLocation = row.deserialize(Some(&headers))?;

        if !location.lat.is_finite() || !location.lon.is_finite() {
            return Err(IngestError::MalformedRecord {
                line,
                message: format!("non-finite coordinate for {}", location.name),
            });
        }

        locations.push(location);
    }

    Ok(locations)
}

/// Reads city coordinates from a CSV file.
///
/// # Errors
///
/// See [`read_city_locations`].
pub fn read_city_locations_path(path: &Path) -> Result<Vec<CityLocation>, IngestError> {
    let file = std::fs::File::open(path)?;
    let locations = read_city_locations(file)?;
    log::info!("Read {} city coordinates from {}", locations.len(), path.display());
    Ok(locations)
}
