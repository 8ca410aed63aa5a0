//! CSV import of parcel lists.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::parcel::Parcel;

/// Failure to load a parcel list.
#[derive(Error, Debug)]
pub enum ParcelError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parcel row {row}: {source}")]
    Row {
        /// 1-based data row (the header is row 0).
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Reads parcels from a CSV file with a header row.
///
/// Expected columns: `id,name,location,acres,slope,sunlight_hours,
/// grid_distance_km,suitability_score`; `location`, `slope`,
/// `grid_distance_km` and `suitability_score` may be empty.
///
/// # Errors
///
/// Returns a `ParcelError` if the file cannot be opened or a row does not
/// parse.
pub fn read_parcels_csv(path: &Path) -> Result<Vec<Parcel>, ParcelError> {
    let file = File::open(path).map_err(|source| ParcelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_parcels(file)
}

/// Reads parcels from any CSV source with a header row.
///
/// # Errors
///
/// Returns `ParcelError::Row` for the first row that does not parse.
pub fn parse_parcels(reader: impl Read) -> Result<Vec<Parcel>, ParcelError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize()
        .enumerate()
        .map(|(i, rec)| rec.map_err(|source| ParcelError::Row { row: i + 1, source }))
        .collect()
}
