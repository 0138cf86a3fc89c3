use chrono::{DateTime, Utc};

use super::model::Catalogue;
use super::time::{parse_time_column, TIME_COLUMN};
use crate::error::Result;

pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const DEPTH_COLUMN: &str = "Depth";
pub const MAGNITUDE_COLUMN: &str = "Magnitude";

/// Columns every earthquake catalogue must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    LATITUDE_COLUMN,
    LONGITUDE_COLUMN,
    DEPTH_COLUMN,
    MAGNITUDE_COLUMN,
    TIME_COLUMN,
];

// ---------------------------------------------------------------------------
// QuakeFields – the five plotting columns as parallel arrays
// ---------------------------------------------------------------------------

/// Parallel per-event arrays, all in catalogue row order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeFields {
    /// Degrees.
    pub lats: Vec<f64>,
    /// Degrees.
    pub lons: Vec<f64>,
    /// Kilometres.
    pub depths: Vec<f64>,
    pub magnitudes: Vec<f64>,
    /// Origin times, normalized to UTC.
    pub times: Vec<DateTime<Utc>>,
}

impl QuakeFields {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Project latitude, longitude, depth, magnitude, and time out of a catalogue.
///
/// All required columns are checked up front and reported together. Missing
/// numeric cells become `NaN`; a missing or unparseable time is an error.
pub fn parse_earthquakes(catalogue: &Catalogue) -> Result<QuakeFields> {
    catalogue.require_columns(&REQUIRED_COLUMNS)?;

    let fields = QuakeFields {
        lats: catalogue.numeric_column(LATITUDE_COLUMN)?,
        lons: catalogue.numeric_column(LONGITUDE_COLUMN)?,
        depths: catalogue.numeric_column(DEPTH_COLUMN)?,
        magnitudes: catalogue.numeric_column(MAGNITUDE_COLUMN)?,
        times: parse_time_column(catalogue)?,
    };
    log::debug!("extracted fields for {} events", fields.len());
    Ok(fields)
}
