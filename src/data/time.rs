//! Heterogeneous date-time parsing for catalogue `Time` columns.
//!
//! Catalogues mix formats within one column (with or without fractional
//! seconds, with or without a UTC offset), so each value is tried against an
//! ordered list of grammars instead of a single format string. Every instant
//! is normalized to UTC; values without an offset are taken to be UTC already.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::model::Catalogue;
use crate::error::{CatalogueError, Result};

/// Name of the catalogue column holding origin times.
pub const TIME_COLUMN: &str = "Time";

/// Formats carrying an explicit UTC offset. `%.f` also matches no fraction.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse one time string into a UTC instant, or `None` if no grammar matches.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parse the whole `Time` column, one instant per row in row order.
///
/// Fails on the first empty or unparseable cell, naming its row.
pub fn parse_time_column(catalogue: &Catalogue) -> Result<Vec<DateTime<Utc>>> {
    catalogue.require_columns(&[TIME_COLUMN])?;
    let mut times = Vec::with_capacity(catalogue.len());
    for row in 0..catalogue.len() {
        let cell = catalogue
            .value(row, TIME_COLUMN)
            .filter(|c| !c.is_null())
            .ok_or(CatalogueError::MissingTime { row })?;
        let text = cell.to_string();
        let instant = parse_instant(&text).ok_or(CatalogueError::InvalidTime { row, value: text })?;
        times.push(instant);
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        assert_eq!(
            parse_instant("2000-10-31T01:30:00.000-05:00"),
            Some(utc(2000, 10, 31, 6, 30, 0))
        );
        assert_eq!(
            parse_instant("2000-10-31 01:30:00+0200"),
            Some(utc(2000, 10, 30, 23, 30, 0))
        );
    }

    #[test]
    fn naive_values_are_taken_as_utc() {
        assert_eq!(parse_instant("2001-01-01T00:00:00"), Some(utc(2001, 1, 1, 0, 0, 0)));
        assert_eq!(parse_instant("2001-01-01 12:15"), Some(utc(2001, 1, 1, 12, 15, 0)));
        assert_eq!(parse_instant("  2001-01-01  "), Some(utc(2001, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn fractional_seconds_and_zulu_are_accepted() {
        let parsed = parse_instant("2010-02-27T06:34:11.530Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 530);
        assert_eq!(
            parse_instant("2010-02-27 06:34:11.530"),
            Some(parsed)
        );
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_instant("yesterday"), None);
        assert_eq!(parse_instant("2001-13-45T00:00:00"), None);
        assert_eq!(parse_instant(""), None);
    }

    #[test]
    fn column_errors_name_the_row() {
        let cat = crate::data::model::Catalogue::from_columns(vec![Column::new(
            TIME_COLUMN,
            ColumnData::Text(vec![
                Some("2001-01-01T00:00:00".into()),
                None,
                Some("not a time".into()),
            ]),
        )])
        .unwrap();
        assert!(matches!(
            parse_time_column(&cat),
            Err(CatalogueError::MissingTime { row: 1 })
        ));

        let cat = cat.take(&[0, 2]).unwrap();
        match parse_time_column(&cat) {
            Err(CatalogueError::InvalidTime { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "not a time");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
