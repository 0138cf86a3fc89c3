use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};

use super::extract::{DEPTH_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN, MAGNITUDE_COLUMN};
use super::model::Catalogue;
use super::time::{parse_time_column, TIME_COLUMN};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter predicate: optional inclusive bounds per column
// ---------------------------------------------------------------------------

/// Inclusive range predicates over an earthquake catalogue.
///
/// A bound left as `None` places no constraint on its column. Bounds are
/// combined conjunctively, so the order they are set in does not matter.
/// An inverted range (`lower > upper`) selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuakeSelection {
    pub times: Option<RangeInclusive<DateTime<Utc>>>,
    pub lons: Option<RangeInclusive<f64>>,
    pub lats: Option<RangeInclusive<f64>>,
    pub depths: Option<RangeInclusive<f64>>,
    pub mags: Option<RangeInclusive<f64>>,
}

impl QuakeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.times = Some(start..=end);
        self
    }

    pub fn lons(mut self, lower: f64, upper: f64) -> Self {
        self.lons = Some(lower..=upper);
        self
    }

    pub fn lats(mut self, lower: f64, upper: f64) -> Self {
        self.lats = Some(lower..=upper);
        self
    }

    pub fn depths(mut self, lower: f64, upper: f64) -> Self {
        self.depths = Some(lower..=upper);
        self
    }

    pub fn mags(mut self, lower: f64, upper: f64) -> Self {
        self.mags = Some(lower..=upper);
        self
    }

    /// True when no bound is set, i.e. the selection keeps every row.
    pub fn is_unbounded(&self) -> bool {
        self.times.is_none()
            && self.lons.is_none()
            && self.lats.is_none()
            && self.depths.is_none()
            && self.mags.is_none()
    }

    fn numeric_bounds(&self) -> impl Iterator<Item = (&'static str, &RangeInclusive<f64>)> {
        [
            (LONGITUDE_COLUMN, self.lons.as_ref()),
            (LATITUDE_COLUMN, self.lats.as_ref()),
            (DEPTH_COLUMN, self.depths.as_ref()),
            (MAGNITUDE_COLUMN, self.mags.as_ref()),
        ]
        .into_iter()
        .filter_map(|(column, range)| range.map(|r| (column, r)))
    }

    /// Columns a catalogue must have for this selection to apply.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        if self.times.is_some() {
            columns.push(TIME_COLUMN);
        }
        columns.extend(self.numeric_bounds().map(|(column, _)| column));
        columns
    }
}

/// Return indices of rows that pass every bound in `selection`, in row order.
///
/// A `NaN` or missing value never lies within a bound. When `times` is set
/// the `Time` column is reparsed here, with the same errors as
/// [`parse_time_column`].
pub fn filtered_indices(catalogue: &Catalogue, selection: &QuakeSelection) -> Result<Vec<usize>> {
    catalogue.require_columns(&selection.required_columns())?;

    let times = match &selection.times {
        Some(range) => Some((range, parse_time_column(catalogue)?)),
        None => None,
    };
    let numeric = selection
        .numeric_bounds()
        .map(|(column, range)| -> Result<_> { Ok((range, catalogue.numeric_column(column)?)) })
        .collect::<Result<Vec<_>>>()?;

    let indices = (0..catalogue.len())
        .filter(|&row| {
            if let Some((range, values)) = &times {
                if !range.contains(&values[row]) {
                    return false;
                }
            }
            numeric
                .iter()
                .all(|(range, values)| range.contains(&values[row]))
        })
        .collect();
    Ok(indices)
}

/// Extract the subset of `catalogue` matching `selection`.
///
/// The result keeps every column and the original row order. With no bounds
/// set the catalogue is returned unchanged.
pub fn select_quake_subset(catalogue: &Catalogue, selection: &QuakeSelection) -> Result<Catalogue> {
    if selection.is_unbounded() {
        return Ok(catalogue.clone());
    }
    let indices = filtered_indices(catalogue, selection)?;
    log::debug!(
        "selection kept {} of {} events",
        indices.len(),
        catalogue.len()
    );
    catalogue.take(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnData};
    use crate::error::CatalogueError;
    use chrono::TimeZone;

    fn catalogue() -> Catalogue {
        Catalogue::from_columns(vec![
            Column::new(
                "Time",
                ColumnData::Text(
                    [
                        "2000-10-31T01:30:00.000-05:00",
                        "2001-01-01T00:00:00",
                        "2002-06-15 12:00:00",
                        "2003-03-03T03:03:03Z",
                        "2004-12-26T00:58:53.450",
                    ]
                    .iter()
                    .map(|s| Some(s.to_string()))
                    .collect(),
                ),
            ),
            Column::new(
                "Latitude",
                ColumnData::Float(vec![Some(10.0), Some(-5.0), Some(35.5), Some(0.0), Some(3.3)]),
            ),
            Column::new(
                "Longitude",
                ColumnData::Float(vec![Some(-120.0), Some(150.0), Some(139.7), Some(0.0), Some(95.9)]),
            ),
            Column::new(
                "Depth",
                ColumnData::Integer(vec![Some(10), Some(600), Some(35), None, Some(30)]),
            ),
            Column::new(
                "Magnitude",
                ColumnData::Float(vec![Some(3.0), Some(5.0), Some(6.8), Some(2.9), Some(9.1)]),
            ),
            Column::new(
                "id",
                ColumnData::Text((0..5).map(|i| Some(format!("ev{i}"))).collect()),
            ),
        ])
        .unwrap()
    }

    fn ids(cat: &Catalogue) -> Vec<String> {
        (0..cat.len())
            .map(|row| cat.value(row, "id").unwrap().to_string())
            .collect()
    }

    #[test]
    fn no_bounds_is_identity() {
        let cat = catalogue();
        assert_eq!(select_quake_subset(&cat, &QuakeSelection::new()).unwrap(), cat);
    }

    #[test]
    fn magnitude_band_is_inclusive() {
        let cat = catalogue();
        let sub = select_quake_subset(&cat, &QuakeSelection::new().mags(3.0, 5.0)).unwrap();
        assert_eq!(ids(&sub), vec!["ev0", "ev1"]);
        for mag in sub.numeric_column("Magnitude").unwrap() {
            assert!((3.0..=5.0).contains(&mag));
        }
        assert_eq!(sub.column_names(), cat.column_names());
    }

    #[test]
    fn bounds_commute() {
        let cat = catalogue();
        let lons_then_mags = select_quake_subset(
            &select_quake_subset(&cat, &QuakeSelection::new().lons(-130.0, 140.0)).unwrap(),
            &QuakeSelection::new().mags(2.0, 7.0),
        )
        .unwrap();
        let mags_then_lons = select_quake_subset(
            &select_quake_subset(&cat, &QuakeSelection::new().mags(2.0, 7.0)).unwrap(),
            &QuakeSelection::new().lons(-130.0, 140.0),
        )
        .unwrap();
        let together =
            select_quake_subset(&cat, &QuakeSelection::new().mags(2.0, 7.0).lons(-130.0, 140.0))
                .unwrap();

        assert_eq!(lons_then_mags, mags_then_lons);
        assert_eq!(lons_then_mags, together);
        assert_eq!(ids(&together), vec!["ev0", "ev2", "ev3"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let cat = catalogue();
        let selection = QuakeSelection::new().lats(-10.0, 20.0).depths(0.0, 100.0);
        let once = select_quake_subset(&cat, &selection).unwrap();
        let twice = select_quake_subset(&once, &selection).unwrap();
        assert_eq!(once, twice);
        // ev3 has no depth and never satisfies a depth bound.
        assert_eq!(ids(&once), vec!["ev0", "ev4"]);
    }

    #[test]
    fn time_bounds_compare_normalized_instants() {
        let cat = catalogue();
        let start = Utc.with_ymd_and_hms(2000, 10, 31, 6, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2002, 6, 15, 12, 0, 0).unwrap();
        let sub = select_quake_subset(&cat, &QuakeSelection::new().times(start, end)).unwrap();
        assert_eq!(ids(&sub), vec!["ev0", "ev1", "ev2"]);
        // The time column keeps its original text.
        assert_eq!(
            sub.value(0, "Time"),
            Some(CellValue::Text("2000-10-31T01:30:00.000-05:00".into()))
        );
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let sub = select_quake_subset(&catalogue(), &QuakeSelection::new().lats(10.0, -10.0)).unwrap();
        assert!(sub.is_empty());
        assert_eq!(sub.columns().len(), 6);
    }

    #[test]
    fn missing_filtered_columns_are_reported() {
        let cat = catalogue();
        let no_depth = Catalogue::from_columns(
            cat.columns()
                .iter()
                .filter(|c| c.name != "Depth" && c.name != "Time")
                .cloned()
                .collect(),
        )
        .unwrap();

        // Bounds on present columns still work.
        assert!(select_quake_subset(&no_depth, &QuakeSelection::new().mags(0.0, 10.0)).is_ok());

        let selection = QuakeSelection::new()
            .depths(0.0, 10.0)
            .times(Utc::now(), Utc::now());
        match select_quake_subset(&no_depth, &selection) {
            Err(CatalogueError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["Time".to_string(), "Depth".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unparseable_time_fails_the_time_filter_only() {
        let mut columns = catalogue().columns().to_vec();
        columns[0] = Column::new(
            "Time",
            ColumnData::Text(vec![
                Some("2001-01-01T00:00:00".into()),
                Some("garbage".into()),
                Some("2001-01-01T00:00:00".into()),
                Some("2001-01-01T00:00:00".into()),
                Some("2001-01-01T00:00:00".into()),
            ]),
        );
        let cat = Catalogue::from_columns(columns).unwrap();

        assert!(select_quake_subset(&cat, &QuakeSelection::new().mags(0.0, 10.0)).is_ok());
        let err = select_quake_subset(
            &cat,
            &QuakeSelection::new().times(Utc::now(), Utc::now()),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidTime { row: 1, .. }));
    }
}
