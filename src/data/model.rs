use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CatalogueError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a catalogue
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a CSV column can take.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" so floats survive a CSV round trip.
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnData – one typed column, missing cells as `None`
// ---------------------------------------------------------------------------

/// Semantic type of a column, inferred once per column at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Infer the narrowest column type that holds every non-null cell.
    ///
    /// Integers widen to floats when mixed; any other mix falls back to text.
    /// A column with no values at all is treated as an all-missing float column.
    pub fn from_cells(cells: Vec<CellValue>) -> Self {
        let mut ints = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut texts = 0usize;
        for cell in &cells {
            match cell {
                CellValue::Integer(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::Text(_) => texts += 1,
                CellValue::Null => {}
            }
        }

        if texts == 0 && bools == 0 && floats == 0 && ints > 0 {
            return ColumnData::Integer(
                cells
                    .into_iter()
                    .map(|c| match c {
                        CellValue::Integer(i) => Some(i),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if texts == 0 && bools == 0 {
            return ColumnData::Float(cells.iter().map(CellValue::as_f64).collect());
        }
        if texts == 0 && ints == 0 && floats == 0 {
            return ColumnData::Bool(
                cells
                    .into_iter()
                    .map(|c| match c {
                        CellValue::Bool(b) => Some(b),
                        _ => None,
                    })
                    .collect(),
            );
        }
        ColumnData::Text(
            cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Null => None,
                    CellValue::Text(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row`, or `None` when out of bounds.
    pub fn cell(&self, row: usize) -> Option<CellValue> {
        let value = match self {
            ColumnData::Integer(v) => v.get(row)?.map_or(CellValue::Null, CellValue::Integer),
            ColumnData::Float(v) => v.get(row)?.map_or(CellValue::Null, CellValue::Float),
            ColumnData::Bool(v) => v.get(row)?.map_or(CellValue::Null, CellValue::Bool),
            ColumnData::Text(v) => v
                .get(row)?
                .as_ref()
                .map_or(CellValue::Null, |s| CellValue::Text(s.clone())),
        };
        Some(value)
    }

    /// Numeric view of the column; missing cells become `NaN`.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Integer(v) => Some(
                v.iter()
                    .map(|c| c.map_or(f64::NAN, |i| i as f64))
                    .collect(),
            ),
            ColumnData::Float(v) => Some(v.iter().map(|c| c.unwrap_or(f64::NAN)).collect()),
            ColumnData::Bool(_) | ColumnData::Text(_) => None,
        }
    }

    /// Copy the rows at `indices`, in the order given. Callers bound-check.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(pick(v, indices)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, indices)),
            ColumnData::Bool(v) => ColumnData::Bool(pick(v, indices)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, indices)),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalogue – the complete loaded table
// ---------------------------------------------------------------------------

/// A named column of a [`Catalogue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }
}

/// An ordered, row-indexed table with an arbitrary schema.
///
/// Columns keep their file order and all share the same row count.
/// Required columns are checked where they are used, not at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    columns: Vec<Column>,
    rows: usize,
}

impl Catalogue {
    /// Build a catalogue, rejecting columns of differing length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.data.len());
        if let Some(bad) = columns.iter().find(|c| c.data.len() != rows) {
            return Err(CatalogueError::ColumnLength {
                column: bad.name.clone(),
                expected: rows,
                found: bad.data.len(),
            });
        }
        Ok(Catalogue { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// First column called `name`.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cell at (`row`, `name`), if both exist.
    pub fn value(&self, row: usize, name: &str) -> Option<CellValue> {
        self.column(name)?.data.cell(row)
    }

    /// Fail with every absent name if any of `names` is not a column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| self.column(n).is_none())
            .map(|n| n.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatalogueError::MissingColumns { columns: missing })
        }
    }

    /// Numeric values of column `name`, missing cells as `NaN`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .column(name)
            .ok_or_else(|| CatalogueError::MissingColumns {
                columns: vec![name.to_string()],
            })?;
        column
            .data
            .to_f64()
            .ok_or_else(|| CatalogueError::NonNumericColumn {
                column: name.to_string(),
            })
    }

    /// New catalogue holding the rows at `indices` with the same schema.
    ///
    /// Fails on the first index past the last row.
    pub fn take(&self, indices: &[usize]) -> Result<Catalogue> {
        if let Some(&row) = indices.iter().find(|&&i| i >= self.rows) {
            return Err(CatalogueError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(Catalogue {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
                .collect(),
            rows: indices.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Geographic datasets
// ---------------------------------------------------------------------------

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Coordinate { lon, lat }
    }

    /// `[lon, lat]`, one row of an N×2 array.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Coastline vertices as two parallel sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coastline {
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
}

impl Coastline {
    pub fn len(&self) -> usize {
        self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lons.is_empty()
    }
}

/// Plate name → boundary polyline in file order.
pub type PlateBoundaries = BTreeMap<String, Vec<Coordinate>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalogue {
        Catalogue::from_columns(vec![
            Column::new("id", ColumnData::Integer(vec![Some(1), Some(2), Some(3)])),
            Column::new(
                "place",
                ColumnData::Text(vec![Some("a".into()), None, Some("c".into())]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn integers_widen_to_float_when_mixed() {
        let data = ColumnData::from_cells(vec![
            CellValue::Integer(2),
            CellValue::Null,
            CellValue::Float(2.5),
        ]);
        assert_eq!(data, ColumnData::Float(vec![Some(2.0), None, Some(2.5)]));
    }

    #[test]
    fn mixed_kinds_fall_back_to_text() {
        let data = ColumnData::from_cells(vec![
            CellValue::Integer(7),
            CellValue::Text("M4".into()),
        ]);
        assert_eq!(data, ColumnData::Text(vec![Some("7".into()), Some("M4".into())]));
    }

    #[test]
    fn all_missing_column_is_float() {
        let data = ColumnData::from_cells(vec![CellValue::Null, CellValue::Null]);
        assert_eq!(data.column_type(), ColumnType::Float);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Catalogue::from_columns(vec![
            Column::new("a", ColumnData::Float(vec![Some(1.0)])),
            Column::new("b", ColumnData::Float(vec![])),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::ColumnLength { ref column, expected: 1, found: 0 } if column == "b"
        ));
    }

    #[test]
    fn require_columns_names_every_missing_column() {
        let err = sample()
            .require_columns(&["id", "Depth", "Time"])
            .unwrap_err();
        match err {
            CatalogueError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["Depth".to_string(), "Time".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn numeric_column_rejects_text() {
        let err = sample().numeric_column("place").unwrap_err();
        assert!(matches!(err, CatalogueError::NonNumericColumn { .. }));
        assert_eq!(sample().numeric_column("id").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn take_keeps_schema_and_requested_order() {
        let cat = sample();
        let sub = cat.take(&[2, 0]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.column_names(), vec!["id", "place"]);
        assert_eq!(sub.value(0, "id"), Some(CellValue::Integer(3)));
        assert_eq!(sub.value(1, "place"), Some(CellValue::Text("a".into())));
    }

    #[test]
    fn take_rejects_rows_past_the_end() {
        let cat = sample();
        match cat.take(&[0, 3]) {
            Err(CatalogueError::RowOutOfRange { row, rows }) => {
                assert_eq!(row, 3);
                assert_eq!(rows, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(cat.take(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_cells_read_as_null() {
        assert_eq!(sample().value(1, "place"), Some(CellValue::Null));
        assert_eq!(sample().value(9, "place"), None);
    }
}
