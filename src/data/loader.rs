use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{
    Catalogue, CellValue, Coastline, Column, ColumnData, Coordinate, PlateBoundaries,
};
use crate::error::{CatalogueError, Result};

const COASTLINE: &str = "coastline";
const PLATE_BOUNDARY: &str = "plate-boundary";
const EARTHQUAKE: &str = "earthquake";

// ---------------------------------------------------------------------------
// Reader configuration
// ---------------------------------------------------------------------------

/// Options for the delimited-text readers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Field separator byte, `,` unless configured otherwise.
    pub delimiter: u8,
    /// Strip surrounding whitespace from every field.
    pub trim: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            delimiter: b',',
            trim: true,
        }
    }
}

fn open(what: &'static str, path: &Path) -> Result<File> {
    File::open(path).map_err(|source| CatalogueError::Io {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader(
    what: &'static str,
    path: &Path,
    options: &ReadOptions,
    has_headers: bool,
) -> Result<csv::Reader<File>> {
    let file = open(what, path)?;
    let trim = if options.trim {
        csv::Trim::All
    } else {
        csv::Trim::None
    };
    Ok(csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(has_headers)
        .trim(trim)
        .from_reader(file))
}

/// Deserialize every record of a headerless file into `T`, which must span
/// exactly `width` fields. Wider rows are rejected rather than truncated.
fn fixed_width_rows<T: serde::de::DeserializeOwned>(
    what: &'static str,
    path: &Path,
    reader: &mut csv::Reader<File>,
    width: usize,
) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CatalogueError::from_csv(what, path.to_path_buf(), e))?;
        if record.len() != width {
            return Err(CatalogueError::FieldCount {
                what,
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        let row = record
            .deserialize::<T>(None)
            .map_err(|e| CatalogueError::from_csv(what, path.to_path_buf(), e))?;
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Coastlines
// ---------------------------------------------------------------------------

/// Headerless `<lon>,<lat>` rows.
#[derive(Debug, Deserialize)]
struct CoastlineRow {
    lon: f64,
    lat: f64,
}

/// Read coastline longitudes and latitudes, in file order.
pub fn load_coastlines(path: impl AsRef<Path>) -> Result<Coastline> {
    load_coastlines_with(path, &ReadOptions::default())
}

pub fn load_coastlines_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Coastline> {
    let path = path.as_ref();
    let mut reader = csv_reader(COASTLINE, path, options, false)?;

    let mut coastline = Coastline::default();
    for row in fixed_width_rows::<CoastlineRow>(COASTLINE, path, &mut reader, 2)? {
        coastline.lons.push(row.lon);
        coastline.lats.push(row.lat);
    }

    log::debug!("loaded {} coastline points from {}", coastline.len(), path.display());
    Ok(coastline)
}

// ---------------------------------------------------------------------------
// Plate boundaries
// ---------------------------------------------------------------------------

/// Headerless `<name>,<lat>,<lon>` rows. Note latitude comes first on disk.
#[derive(Debug, Deserialize)]
struct PlateRow {
    name: String,
    lat: f64,
    lon: f64,
}

/// Read plate-boundary vertices grouped by plate name.
///
/// Each plate's vertices keep their file order, as (lon, lat) pairs.
pub fn load_plate_boundaries(path: impl AsRef<Path>) -> Result<PlateBoundaries> {
    load_plate_boundaries_with(path, &ReadOptions::default())
}

pub fn load_plate_boundaries_with(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<PlateBoundaries> {
    let path = path.as_ref();
    let mut reader = csv_reader(PLATE_BOUNDARY, path, options, false)?;

    let mut plates = PlateBoundaries::new();
    let rows = fixed_width_rows::<PlateRow>(PLATE_BOUNDARY, path, &mut reader, 3)?;
    let vertices = rows.len();
    for row in rows {
        plates
            .entry(row.name)
            .or_default()
            .push(Coordinate::new(row.lon, row.lat));
    }

    log::debug!(
        "loaded {} plates ({} vertices) from {}",
        plates.len(),
        vertices,
        path.display()
    );
    Ok(plates)
}

// ---------------------------------------------------------------------------
// Earthquake catalogues
// ---------------------------------------------------------------------------

/// Load an earthquake catalogue.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet table
/// * `.json`    – `[{ "Latitude": ..., "Time": "...", ... }, ...]`
/// * anything else – delimited text with a header row
pub fn load_catalogue(path: impl AsRef<Path>) -> Result<Catalogue> {
    load_catalogue_with(path, &ReadOptions::default())
}

/// Like [`load_catalogue`]; `options` applies to delimited text only.
pub fn load_catalogue_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Catalogue> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalogue = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        _ => load_csv(path, options)?,
    };
    log::debug!(
        "loaded {} events with {} columns from {}",
        catalogue.len(),
        catalogue.columns().len(),
        path.display()
    );
    Ok(catalogue)
}

// -- Delimited text --

fn load_csv(path: &Path, options: &ReadOptions) -> Result<Catalogue> {
    let to_error = |e| CatalogueError::from_csv(EARTHQUAKE, path.to_path_buf(), e);
    let mut reader = csv_reader(EARTHQUAKE, path, options, true)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(to_error)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Column-major raw text; the reader rejects rows whose width differs
    // from the header.
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result.map_err(to_error)?;
        for (column, value) in raw.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, values)| Column::new(name, infer_text_column(values)))
        .collect();
    Catalogue::from_columns(columns)
}

/// Type a column of raw text, keeping the original strings if it stays text.
fn infer_text_column(raw: Vec<String>) -> ColumnData {
    let cells = raw.iter().map(|s| guess_cell_type(s)).collect();
    match ColumnData::from_cells(cells) {
        ColumnData::Text(_) => {
            ColumnData::Text(raw.into_iter().map(|s| (!s.is_empty()).then_some(s)).collect())
        }
        typed => typed,
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

// -- JSON --

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout.
///
/// Columns appear in first-seen key order; a key absent from a record is a
/// missing cell.
fn load_json(path: &Path) -> Result<Catalogue> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        what: EARTHQUAKE,
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| CatalogueError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let shape_error = |message: String| CatalogueError::JsonShape {
        path: path.to_path_buf(),
        message,
    };

    let records = root
        .as_array()
        .ok_or_else(|| shape_error("expected top-level JSON array".to_string()))?;

    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut columns: Vec<(String, Vec<CellValue>)> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| shape_error(format!("row {i} is not a JSON object")))?;

        for (key, val) in obj {
            let idx = *index.entry(key.clone()).or_insert_with(|| {
                columns.push((key.clone(), vec![CellValue::Null; i]));
                columns.len() - 1
            });
            columns[idx].1.push(json_to_cell(val));
        }
        for (_, cells) in columns.iter_mut() {
            if cells.len() <= i {
                cells.push(CellValue::Null);
            }
        }
    }

    let columns = columns
        .into_iter()
        .map(|(name, cells)| Column::new(name, ColumnData::from_cells(cells)))
        .collect();
    Catalogue::from_columns(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// -- Parquet --

/// Load a flat Parquet table.
///
/// Integer columns become `Integer`, floating point `Float`, booleans `Bool`,
/// strings `Text`; any other Arrow type (timestamps, decimals, ...) is
/// rendered to text.
fn load_parquet(path: &Path) -> Result<Catalogue> {
    let parquet_error = |source| CatalogueError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_error = |source| CatalogueError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let file = open(EARTHQUAKE, path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_error)?;
    let mut columns: Vec<(String, Vec<CellValue>)> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();
    let reader = builder.build().map_err(parquet_error)?;

    for batch_result in reader {
        let batch = batch_result.map_err(arrow_error)?;
        for ((_, cells), array) in columns.iter_mut().zip(batch.columns()) {
            for row in 0..batch.num_rows() {
                cells.push(arrow_to_cell(array, row).map_err(arrow_error)?);
            }
        }
    }

    let columns = columns
        .into_iter()
        .map(|(name, cells)| Column::new(name, ColumnData::from_cells(cells)))
        .collect();
    Catalogue::from_columns(columns)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_cell(col: &ArrayRef, row: usize) -> std::result::Result<CellValue, ArrowError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Integer)
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        _ => CellValue::Text(array_value_to_string(col, row)?),
    };
    Ok(value)
}
