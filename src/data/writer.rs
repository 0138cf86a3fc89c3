use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Catalogue, ColumnData};
use crate::error::{CatalogueError, Result};

const EARTHQUAKE: &str = "earthquake";

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| CatalogueError::Io {
        what: EARTHQUAKE,
        path: path.to_path_buf(),
        source,
    })
}

/// Write a catalogue (or a filtered subset) as comma-separated text.
///
/// The header row holds the column names; missing cells are left empty.
///
/// Text carries no type tag, so reloading re-infers each column: a text
/// column whose values all look numeric (`"007"`) comes back as numbers, and
/// an empty string comes back missing. Use Parquet to keep column types.
pub fn write_catalogue_csv(path: impl AsRef<Path>, catalogue: &Catalogue) -> Result<()> {
    let path = path.as_ref();
    let to_error = |e| CatalogueError::from_csv(EARTHQUAKE, path.to_path_buf(), e);

    let mut writer = csv::Writer::from_writer(create(path)?);
    writer
        .write_record(catalogue.column_names())
        .map_err(to_error)?;
    for row in 0..catalogue.len() {
        let record = catalogue.columns().iter().map(|c| {
            c.data
                .cell(row)
                .map(|cell| cell.to_string())
                .unwrap_or_default()
        });
        writer.write_record(record).map_err(to_error)?;
    }
    writer.flush().map_err(|source| CatalogueError::Io {
        what: EARTHQUAKE,
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("wrote {} events to {}", catalogue.len(), path.display());
    Ok(())
}

/// Write a catalogue as a single-row-group Parquet file with nullable columns.
pub fn write_catalogue_parquet(path: impl AsRef<Path>, catalogue: &Catalogue) -> Result<()> {
    let path = path.as_ref();

    let fields: Vec<Field> = catalogue
        .columns()
        .iter()
        .map(|c| {
            let data_type = match c.data {
                ColumnData::Integer(_) => DataType::Int64,
                ColumnData::Float(_) => DataType::Float64,
                ColumnData::Bool(_) => DataType::Boolean,
                ColumnData::Text(_) => DataType::Utf8,
            };
            Field::new(c.name.clone(), data_type, true)
        })
        .collect();
    let arrays: Vec<ArrayRef> = catalogue
        .columns()
        .iter()
        .map(|c| match &c.data {
            ColumnData::Integer(v) => Arc::new(Int64Array::from(v.clone())) as ArrayRef,
            ColumnData::Float(v) => Arc::new(Float64Array::from(v.clone())) as ArrayRef,
            ColumnData::Bool(v) => Arc::new(BooleanArray::from(v.clone())) as ArrayRef,
            ColumnData::Text(v) => Arc::new(StringArray::from(v.clone())) as ArrayRef,
        })
        .collect();

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).map_err(|source| {
        CatalogueError::Arrow {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let parquet_error = |source| CatalogueError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let file = create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None).map_err(parquet_error)?;
    writer.write(&batch).map_err(parquet_error)?;
    writer.close().map_err(parquet_error)?;

    log::info!("wrote {} events to {}", catalogue.len(), path.display());
    Ok(())
}
