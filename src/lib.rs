//! Loading and range filtering of geophysical point datasets.
//!
//! Three kinds of file are read into memory: coastline polylines, tectonic
//! plate-boundary polylines, and earthquake catalogues. Catalogues can be
//! projected into typed per-event arrays or narrowed with inclusive range
//! bounds on time, position, depth, and magnitude.
//!
//! ```no_run
//! use quake_catalogue::{load_catalogue, select_quake_subset, QuakeSelection};
//!
//! let quakes = load_catalogue("earthquakes.csv")?;
//! let strong = select_quake_subset(&quakes, &QuakeSelection::new().mags(6.0, 10.0))?;
//! println!("{} of {} events", strong.len(), quakes.len());
//! # Ok::<(), quake_catalogue::CatalogueError>(())
//! ```
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod data;
pub mod error;
pub mod geometry;

pub use data::extract::{parse_earthquakes, QuakeFields, REQUIRED_COLUMNS};
pub use data::filter::{filtered_indices, select_quake_subset, QuakeSelection};
pub use data::loader::{
    load_catalogue, load_catalogue_with, load_coastlines, load_coastlines_with,
    load_plate_boundaries, load_plate_boundaries_with, ReadOptions,
};
pub use data::model::{
    Catalogue, CellValue, Coastline, Column, ColumnData, ColumnType, Coordinate, PlateBoundaries,
};
pub use data::time::{parse_instant, parse_time_column};
pub use data::writer::{write_catalogue_csv, write_catalogue_parquet};
pub use error::CatalogueError;
pub use geometry::{slope_degrees, SlopeError};
