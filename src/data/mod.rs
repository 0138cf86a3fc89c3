//! Data layer: core types, loading, extraction, and filtering.
//!
//! Architecture:
//! ```text
//!  coastlines.csv   plates.csv   earthquakes.{csv,json,parquet}
//!        │              │                 │
//!        ▼              ▼                 ▼
//!   ┌───────────────────────────────────────────┐
//!   │  loader   parse file → Coastline /        │
//!   │           PlateBoundaries / Catalogue     │
//!   └───────────────────────────────────────────┘
//!                                         │
//!                       ┌─────────────────┼──────────────┐
//!                       ▼                 ▼              ▼
//!                 ┌──────────┐      ┌──────────┐   ┌──────────┐
//!                 │ extract  │      │  filter  │   │  writer  │
//!                 └──────────┘      └──────────┘   └──────────┘
//!                 QuakeFields       Catalogue subset  .csv / .parquet
//! ```
//!
//! `time` holds the date-time grammar shared by `extract` and `filter`.

pub mod extract;
pub mod filter;
pub mod loader;
pub mod model;
pub mod time;
pub mod writer;
