//! Shared type definitions for the plantplan planting engine.
//!
//! This crate is the single source of truth for the data exchanged between
//! the engine and its collaborators (drawing import, plant catalog, document
//! rendering). Types flow downstream to `TypeScript` via `ts-rs` for the
//! presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for zones and drawings
//! - [`enums`] -- Zone states, totals rounding modes, calendar markers
//! - [`structs`] -- Points, zones, species keys, catalog records, export tables

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CalendarMark, TotalsMode, ZoneState};
pub use ids::{DrawingId, ZoneId};
pub use structs::{
    CalendarRow, CostBreakdown, CostLine, GalleryCell, MONTHS_PER_YEAR, MonthRange, Point,
    SpeciesKey, SpeciesRecord, Zone,
};
