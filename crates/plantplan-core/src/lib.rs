//! Planting-plan engine: zone geometry, assignment state, species totals,
//! pricing, colors and calendar tables.
//!
//! A drawing is imported as closed polygons, each becoming a zone. The user
//! assigns a species and planting density to zones; the engine keeps plant
//! totals per species current and builds the tables a document renderer
//! needs (order list, cost breakdown, planting calendar, image gallery).
//!
//! # Modules
//!
//! - [`geometry`] -- Polygon area (shoelace) and point containment (ray casting).
//! - [`registry`] -- [`ZoneRegistry`], the zone state machine.
//! - [`aggregate`] -- Species totals in `Live` and `Order` rounding, and pricing.
//! - [`palette`] -- Stable species-to-color bindings.
//! - [`calendar`] -- Month ranges to 12-cell calendar rows.
//! - [`gallery`] -- Image gallery layout.
//! - [`catalog`] -- [`SpeciesCatalog`] trait, [`StaticCatalog`] and the sample data.
//! - [`import`] -- [`BoundarySource`] trait for drawing import.
//! - [`session`] -- [`Session`], the aggregate every mutation goes through.
//! - [`config`] -- Configuration loading from `plantplan.yaml`.
//! - [`error`] -- [`PlanError`] and density validation.
//!
//! [`ZoneRegistry`]: registry::ZoneRegistry
//! [`SpeciesCatalog`]: catalog::SpeciesCatalog
//! [`StaticCatalog`]: catalog::StaticCatalog
//! [`BoundarySource`]: import::BoundarySource
//! [`Session`]: session::Session
//! [`PlanError`]: error::PlanError

pub mod aggregate;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod import;
pub mod palette;
pub mod registry;
pub mod session;

pub use catalog::{CatalogError, CatalogLookup, SpeciesCatalog, StaticCatalog, sample_catalog};
pub use config::{ConfigError, PlannerConfig};
pub use error::PlanError;
pub use import::{Boundary, BoundarySource, StaticBoundaries};
pub use session::{SelectionSummary, Session, SessionSettings};
