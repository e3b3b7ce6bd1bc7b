//! YAML plan files: zone boundaries, species assignments and an optional
//! inline catalog.
//!
//! ```yaml
//! zones:
//!   - [[0, 0], [10, 0], [10, 10], [0, 10]]
//!   - [[20, 0], [25, 0], [25, 4], [20, 4]]
//! assignments:
//!   - { zone: 0, species: rose, density: 5 }
//!   - { zone: 1, species: "Salvia nemerosa \"Schneehugel\"" }
//! catalog:
//!   - { name: Rose, quality: C2, unit_price: "3.50" }
//! ```
//!
//! An assignment without a density uses the catalog's suggested density.

use std::path::Path;

use plantplan_core::error::{parse_density, validate_density};
use plantplan_core::{Boundary, BoundarySource, PlanError, Session, SpeciesCatalog, StaticCatalog};
use plantplan_types::{Point, SpeciesRecord};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CliError;

/// A density as written in the plan file: a number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DensityInput {
    /// A numeric density.
    Number(f64),
    /// A density typed as text, parsed on use.
    Text(String),
}

impl DensityInput {
    /// Resolve to a validated density.
    fn resolve(&self) -> Result<f64, PlanError> {
        match self {
            Self::Number(value) => validate_density(*value),
            Self::Text(text) => parse_density(text),
        }
    }
}

/// One species assignment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    /// Index of the zone in the `zones` list.
    pub zone: usize,
    /// Species name as typed. Blank means unknown species.
    #[serde(default)]
    pub species: String,
    /// Plants per square metre. Absent means "ask the catalog".
    #[serde(default)]
    pub density: Option<DensityInput>,
}

/// A parsed plan file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanFile {
    /// Zone boundaries as `[x, y]` vertex lists, in drawing order.
    #[serde(default)]
    pub zones: Vec<Vec<(f64, f64)>>,
    /// Assignments applied in order after import.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Catalog records that replace the configured catalog.
    #[serde(default)]
    pub catalog: Option<Vec<SpeciesRecord>>,
}

impl PlanFile {
    /// Load a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read or
    /// [`CliError::Yaml`] if it is not a valid plan.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path)?;
        let plan = Self::parse(&contents)?;
        info!(
            path = %path.display(),
            zones = plan.zones.len(),
            assignments = plan.assignments.len(),
            "Plan file loaded"
        );
        Ok(plan)
    }

    /// Parse a plan from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Yaml`] if the text is not a valid plan.
    pub fn parse(yaml: &str) -> Result<Self, CliError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The inline catalog, if the plan carries one.
    pub fn inline_catalog(&self) -> Option<StaticCatalog> {
        self.catalog
            .as_ref()
            .map(|records| StaticCatalog::from_records(records.iter().cloned()))
    }

    /// Apply every assignment to the session's zones, in file order.
    ///
    /// Returns the number of assignments applied.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownZone`] for an out-of-range zone index or
    /// [`CliError::Plan`] for an invalid density. Assignments before the
    /// failing one stay applied.
    pub fn apply_assignments(
        &self,
        session: &mut Session,
        catalog: &impl SpeciesCatalog,
    ) -> Result<usize, CliError> {
        for (index, assignment) in self.assignments.iter().enumerate() {
            let zone_id = session
                .zones()
                .get(assignment.zone)
                .map(|zone| zone.id)
                .ok_or_else(|| CliError::UnknownZone {
                    assignment: index,
                    zone: assignment.zone,
                    zones: session.zones().len(),
                })?;

            let zone = match &assignment.density {
                Some(density) => {
                    session.finalize(zone_id, &assignment.species, density.resolve()?)?
                }
                None => session.finalize_with_catalog(zone_id, &assignment.species, catalog)?,
            };
            debug!(zone = assignment.zone, density = zone.density, "Assignment applied");
        }
        Ok(self.assignments.len())
    }
}

impl BoundarySource for PlanFile {
    fn import_boundaries(&self) -> Result<Vec<Boundary>, PlanError> {
        Ok(self
            .zones
            .iter()
            .map(|vertices| vertices.iter().copied().map(Point::from).collect())
            .collect())
    }
}
