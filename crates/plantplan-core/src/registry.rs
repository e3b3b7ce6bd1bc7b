//! The zone registry: owner of every planting zone of one imported drawing.
//!
//! Zones are kept in import order, which is also hit-test order. The
//! registry implements the assignment state machine:
//!
//! ```text
//! Unassigned --finalize--> Finalized --finalize--> Finalized
//! ```
//!
//! There is no per-zone deletion; [`ZoneRegistry::reset`] (driven by a new
//! import) is the only way zones leave the registry. Every fallible
//! operation validates its input before touching any zone.

use plantplan_types::{Point, SpeciesKey, Zone, ZoneId, ZoneState};

use crate::config::DEFAULT_DENSITY;
use crate::error::{PlanError, validate_density};
use crate::geometry::{self, MIN_VERTICES};

/// All zones of the current drawing, in import order.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRegistry {
    /// Zones in import order.
    zones: Vec<Zone>,
    /// Density given to newly created zones.
    default_density: f64,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self {
            zones: Vec::new(),
            default_density: DEFAULT_DENSITY,
        }
    }
}

impl ZoneRegistry {
    /// Create an empty registry whose zones start at `default_density`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] if the density is not positive.
    pub fn new(default_density: f64) -> Result<Self, PlanError> {
        Ok(Self {
            zones: Vec::new(),
            default_density: validate_density(default_density)?,
        })
    }

    /// Build a registry holding one zone per boundary, in the given order.
    ///
    /// Every boundary is validated before any zone is created, so either
    /// all boundaries become zones or the call fails.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidGeometry`] for the first boundary with
    /// fewer than three vertices, or [`PlanError::InvalidInput`] for a
    /// non-positive default density.
    pub fn from_boundaries(
        boundaries: Vec<Vec<Point>>,
        default_density: f64,
    ) -> Result<Self, PlanError> {
        let mut registry = Self::new(default_density)?;
        if let Some(bad) = boundaries.iter().find(|b| b.len() < MIN_VERTICES) {
            return Err(PlanError::InvalidGeometry {
                vertices: bad.len(),
            });
        }
        registry.zones.reserve(boundaries.len());
        for boundary in boundaries {
            registry.create_zone(boundary)?;
        }
        Ok(registry)
    }

    /// Create an `Unassigned` zone for a boundary and return a copy of it.
    ///
    /// A zero-area (degenerate) boundary is accepted; such zones never
    /// contribute plants. See [`geometry::is_usable`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidGeometry`] if the boundary has fewer
    /// than three vertices.
    pub fn create_zone(&mut self, boundary: Vec<Point>) -> Result<Zone, PlanError> {
        if boundary.len() < MIN_VERTICES {
            return Err(PlanError::InvalidGeometry {
                vertices: boundary.len(),
            });
        }

        if !geometry::is_usable(&boundary) {
            tracing::warn!(vertices = boundary.len(), "Zone boundary encloses no area");
        }

        let zone = Zone {
            id: ZoneId::new(),
            boundary,
            species: None,
            density: self.default_density,
            state: ZoneState::Unassigned,
        };
        self.zones.push(zone.clone());
        Ok(zone)
    }

    /// Return the first zone, in import order, whose boundary contains the
    /// point. Overlapping zones resolve to the earliest imported one.
    pub fn hit_test(&self, point: Point) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|zone| geometry::contains(point, &zone.boundary))
    }

    /// Assign a species and density to a zone and mark it `Finalized`.
    ///
    /// Re-finalizing overwrites the previous assignment in place.
    /// `species = None` finalizes the zone as an unknown species.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] for a non-positive density or
    /// [`PlanError::ZoneNotFound`] if the zone is not in this registry.
    pub fn finalize(
        &mut self,
        zone_id: ZoneId,
        species: Option<SpeciesKey>,
        density: f64,
    ) -> Result<&Zone, PlanError> {
        let density = validate_density(density)?;
        let zone = self
            .zones
            .iter_mut()
            .find(|zone| zone.id == zone_id)
            .ok_or(PlanError::ZoneNotFound(zone_id))?;

        let previous = zone.state;
        zone.species = species;
        zone.density = density;
        zone.state = ZoneState::Finalized;

        tracing::debug!(
            zone = %zone.id,
            species = zone.species.as_ref().map_or(SpeciesKey::UNKNOWN_LABEL, SpeciesKey::as_str),
            density,
            ?previous,
            "Zone finalized"
        );
        Ok(&*zone)
    }

    /// Remove every zone.
    pub fn reset(&mut self) {
        self.zones.clear();
    }

    /// Look up a zone by id.
    pub fn get(&self, zone_id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == zone_id)
    }

    /// All zones in import order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Density new zones start with.
    pub const fn default_density(&self) -> f64 {
        self.default_density
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the registry holds no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of finalized zones.
    pub fn finalized_count(&self) -> usize {
        self.zones
            .iter()
            .filter(|zone| zone.state.is_finalized())
            .count()
    }
}
