//! The planning session: one imported drawing and everything derived from it.
//!
//! [`Session`] is the single owned aggregate that ties the registry, the
//! live species totals, the color bindings and the current selection
//! together. Every mutation goes through it so that the derived state is
//! always consistent with the zones:
//!
//! - finalizing a zone recomputes the live totals from scratch and binds a
//!   color when the species is new;
//! - importing a drawing or resetting replaces the whole aggregate in one
//!   assignment, so no caller can observe a half-cleared session.

use plantplan_types::{
    CalendarRow, CostBreakdown, DrawingId, Point, SpeciesKey, TotalsMode, Zone, ZoneId,
};
use rust_decimal::Decimal;

use crate::aggregate::{self, DEFAULT_TAX_RATE, SpeciesTotals};
use crate::calendar;
use crate::catalog::SpeciesCatalog;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::gallery::{self, DEFAULT_GALLERY_COLUMNS, GalleryRow};
use crate::geometry;
use crate::import::BoundarySource;
use crate::palette::{ColorAssignment, ColorToken};
use crate::registry::ZoneRegistry;

/// Settings a session needs from the planner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Tax rate applied to order subtotals.
    pub tax_rate: Decimal,
    /// Images per gallery row.
    pub gallery_columns: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            gallery_columns: DEFAULT_GALLERY_COLUMNS,
        }
    }
}

/// Area and live plant estimate of the selected zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSummary {
    /// The selected zone.
    pub zone: ZoneId,
    /// Zone area in square drawing units.
    pub area: f64,
    /// `floor(area * density)` with the zone's current density.
    pub estimated_plants: u64,
}

/// One planning session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Tax and export settings.
    settings: SessionSettings,
    /// Identity of the imported drawing.
    drawing: DrawingId,
    /// Zones of the drawing.
    registry: ZoneRegistry,
    /// Species color bindings.
    colors: ColorAssignment,
    /// Live totals, recomputed after every finalize.
    live_totals: SpeciesTotals,
    /// Currently selected zone.
    selected: Option<ZoneId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::fresh(SessionSettings::default(), ZoneRegistry::default())
    }
}

impl Session {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] if `default_density` is not a
    /// positive finite number.
    pub fn new(settings: SessionSettings, default_density: f64) -> Result<Self, PlanError> {
        Ok(Self::fresh(settings, ZoneRegistry::new(default_density)?))
    }

    /// Create an empty session from the planner configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] if the configured default density
    /// is not a positive finite number.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlanError> {
        let settings = SessionSettings {
            tax_rate: config.pricing.tax_rate,
            gallery_columns: config.export.gallery_columns,
        };
        Self::new(settings, config.planting.default_density)
    }

    fn fresh(settings: SessionSettings, registry: ZoneRegistry) -> Self {
        Self {
            settings,
            drawing: DrawingId::new(),
            registry,
            colors: ColorAssignment::new(),
            live_totals: SpeciesTotals::default(),
            selected: None,
        }
    }

    // -----------------------------------------------------------------------
    // Import and reset
    // -----------------------------------------------------------------------

    /// Import a drawing, replacing every zone and all derived state.
    ///
    /// Returns the number of zones created. On error the session is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ImportFailure`] if the source cannot produce
    /// boundaries, or [`PlanError::InvalidGeometry`] if any boundary has
    /// fewer than three vertices.
    pub fn import(&mut self, source: &impl BoundarySource) -> Result<usize, PlanError> {
        let boundaries = source.import_boundaries()?;
        let registry =
            ZoneRegistry::from_boundaries(boundaries, self.registry.default_density())?;
        let zones = registry.len();

        *self = Self::fresh(self.settings.clone(), registry);
        tracing::info!(drawing = %self.drawing, zones, "Drawing imported");
        Ok(zones)
    }

    /// Discard every zone, total, color binding and the selection.
    pub fn reset(&mut self) {
        let mut registry = std::mem::take(&mut self.registry);
        registry.reset();
        *self = Self::fresh(self.settings.clone(), registry);
        tracing::info!(drawing = %self.drawing, "Session reset");
    }

    // -----------------------------------------------------------------------
    // Zones and selection
    // -----------------------------------------------------------------------

    /// Identity of the current drawing; changes on every import or reset.
    pub const fn drawing(&self) -> DrawingId {
        self.drawing
    }

    /// Session settings.
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Zones in import order.
    pub fn zones(&self) -> &[Zone] {
        self.registry.zones()
    }

    /// Look up a zone by id.
    pub fn zone(&self, zone_id: ZoneId) -> Option<&Zone> {
        self.registry.get(zone_id)
    }

    /// First zone, in import order, containing the point.
    pub fn hit_test(&self, point: Point) -> Option<&Zone> {
        self.registry.hit_test(point)
    }

    /// Select the zone under the point. A miss clears the selection.
    pub fn select_at(&mut self, point: Point) -> Option<ZoneId> {
        self.selected = self.registry.hit_test(point).map(|zone| zone.id);
        self.selected
    }

    /// Select a zone by id.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ZoneNotFound`] if the zone is not in the
    /// current drawing; the previous selection is kept.
    pub fn select(&mut self, zone_id: ZoneId) -> Result<(), PlanError> {
        if self.registry.get(zone_id).is_none() {
            return Err(PlanError::ZoneNotFound(zone_id));
        }
        self.selected = Some(zone_id);
        Ok(())
    }

    /// Clear the selection.
    pub const fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected zone, if any.
    pub fn selected(&self) -> Option<&Zone> {
        self.selected.and_then(|id| self.registry.get(id))
    }

    /// Area and live plant estimate of the selected zone.
    pub fn selection_summary(&self) -> Option<SelectionSummary> {
        self.selected().map(|zone| {
            let area = geometry::area(&zone.boundary);
            SelectionSummary {
                zone: zone.id,
                area,
                estimated_plants: aggregate::plants_for_area(
                    area,
                    zone.density,
                    TotalsMode::Live,
                ),
            }
        })
    }

    // -----------------------------------------------------------------------
    // Assignment
    // -----------------------------------------------------------------------

    /// Assign a species and density to a zone.
    ///
    /// `species` is user input; it is trimmed and lowercased, and a blank
    /// name finalizes the zone as an unknown species. On success the live
    /// totals are recomputed and a new species is bound to a color.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] for a non-positive density or
    /// [`PlanError::ZoneNotFound`] if the zone is not in the current
    /// drawing. Nothing changes on error.
    pub fn finalize(
        &mut self,
        zone_id: ZoneId,
        species: &str,
        density: f64,
    ) -> Result<&Zone, PlanError> {
        let key = SpeciesKey::parse(species);
        self.registry.finalize(zone_id, key.clone(), density)?;

        self.live_totals = aggregate::compute_totals(self.registry.zones(), TotalsMode::Live);
        self.colors.bind(&key.unwrap_or_else(SpeciesKey::unknown));

        self.registry
            .get(zone_id)
            .ok_or(PlanError::ZoneNotFound(zone_id))
    }

    /// Finalize a zone with the density suggested by the catalog.
    ///
    /// # Errors
    ///
    /// Same as [`Session::finalize`].
    pub fn finalize_with_catalog(
        &mut self,
        zone_id: ZoneId,
        species: &str,
        catalog: &impl SpeciesCatalog,
    ) -> Result<&Zone, PlanError> {
        let density = self.suggest_density(species, catalog);
        self.finalize(zone_id, species, density)
    }

    /// Catalog density for a species, or the session default when the
    /// species is unknown or has no usable density on record.
    pub fn suggest_density(&self, species: &str, catalog: &impl SpeciesCatalog) -> f64 {
        SpeciesKey::parse(species)
            .and_then(|key| catalog.lookup(&key).found())
            .and_then(|record| record.default_density)
            .filter(|density| density.is_finite() && *density > 0.0)
            .unwrap_or_else(|| self.registry.default_density())
    }

    // -----------------------------------------------------------------------
    // Aggregates and export tables
    // -----------------------------------------------------------------------

    /// Live totals as of the last finalize.
    pub const fn live_totals(&self) -> &SpeciesTotals {
        &self.live_totals
    }

    /// Plant totals per species in the given rounding mode.
    pub fn species_totals(&self, mode: TotalsMode) -> SpeciesTotals {
        match mode {
            TotalsMode::Live => self.live_totals.clone(),
            TotalsMode::Order => aggregate::compute_totals(self.registry.zones(), mode),
        }
    }

    /// Priced order list, computed from `Order` totals.
    pub fn cost_breakdown(&self, catalog: &impl SpeciesCatalog) -> CostBreakdown {
        aggregate::compute_costs(
            &self.species_totals(TotalsMode::Order),
            catalog,
            self.settings.tax_rate,
        )
    }

    /// Calendar rows for every finalized species in the catalog.
    pub fn calendar_rows(&self, catalog: &impl SpeciesCatalog) -> Vec<CalendarRow> {
        calendar::calendar_rows(self.live_totals.iter().map(|(species, _)| species), catalog)
    }

    /// Image gallery rows for every finalized species with a photo.
    pub fn gallery_rows(&self, catalog: &impl SpeciesCatalog) -> Vec<GalleryRow> {
        gallery::gallery_rows(
            self.live_totals.iter().map(|(species, _)| species),
            catalog,
            self.settings.gallery_columns,
        )
    }

    /// Color bound to a species.
    pub fn color_for(&self, species: &SpeciesKey) -> ColorToken {
        self.colors.color_for(species)
    }

    /// Fill color for a zone; `None` while it is unassigned.
    pub fn fill_for(&self, zone: &Zone) -> Option<ColorToken> {
        self.colors.fill_for(zone)
    }

    /// Fill color of every zone, in drawing order.
    pub fn zone_fills(&self) -> Vec<Option<ColorToken>> {
        self.zones().iter().map(|zone| self.fill_for(zone)).collect()
    }

    /// Species color bindings.
    pub const fn colors(&self) -> &ColorAssignment {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use plantplan_types::ZoneState;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::{StaticCatalog, sample_catalog};
    use crate::config::DEFAULT_DENSITY;
    use crate::import::{Boundary, StaticBoundaries};
    use crate::palette::{FALLBACK_COLOR, PALETTE};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Boundary {
        vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ]
    }

    struct FailingSource;

    impl BoundarySource for FailingSource {
        fn import_boundaries(&self) -> Result<Vec<Boundary>, PlanError> {
            Err(PlanError::ImportFailure {
                message: "unreadable drawing".to_owned(),
            })
        }
    }

    fn session_with(boundaries: Vec<Boundary>) -> Session {
        let mut session = Session::default();
        let imported = session.import(&StaticBoundaries::new(boundaries));
        assert!(imported.is_ok());
        session
    }

    fn zone_id(session: &Session, index: usize) -> ZoneId {
        session
            .zones()
            .get(index)
            .map_or_else(ZoneId::new, |zone| zone.id)
    }

    fn key(name: &str) -> SpeciesKey {
        SpeciesKey::parse(name).unwrap_or_else(SpeciesKey::unknown)
    }

    #[test]
    fn import_creates_unassigned_zones() {
        let session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0), rect(2.0, 0.0, 1.0, 1.0)]);
        assert_eq!(session.zones().len(), 2);
        assert!(
            session
                .zones()
                .iter()
                .all(|z| z.state == ZoneState::Unassigned
                    && (z.density - DEFAULT_DENSITY).abs() < f64::EPSILON)
        );
        assert!(session.live_totals().is_empty());
    }

    #[test]
    fn failed_import_leaves_session_untouched() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "rose", 5.0).is_ok());
        let before = session.clone();

        assert!(matches!(
            session.import(&FailingSource),
            Err(PlanError::ImportFailure { .. })
        ));
        assert_eq!(session, before);

        let short = StaticBoundaries::new(vec![rect(0.0, 0.0, 1.0, 1.0), vec![Point::default()]]);
        assert!(matches!(
            session.import(&short),
            Err(PlanError::InvalidGeometry { vertices: 1 })
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn import_replaces_everything() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "rose", 5.0).is_ok());
        assert!(session.select(id).is_ok());
        let old_drawing = session.drawing();

        let fresh = StaticBoundaries::new(vec![rect(0.0, 0.0, 3.0, 3.0)]);
        assert_eq!(session.import(&fresh).ok(), Some(1));
        assert_ne!(session.drawing(), old_drawing);
        assert!(session.zone(id).is_none());
        assert!(session.selected().is_none());
        assert!(session.live_totals().is_empty());
        assert!(session.colors().is_empty());
    }

    #[test]
    fn reset_clears_all_state() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "rose", 5.0).is_ok());
        session.reset();
        assert!(session.zones().is_empty());
        assert!(session.live_totals().is_empty());
        assert!(session.colors().is_empty());
        assert_eq!(session.color_for(&key("rose")), FALLBACK_COLOR);
    }

    #[test]
    fn select_at_and_summary() {
        let mut session = session_with(vec![rect(0.0, 0.0, 2.0, 3.0)]);
        let id = zone_id(&session, 0);
        assert_eq!(session.select_at(Point::new(1.0, 1.0)), Some(id));

        let summary = session.selection_summary();
        assert!(summary.is_some_and(|s| s.zone == id
            && (s.area - 6.0).abs() < f64::EPSILON
            && s.estimated_plants == 42));

        assert_eq!(session.select_at(Point::new(50.0, 50.0)), None);
        assert!(session.selection_summary().is_none());
    }

    #[test]
    fn select_unknown_zone_keeps_selection() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        assert!(session.select(id).is_ok());
        assert!(matches!(
            session.select(ZoneId::new()),
            Err(PlanError::ZoneNotFound(_))
        ));
        assert_eq!(session.selected().map(|z| z.id), Some(id));
        session.clear_selection();
        assert!(session.selected().is_none());
    }

    #[test]
    fn finalize_updates_totals_and_colors() {
        let mut session = session_with(vec![rect(0.0, 0.0, 10.0, 10.0), rect(20.0, 0.0, 5.0, 4.0)]);
        let (a, b) = (zone_id(&session, 0), zone_id(&session, 1));
        assert!(session.finalize(a, "Rose", 5.0).is_ok());
        assert!(session.finalize(b, " rose ", 5.0).is_ok());

        assert_eq!(session.live_totals().get(&key("rose")), 600);
        assert_eq!(session.colors().len(), 1);
        assert_eq!(Some(session.color_for(&key("rose"))), PALETTE.first().copied());
    }

    #[test]
    fn refinalize_moves_contribution() {
        let mut session = session_with(vec![rect(0.0, 0.0, 2.0, 2.0)]);
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "rose", 5.0).is_ok());
        assert!(session.finalize(id, "lavender", 3.0).is_ok());

        let totals = session.species_totals(TotalsMode::Live);
        assert!(!totals.contains(&key("rose")));
        assert_eq!(totals.get(&key("lavender")), 12);
        assert_eq!(session.zones().len(), 1);
        // Rose keeps its color even though no zone uses it any more.
        assert_eq!(session.colors().len(), 2);
        assert_ne!(session.color_for(&key("rose")), FALLBACK_COLOR);
    }

    #[test]
    fn finalize_rejects_bad_input_without_side_effects() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        let before = session.clone();
        assert!(session.finalize(id, "rose", -1.0).is_err());
        assert!(session.finalize(ZoneId::new(), "rose", 5.0).is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn blank_species_is_unknown() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        let zone = session.finalize(id, "   ", 7.0).cloned();
        assert!(zone.as_ref().is_ok_and(|z| z.species.is_none()));
        assert_eq!(session.live_totals().get(&SpeciesKey::unknown()), 7);
        if let Ok(zone) = zone {
            assert_eq!(session.fill_for(&zone), Some(FALLBACK_COLOR));
        }
        assert!(session.colors().is_empty());
    }

    #[test]
    fn typed_unknown_label_stays_a_named_species() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, 0.0, 1.0, 1.0)]);
        let (a, b) = (zone_id(&session, 0), zone_id(&session, 1));
        assert!(session.finalize(a, "", 7.0).is_ok());
        assert!(session.finalize(b, "(Unknown Species)", 7.0).is_ok());

        let totals = session.live_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get(&SpeciesKey::unknown()), 7);
        assert_eq!(session.colors().len(), 1);
        assert_eq!(
            Some(session.color_for(&key("(unknown species)"))),
            PALETTE.first().copied()
        );
    }

    #[test]
    fn zone_fills_follow_drawing_order() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, 0.0, 1.0, 1.0)]);
        let b = zone_id(&session, 1);
        assert!(session.finalize(b, "salvia", 7.0).is_ok());
        assert_eq!(session.zone_fills(), vec![None, PALETTE.first().copied()]);
    }

    #[test]
    fn order_totals_round_up() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.5, 1.0)]);
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "rose", 3.0).is_ok());
        assert_eq!(session.species_totals(TotalsMode::Live).get(&key("rose")), 4);
        assert_eq!(session.species_totals(TotalsMode::Order).get(&key("rose")), 5);
    }

    #[test]
    fn suggest_density_from_catalog() {
        let session = Session::default();
        let catalog = sample_catalog();
        let calamintha = session.suggest_density("Calamintha nepeta ssp. nepeta", &catalog);
        assert!((calamintha - 9.0).abs() < f64::EPSILON);
        let unknown = session.suggest_density("tulip", &catalog);
        assert!((unknown - DEFAULT_DENSITY).abs() < f64::EPSILON);
        let blank = session.suggest_density("", &catalog);
        assert!((blank - DEFAULT_DENSITY).abs() < f64::EPSILON);
    }

    #[test]
    fn finalize_with_catalog_uses_suggested_density() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let id = zone_id(&session, 0);
        let catalog = sample_catalog();
        let zone = session.finalize_with_catalog(id, "geranium x oxonianum \"rose clair\"", &catalog);
        assert!(zone.is_ok_and(|z| (z.density - 8.0).abs() < f64::EPSILON));
    }

    #[test]
    fn cost_breakdown_uses_configured_tax() {
        let settings = SessionSettings {
            tax_rate: dec!(0.21),
            ..SessionSettings::default()
        };
        let mut session = Session::new(settings, 7.0).unwrap_or_default();
        assert!(session.import(&StaticBoundaries::new(vec![rect(0.0, 0.0, 1.0, 1.0)])).is_ok());
        let id = zone_id(&session, 0);
        assert!(session.finalize(id, "salvia nemerosa \"schneehugel\"", 4.0).is_ok());

        let costs = session.cost_breakdown(&sample_catalog());
        assert_eq!(costs.subtotal, dec!(15.00));
        assert_eq!(costs.tax, dec!(3.15));
        assert_eq!(costs.total, dec!(18.15));
    }

    #[test]
    fn calendar_and_gallery_follow_finalized_species() {
        let mut session = session_with(vec![rect(0.0, 0.0, 1.0, 1.0), rect(2.0, 0.0, 1.0, 1.0)]);
        let (a, b) = (zone_id(&session, 0), zone_id(&session, 1));
        assert!(session.finalize(a, "echinops bannaticus \"taplow blue\"", 7.0).is_ok());
        assert!(session.finalize(b, "tulip", 7.0).is_ok());

        let catalog = sample_catalog();
        let rows = session.calendar_rows(&catalog);
        assert_eq!(rows.len(), 1);
        assert!(session.gallery_rows(&catalog).is_empty());
        assert!(session.gallery_rows(&StaticCatalog::new()).is_empty());
    }

    #[test]
    fn from_config_rejects_bad_density() {
        let mut config = PlannerConfig::default();
        config.planting.default_density = 0.0;
        assert!(Session::from_config(&config).is_err());
        config.planting.default_density = 6.0;
        let session = Session::from_config(&config);
        assert!(session.is_ok());
    }
}
