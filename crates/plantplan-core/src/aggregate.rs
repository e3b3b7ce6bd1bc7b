//! Species aggregation: plant totals per species and the priced order list.
//!
//! Totals are a pure function of the live zone set. They are recomputed from
//! scratch after every mutation instead of being patched incrementally, so a
//! reassigned zone can never leave a stale contribution behind. The cost is
//! one pass over the zones, which is negligible at drawing scale.
//!
//! Two rounding modes exist ([`TotalsMode`]):
//! - `Live` truncates `area * density` per zone -- the interactive estimate.
//! - `Order` rounds each zone up -- the purchasing quantity, which must never
//!   under-count.

use std::collections::BTreeMap;

use plantplan_types::{CostBreakdown, CostLine, SpeciesKey, TotalsMode, Zone};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::{CatalogLookup, SpeciesCatalog};
use crate::geometry;

/// Default tax rate applied to order subtotals (9%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 2);

/// Decimal places monetary amounts are rounded to.
const CENTS: u32 = 2;

/// Plant counts per species, ordered by species key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesTotals(BTreeMap<SpeciesKey, u64>);

impl SpeciesTotals {
    /// Plant count for a species; zero when absent.
    pub fn get(&self, species: &SpeciesKey) -> u64 {
        self.0.get(species).copied().unwrap_or(0)
    }

    /// Whether the species has an entry.
    pub fn contains(&self, species: &SpeciesKey) -> bool {
        self.0.contains_key(species)
    }

    /// Iterate over `(species, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&SpeciesKey, u64)> {
        self.0.iter().map(|(species, count)| (species, *count))
    }

    /// Species present in the totals, in key order.
    pub fn species(&self) -> Vec<SpeciesKey> {
        self.0.keys().cloned().collect()
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no zone has been finalized.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all species.
    pub fn total_plants(&self) -> u64 {
        self.0.values().fold(0_u64, |acc, n| acc.saturating_add(*n))
    }
}

/// Plants needed for one zone under the given rounding mode.
///
/// Unassigned zones and zero-area zones contribute nothing.
pub fn zone_plant_count(zone: &Zone, mode: TotalsMode) -> u64 {
    if !zone.state.is_finalized() {
        return 0;
    }
    plants_for_area(geometry::area(&zone.boundary), zone.density, mode)
}

/// `area * density`, rounded per `mode` and clamped to `0..=u64::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn plants_for_area(area: f64, density: f64, mode: TotalsMode) -> u64 {
    let raw = area * density;
    let rounded = match mode {
        TotalsMode::Live => raw.trunc(),
        TotalsMode::Order => raw.ceil(),
    };
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        // Saturating float-to-int conversion; negative and NaN handled above.
        rounded as u64
    }
}

/// Sum plants per species over all finalized zones.
///
/// Zones finalized without a species land in the [`SpeciesKey::unknown`]
/// bucket. Calling this twice on the same zones yields identical totals.
pub fn compute_totals(zones: &[Zone], mode: TotalsMode) -> SpeciesTotals {
    let mut totals: BTreeMap<SpeciesKey, u64> = BTreeMap::new();
    for zone in zones.iter().filter(|z| z.state.is_finalized()) {
        let species = zone.species.clone().unwrap_or_else(SpeciesKey::unknown);
        let count = zone_plant_count(zone, mode);
        let entry = totals.entry(species).or_insert(0);
        *entry = entry.saturating_add(count);
    }
    tracing::debug!(?mode, species = totals.len(), "Species totals recomputed");
    SpeciesTotals(totals)
}

/// Order list as `(display name, quantity)` pairs, sorted by species key.
pub fn order_lines(totals: &SpeciesTotals) -> Vec<(String, u64)> {
    totals
        .iter()
        .map(|(species, count)| (species.display_name(), count))
        .collect()
}

/// Price an order list against the catalog.
///
/// Species missing from the catalog (including the unknown-species bucket)
/// are priced at zero with no quality grade. Tax is `subtotal * tax_rate`
/// rounded half-up to cents, as on an invoice; `total = subtotal + tax`.
pub fn compute_costs(
    totals: &SpeciesTotals,
    catalog: &impl SpeciesCatalog,
    tax_rate: Decimal,
) -> CostBreakdown {
    let lines: Vec<CostLine> = totals
        .iter()
        .map(|(species, quantity)| cost_line(species, quantity, &catalog.lookup(species)))
        .collect();

    let subtotal = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total));
    let tax = subtotal
        .saturating_mul(tax_rate)
        .round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal.saturating_add(tax);

    CostBreakdown {
        lines,
        subtotal,
        tax_rate,
        tax,
        total,
    }
}

/// Build one priced line from a catalog lookup.
fn cost_line(species: &SpeciesKey, quantity: u64, lookup: &CatalogLookup) -> CostLine {
    let (quality, unit_price) = match lookup {
        CatalogLookup::Found(record) => (record.quality.clone(), record.unit_price),
        CatalogLookup::NotFound => {
            tracing::warn!(species = %species, "Species not in catalog, priced at zero");
            (None, Decimal::ZERO)
        }
    };
    CostLine {
        species: species.clone(),
        display_name: species.display_name(),
        quality,
        quantity,
        unit_price,
        line_total: Decimal::from(quantity).saturating_mul(unit_price),
    }
}

#[cfg(test)]
mod tests {
    use plantplan_types::{Point, SpeciesRecord, ZoneId, ZoneState};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::StaticCatalog;

    fn rect(w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    fn zone(boundary: Vec<Point>, species: Option<&str>, density: f64, state: ZoneState) -> Zone {
        Zone {
            id: ZoneId::new(),
            boundary,
            species: species.and_then(SpeciesKey::parse),
            density,
            state,
        }
    }

    fn key(name: &str) -> SpeciesKey {
        SpeciesKey::parse(name).unwrap_or_else(SpeciesKey::unknown)
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_records([SpeciesRecord {
            name: "Rose".to_owned(),
            quality: Some("C2".to_owned()),
            unit_price: dec!(3.50),
            default_density: Some(5.0),
            flowering: None,
            structure: None,
            image_path: None,
        }])
    }

    #[test]
    fn live_truncates_order_rounds_up() {
        assert_eq!(plants_for_area(2.5, 3.0, TotalsMode::Live), 7);
        assert_eq!(plants_for_area(2.5, 3.0, TotalsMode::Order), 8);
        assert_eq!(plants_for_area(4.0, 5.0, TotalsMode::Live), 20);
        assert_eq!(plants_for_area(4.0, 5.0, TotalsMode::Order), 20);
        assert_eq!(plants_for_area(0.0, 5.0, TotalsMode::Order), 0);
        assert_eq!(plants_for_area(f64::NAN, 5.0, TotalsMode::Order), 0);
    }

    #[test]
    fn unassigned_zones_never_count() {
        let zones = vec![
            zone(rect(10.0, 10.0), Some("rose"), 5.0, ZoneState::Unassigned),
            zone(rect(1.0, 1.0), None, 7.0, ZoneState::Unassigned),
        ];
        assert!(compute_totals(&zones, TotalsMode::Live).is_empty());
        assert!(compute_totals(&zones, TotalsMode::Order).is_empty());
    }

    #[test]
    fn totals_sum_per_species() {
        let zones = vec![
            zone(rect(10.0, 10.0), Some("rose"), 5.0, ZoneState::Finalized),
            zone(rect(5.0, 4.0), Some("Rose "), 5.0, ZoneState::Finalized),
            zone(rect(2.0, 2.0), Some("lavender"), 3.0, ZoneState::Finalized),
        ];
        let totals = compute_totals(&zones, TotalsMode::Live);
        assert_eq!(totals.get(&key("rose")), 600);
        assert_eq!(totals.get(&key("lavender")), 12);
        assert_eq!(totals.total_plants(), 612);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn nameless_zones_use_unknown_bucket() {
        let zones = vec![zone(rect(2.0, 2.0), None, 7.0, ZoneState::Finalized)];
        let totals = compute_totals(&zones, TotalsMode::Live);
        assert_eq!(totals.get(&SpeciesKey::unknown()), 28);
    }

    #[test]
    fn recompute_is_idempotent() {
        let zones = vec![
            zone(rect(3.3, 1.7), Some("rose"), 4.2, ZoneState::Finalized),
            zone(rect(2.0, 2.0), None, 7.0, ZoneState::Finalized),
        ];
        assert_eq!(
            compute_totals(&zones, TotalsMode::Order),
            compute_totals(&zones, TotalsMode::Order)
        );
    }

    #[test]
    fn order_lines_are_sorted_and_capitalized() {
        let zones = vec![
            zone(rect(1.0, 1.0), Some("salvia"), 7.0, ZoneState::Finalized),
            zone(rect(1.0, 1.0), Some("aster"), 7.0, ZoneState::Finalized),
        ];
        let lines = order_lines(&compute_totals(&zones, TotalsMode::Live));
        assert_eq!(
            lines,
            vec![("Aster".to_owned(), 7), ("Salvia".to_owned(), 7)]
        );
    }

    #[test]
    fn costs_with_tax() {
        let zones = vec![
            zone(rect(10.0, 10.0), Some("rose"), 5.0, ZoneState::Finalized),
            zone(rect(5.0, 4.0), Some("rose"), 5.0, ZoneState::Finalized),
        ];
        let totals = compute_totals(&zones, TotalsMode::Order);
        let costs = compute_costs(&totals, &catalog(), DEFAULT_TAX_RATE);
        assert_eq!(costs.subtotal, dec!(2100.00));
        assert_eq!(costs.tax, dec!(189.00));
        assert_eq!(costs.total, dec!(2289.00));
        assert_eq!(costs.lines.len(), 1);
        assert_eq!(
            costs.lines.first().and_then(|l| l.quality.clone()).as_deref(),
            Some("C2")
        );
    }

    #[test]
    fn missing_species_priced_at_zero() {
        let zones = vec![
            zone(rect(2.0, 2.0), Some("rose"), 1.0, ZoneState::Finalized),
            zone(rect(2.0, 2.0), Some("tulip"), 10.0, ZoneState::Finalized),
            zone(rect(1.0, 1.0), None, 7.0, ZoneState::Finalized),
        ];
        let totals = compute_totals(&zones, TotalsMode::Order);
        let costs = compute_costs(&totals, &catalog(), DEFAULT_TAX_RATE);
        assert_eq!(costs.lines.len(), 3);
        let tulip = costs.lines.iter().find(|l| l.species == key("tulip"));
        assert!(tulip.is_some_and(|l| l.quantity == 40
            && l.unit_price == Decimal::ZERO
            && l.quality.is_none()));
        assert_eq!(costs.subtotal, dec!(14.00));
        assert_eq!(costs.tax, dec!(1.26));
        assert_eq!(costs.total, dec!(15.26));
    }

    #[test]
    fn tax_rounds_to_cents() {
        let zones = vec![zone(rect(1.0, 1.0), Some("rose"), 1.0, ZoneState::Finalized)];
        let totals = compute_totals(&zones, TotalsMode::Order);
        let costs = compute_costs(&totals, &catalog(), DEFAULT_TAX_RATE);
        // 3.50 * 0.09 = 0.315
        assert_eq!(costs.tax, dec!(0.32));
        assert_eq!(costs.total, dec!(3.82));
    }

    #[test]
    fn tax_midpoint_rounds_up() {
        let zones = vec![zone(rect(1.0, 1.0), Some("rose"), 1.0, ZoneState::Finalized)];
        let totals = compute_totals(&zones, TotalsMode::Order);
        // 3.50 * 0.07 = 0.245, which half-even would round down to 0.24.
        let costs = compute_costs(&totals, &catalog(), dec!(0.07));
        assert_eq!(costs.tax, dec!(0.25));
        assert_eq!(costs.total, dec!(3.75));
    }

    #[test]
    fn empty_totals_cost_nothing() {
        let costs = compute_costs(&SpeciesTotals::default(), &catalog(), DEFAULT_TAX_RATE);
        assert!(costs.lines.is_empty());
        assert_eq!(costs.total, Decimal::ZERO);
        assert_eq!(costs.tax_rate, dec!(0.09));
    }
}
