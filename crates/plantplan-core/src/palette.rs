//! Stable species-to-color bindings for zone fills.
//!
//! Colors come from a fixed cyclic palette of twelve. The Nth distinct species
//! to be finalized in a session (counting from zero, in finalize order) is
//! bound to `PALETTE[N mod 12]`; the binding never changes for the rest of
//! the session. Unknown species use [`FALLBACK_COLOR`], which is not part of
//! the palette.

use std::collections::BTreeMap;

use plantplan_types::{SpeciesKey, Zone};
use serde::Serialize;

/// A presentation color, as a CSS color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorToken(&'static str);

impl ColorToken {
    /// The CSS color string.
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// The cyclic palette, in binding order.
pub const PALETTE: [ColorToken; 12] = [
    ColorToken("#8dd3c7"),
    ColorToken("#ffffb3"),
    ColorToken("#bebada"),
    ColorToken("#fb8072"),
    ColorToken("#80b1d3"),
    ColorToken("#fdb462"),
    ColorToken("#b3de69"),
    ColorToken("#fccde5"),
    ColorToken("#d9d9d9"),
    ColorToken("#bc80bd"),
    ColorToken("#ccebc5"),
    ColorToken("#ffed6f"),
];

/// Color for zones finalized without a known species.
pub const FALLBACK_COLOR: ColorToken = ColorToken("lightgrey");

/// Session-scoped species color bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    /// Species bound so far.
    bindings: BTreeMap<SpeciesKey, ColorToken>,
    /// Palette slot the next new species receives.
    next_index: usize,
}

impl ColorAssignment {
    /// Create an assignment with no bindings.
    pub const fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            next_index: 0,
        }
    }

    /// Bind a species to the next palette color if it has no color yet,
    /// and return its color. Unknown species get [`FALLBACK_COLOR`] and
    /// consume no palette slot.
    pub fn bind(&mut self, species: &SpeciesKey) -> ColorToken {
        if species.is_unknown() {
            return FALLBACK_COLOR;
        }
        if let Some(color) = self.bindings.get(species) {
            return *color;
        }

        let color = PALETTE
            .get(self.next_index)
            .copied()
            .unwrap_or(FALLBACK_COLOR);
        self.next_index = self
            .next_index
            .checked_add(1)
            .and_then(|n| n.checked_rem(PALETTE.len()))
            .unwrap_or(0);
        self.bindings.insert(species.clone(), color);

        tracing::debug!(species = %species, %color, "Species color bound");
        color
    }

    /// The color bound to a species, or [`FALLBACK_COLOR`] if it has none.
    pub fn color_for(&self, species: &SpeciesKey) -> ColorToken {
        self.bindings
            .get(species)
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Fill for a zone: `None` while unassigned, otherwise its species
    /// color (or the fallback for unknown species).
    pub fn fill_for(&self, zone: &Zone) -> Option<ColorToken> {
        if !zone.state.is_finalized() {
            return None;
        }
        Some(
            zone.species
                .as_ref()
                .map_or(FALLBACK_COLOR, |species| self.color_for(species)),
        )
    }

    /// Number of bound species.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no species has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
