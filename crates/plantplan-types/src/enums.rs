//! Enumeration types: zone states, totals rounding modes, calendar markers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// ZoneState
// ---------------------------------------------------------------------------

/// Assignment state of a planting zone.
///
/// Every zone starts `Unassigned`. The only transition is to `Finalized`,
/// which can be re-entered by reassigning species or density. Zones leave
/// the registry only when a new drawing is imported.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum ZoneState {
    /// Imported, no species or density confirmed yet.
    #[default]
    Unassigned,
    /// Species and density confirmed; contributes to totals.
    Finalized,
}

impl ZoneState {
    /// Whether the zone counts towards species totals.
    pub const fn is_finalized(self) -> bool {
        matches!(self, Self::Finalized)
    }
}

// ---------------------------------------------------------------------------
// TotalsMode
// ---------------------------------------------------------------------------

/// Rounding applied to `area * density` when summing plants per species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TotalsMode {
    /// Interactive estimate: each zone truncates towards zero.
    Live,
    /// Purchasing quantity: each zone rounds up, never under-counting.
    Order,
}

// ---------------------------------------------------------------------------
// CalendarMark
// ---------------------------------------------------------------------------

/// Content of one month cell in a planting calendar row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum CalendarMark {
    /// Nothing of interest this month.
    #[default]
    Empty,
    /// Structural interest (foliage, seed heads, winter silhouette).
    Structure,
    /// In flower.
    Flowering,
}

impl CalendarMark {
    /// Single-letter marker used by printed calendars (`S` / `B`).
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Structure => "S",
            Self::Flowering => "B",
        }
    }
}
