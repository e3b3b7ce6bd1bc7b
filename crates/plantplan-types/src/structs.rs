//! Core data structs: points, zones, species keys, catalog records, and the
//! tables handed to document renderers.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{CalendarMark, ZoneState};
use crate::ids::ZoneId;

/// Number of months in a calendar row.
pub const MONTHS_PER_YEAR: usize = 12;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position in drawing space (drawing units, usually metres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// SpeciesKey
// ---------------------------------------------------------------------------

/// Normalized species identifier: trimmed and lowercased.
///
/// Zones finalized without a name are aggregated under [`SpeciesKey::unknown`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct SpeciesKey(String);

impl SpeciesKey {
    /// Label of the sentinel bucket for zones without a species name.
    ///
    /// Holds an upper-case letter, so no key produced by [`SpeciesKey::parse`]
    /// can equal it.
    pub const UNKNOWN_LABEL: &'static str = "(Unknown species)";

    /// Normalize user input into a key. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// The sentinel key for zones finalized without a species.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN_LABEL.to_owned())
    }

    /// Whether this is the unknown-species sentinel.
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN_LABEL
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name for tables and order lists: first letter upper-cased.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl core::fmt::Display for SpeciesKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A planting area: a closed polygon plus its species assignment.
///
/// The boundary is implicitly closed (the last vertex connects back to the
/// first) and holds at least three vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// Identity assigned when the drawing was imported.
    pub id: ZoneId,
    /// Ordered vertices in drawing units.
    pub boundary: Vec<Point>,
    /// Assigned species, if any. `None` on a finalized zone means unknown.
    pub species: Option<SpeciesKey>,
    /// Plants per square drawing unit.
    pub density: f64,
    /// Assignment state.
    pub state: ZoneState,
}

// ---------------------------------------------------------------------------
// MonthRange
// ---------------------------------------------------------------------------

/// An inclusive range of calendar months, 1 (January) to 12 (December).
///
/// Deserializing goes through [`MonthRange::from_pair`], so a decoded range
/// always holds two months in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MonthRange {
    /// First month (1-12).
    pub start: u8,
    /// Last month (1-12).
    pub end: u8,
}

impl MonthRange {
    /// Build a range from a catalog `(start, end)` pair.
    ///
    /// Returns `None` when either month is `0` (not applicable) or outside
    /// `1..=12`.
    pub const fn from_pair(start: u8, end: u8) -> Option<Self> {
        if start == 0 || end == 0 || start > 12 || end > 12 {
            None
        } else {
            Some(Self { start, end })
        }
    }

    /// Whether the range crosses the year boundary (e.g. November to February).
    pub const fn wraps_year(self) -> bool {
        self.start > self.end
    }

    /// Months covered by the range. Empty for year-wrapping ranges.
    pub const fn months(self) -> core::ops::RangeInclusive<u8> {
        self.start..=self.end
    }
}

/// A `(start, end)` pair as written in catalog files, before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
struct MonthPair {
    start: u8,
    end: u8,
}

impl MonthPair {
    /// Reject months past December. `0` is allowed and means "not applicable".
    fn checked<E: serde::de::Error>(self) -> Result<Self, E> {
        if self.start > 12 || self.end > 12 {
            return Err(E::custom(format!(
                "month out of range (0-12): start {}, end {}",
                self.start, self.end
            )));
        }
        Ok(self)
    }
}

impl<'de> Deserialize<'de> for MonthRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pair = MonthPair::deserialize(deserializer)?.checked::<D::Error>()?;
        Self::from_pair(pair.start, pair.end).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "month range needs two months in 1-12, got {}-{}",
                pair.start, pair.end
            ))
        })
    }
}

/// Catalog month fields: a `0` month means the range does not apply and
/// decodes to `None`; months past December are an error.
fn optional_month_range<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<MonthRange>, D::Error> {
    let Some(pair) = Option::<MonthPair>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let pair = pair.checked::<D::Error>()?;
    Ok(MonthRange::from_pair(pair.start, pair.end))
}

// ---------------------------------------------------------------------------
// SpeciesRecord
// ---------------------------------------------------------------------------

/// A plant catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpeciesRecord {
    /// Full cultivar name, e.g. `Salvia nemerosa "Schneehugel"`.
    pub name: String,
    /// Nursery quality grade (pot size), e.g. `P9`.
    #[serde(default)]
    pub quality: Option<String>,
    /// Price per plant, excluding tax.
    #[serde(default)]
    #[ts(as = "String")]
    pub unit_price: Decimal,
    /// Recommended plants per square metre.
    #[serde(default)]
    pub default_density: Option<f64>,
    /// Months in flower.
    #[serde(default, deserialize_with = "optional_month_range")]
    pub flowering: Option<MonthRange>,
    /// Months with structural interest.
    #[serde(default, deserialize_with = "optional_month_range")]
    pub structure: Option<MonthRange>,
    /// Path to a photo used by the image gallery export.
    #[serde(default)]
    pub image_path: Option<String>,
}

impl SpeciesRecord {
    /// The normalized key this record is looked up by.
    pub fn key(&self) -> Option<SpeciesKey> {
        SpeciesKey::parse(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Export tables
// ---------------------------------------------------------------------------

/// One line of the order list with pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CostLine {
    /// The species being ordered.
    pub species: SpeciesKey,
    /// Capitalized name for printing.
    pub display_name: String,
    /// Quality grade, `None` when the species is not in the catalog.
    pub quality: Option<String>,
    /// Number of plants to order.
    pub quantity: u64,
    /// Price per plant; zero when the species is not in the catalog.
    #[ts(as = "String")]
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    #[ts(as = "String")]
    pub line_total: Decimal,
}

/// Priced order list with tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CostBreakdown {
    /// Lines sorted by species key.
    pub lines: Vec<CostLine>,
    /// Sum of all line totals, excluding tax.
    #[ts(as = "String")]
    pub subtotal: Decimal,
    /// Tax rate applied to the subtotal (e.g. `0.09`).
    #[ts(as = "String")]
    pub tax_rate: Decimal,
    /// Tax amount, rounded to cents.
    #[ts(as = "String")]
    pub tax: Decimal,
    /// `subtotal + tax`.
    #[ts(as = "String")]
    pub total: Decimal,
}

/// One species row of the planting calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CalendarRow {
    /// The species this row describes.
    pub species: SpeciesKey,
    /// Capitalized name for printing.
    pub display_name: String,
    /// January through December.
    pub cells: [CalendarMark; MONTHS_PER_YEAR],
}

/// One cell of the image gallery table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GalleryCell {
    /// The species pictured.
    pub species: SpeciesKey,
    /// Caption shown under the image.
    pub display_name: String,
    /// Image file path from the catalog.
    pub image_path: String,
}
