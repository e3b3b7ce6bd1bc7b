//! Plain-text and JSON rendering of the planting plan.

use std::io::{self, Write};

use plantplan_core::gallery::GalleryRow;
use plantplan_core::palette::ColorToken;
use plantplan_types::{CalendarMark, CalendarRow, CostBreakdown};
use rust_decimal::Decimal;
use serde::Serialize;

/// Month initials for the calendar header.
const MONTH_INITIALS: [&str; 12] = ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];

/// Shown instead of a quality grade for species missing from the catalog.
const NOT_AVAILABLE: &str = "N/A";

/// Everything the planner prints, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// `(display name, quantity)` pairs sorted by species.
    pub order: Vec<(String, u64)>,
    /// Priced order list.
    pub costs: CostBreakdown,
    /// Planting calendar rows.
    pub calendar: Vec<CalendarRow>,
    /// Image gallery rows.
    pub gallery: Vec<GalleryRow>,
    /// Fill color per zone in plan order; `null` while unassigned.
    pub fills: Vec<Option<ColorToken>>,
    /// Currency symbol used for amounts.
    pub currency: String,
}

impl Report {
    /// Write the full text report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        write_order_list(out, &self.order)?;
        writeln!(out)?;
        write_costs(out, &self.costs, &self.currency)?;
        writeln!(out)?;
        write_calendar(out, &self.calendar)?;
        writeln!(out)?;
        write_fills(out, &self.fills)?;
        if !self.gallery.is_empty() {
            writeln!(out)?;
            write_gallery(out, &self.gallery)?;
        }
        Ok(())
    }
}

/// Width of the widest name, at least `min`.
fn name_width<'a>(names: impl Iterator<Item = &'a str>, min: usize) -> usize {
    names.map(|name| name.chars().count()).fold(min, usize::max)
}

/// Write the order list.
pub fn write_order_list(out: &mut impl Write, lines: &[(String, u64)]) -> io::Result<()> {
    writeln!(out, "Order list")?;
    if lines.is_empty() {
        return writeln!(out, "  (no finalized zones)");
    }
    let width = name_width(lines.iter().map(|(name, _)| name.as_str()), 7);
    for (name, quantity) in lines {
        writeln!(out, "  {name:<width$}  {quantity:>8}")?;
    }
    Ok(())
}

/// Write the cost breakdown with tax.
pub fn write_costs(out: &mut impl Write, costs: &CostBreakdown, currency: &str) -> io::Result<()> {
    writeln!(out, "Costs")?;
    let width = name_width(costs.lines.iter().map(|line| line.display_name.as_str()), 7);
    writeln!(
        out,
        "  {:<width$}  {:<7}  {:>8}  {:>10}  {:>12}",
        "Species", "Quality", "Quantity", "Unit", "Total"
    )?;
    for line in &costs.lines {
        writeln!(
            out,
            "  {:<width$}  {:<7}  {:>8}  {:>10}  {:>12}",
            line.display_name,
            line.quality.as_deref().unwrap_or(NOT_AVAILABLE),
            line.quantity,
            money(currency, line.unit_price),
            money(currency, line.line_total),
        )?;
    }
    let percent = costs.tax_rate.saturating_mul(Decimal::ONE_HUNDRED).normalize();
    writeln!(out, "  Subtotal: {}", money(currency, costs.subtotal))?;
    writeln!(out, "  Tax ({percent}%): {}", money(currency, costs.tax))?;
    writeln!(out, "  Total: {}", money(currency, costs.total))
}

/// Write the planting calendar grid. `S` marks structure, `B` flowering.
pub fn write_calendar(out: &mut impl Write, rows: &[CalendarRow]) -> io::Result<()> {
    writeln!(out, "Planting calendar")?;
    if rows.is_empty() {
        return writeln!(out, "  (no catalog species)");
    }
    let width = name_width(rows.iter().map(|row| row.display_name.as_str()), 7);
    writeln!(out, "  {:<width$}  {}", "Species", MONTH_INITIALS.join(" "))?;
    for row in rows {
        let cells: Vec<&str> = row.cells.iter().map(|cell| cell_symbol(*cell)).collect();
        writeln!(out, "  {:<width$}  {}", row.display_name, cells.join(" "))?;
    }
    Ok(())
}

/// Write the fill color of each zone, numbered as in the plan file.
pub fn write_fills(out: &mut impl Write, fills: &[Option<ColorToken>]) -> io::Result<()> {
    writeln!(out, "Zone fills")?;
    for (index, fill) in fills.iter().enumerate() {
        match fill {
            Some(color) => writeln!(out, "  zone {index}  {color}")?,
            None => writeln!(out, "  zone {index}  (unassigned)")?,
        }
    }
    Ok(())
}

/// Write the image gallery as rows of image paths.
pub fn write_gallery(out: &mut impl Write, rows: &[GalleryRow]) -> io::Result<()> {
    writeln!(out, "Images")?;
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .flatten()
            .map(|cell| format!("{} ({})", cell.display_name, cell.image_path))
            .collect();
        writeln!(out, "  {}", cells.join(" | "))?;
    }
    Ok(())
}

/// Printable symbol for a calendar cell.
const fn cell_symbol(cell: CalendarMark) -> &'static str {
    match cell {
        CalendarMark::Empty => ".",
        CalendarMark::Structure | CalendarMark::Flowering => cell.symbol(),
    }
}

/// Format an amount with its currency symbol, two decimals.
fn money(currency: &str, amount: Decimal) -> String {
    format!("{currency} {amount:.2}")
}
