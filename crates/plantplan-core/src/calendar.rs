//! Planting calendar encoding: month ranges to 12-cell presence rows.
//!
//! Each species has a structural-interest range and a flowering range. Both
//! are written into the same row, structure first, then flowering, so a
//! month in both ranges shows [`CalendarMark::Flowering`].
//!
//! Ranges are assumed not to wrap around the year end. A range such as
//! November to February (`start > end`) currently marks no months; how it
//! should render is an open question.

use std::collections::BTreeSet;

use plantplan_types::{
    CalendarMark, CalendarRow, MONTHS_PER_YEAR, MonthRange, SpeciesKey, SpeciesRecord,
};

use crate::catalog::SpeciesCatalog;

/// Encode the two month ranges of a species into one calendar row.
pub fn encode_row(
    structure: Option<MonthRange>,
    flowering: Option<MonthRange>,
) -> [CalendarMark; MONTHS_PER_YEAR] {
    let mut cells = [CalendarMark::Empty; MONTHS_PER_YEAR];
    if let Some(range) = structure {
        mark(&mut cells, range, CalendarMark::Structure);
    }
    if let Some(range) = flowering {
        mark(&mut cells, range, CalendarMark::Flowering);
    }
    cells
}

/// Write `marker` into every month of `range`.
fn mark(cells: &mut [CalendarMark; MONTHS_PER_YEAR], range: MonthRange, marker: CalendarMark) {
    if range.wraps_year() {
        tracing::warn!(
            start = range.start,
            end = range.end,
            ?marker,
            "Month range wraps the year end, not encoded"
        );
        return;
    }
    for month in range.months() {
        if let Some(cell) = usize::from(month)
            .checked_sub(1)
            .and_then(|index| cells.get_mut(index))
        {
            *cell = marker;
        }
    }
}

/// Calendar row for one catalog record.
pub fn calendar_row(species: SpeciesKey, record: &SpeciesRecord) -> CalendarRow {
    CalendarRow {
        display_name: species.display_name(),
        species,
        cells: encode_row(record.structure, record.flowering),
    }
}

/// Calendar rows for a set of species, sorted by species key.
///
/// Duplicates collapse to one row. Species not in the catalog (including
/// the unknown-species bucket) have no month data and are left out.
pub fn calendar_rows<'a>(
    species: impl IntoIterator<Item = &'a SpeciesKey>,
    catalog: &impl SpeciesCatalog,
) -> Vec<CalendarRow> {
    let unique: BTreeSet<&SpeciesKey> = species.into_iter().collect();
    unique
        .into_iter()
        .filter_map(|key| {
            catalog
                .lookup(key)
                .found()
                .map(|record| calendar_row(key.clone(), &record))
        })
        .collect()
}
