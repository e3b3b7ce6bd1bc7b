//! Image gallery layout for the planting plan document.
//!
//! Species with a catalog photo are laid out alphabetically in a fixed-width
//! grid. Species without a photo, or missing from the catalog, are skipped.

use std::collections::BTreeSet;

use plantplan_types::{GalleryCell, SpeciesKey};

use crate::catalog::SpeciesCatalog;

/// Default number of images per gallery row.
pub const DEFAULT_GALLERY_COLUMNS: usize = 3;

/// One gallery row. Trailing slots of the last row are `None`.
pub type GalleryRow = Vec<Option<GalleryCell>>;

/// Lay out species photos in rows of `columns` cells.
///
/// A `columns` of zero falls back to [`DEFAULT_GALLERY_COLUMNS`]. Every
/// returned row has exactly `columns` slots.
pub fn gallery_rows<'a>(
    species: impl IntoIterator<Item = &'a SpeciesKey>,
    catalog: &impl SpeciesCatalog,
    columns: usize,
) -> Vec<GalleryRow> {
    let columns = if columns == 0 {
        DEFAULT_GALLERY_COLUMNS
    } else {
        columns
    };

    let unique: BTreeSet<&SpeciesKey> = species.into_iter().collect();
    let cells: Vec<GalleryCell> = unique
        .into_iter()
        .filter_map(|key| {
            let record = catalog.lookup(key).found()?;
            let image_path = record.image_path.filter(|p| !p.trim().is_empty())?;
            Some(GalleryCell {
                species: key.clone(),
                display_name: key.display_name(),
                image_path,
            })
        })
        .collect();

    cells
        .chunks(columns)
        .map(|chunk| {
            let mut row: GalleryRow = chunk.iter().cloned().map(Some).collect();
            row.resize(columns, None);
            row
        })
        .collect()
}
