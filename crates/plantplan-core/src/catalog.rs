//! Plant catalog trait and an in-memory implementation.
//!
//! The catalog is an external, read-only collaborator: given a species key it
//! returns the species' quality grade, unit price, default density and month
//! ranges. The [`SpeciesCatalog`] trait abstracts where that data lives -- a
//! `SQLite` database, a YAML file, or a fixed list in tests.
//!
//! A miss is a first-class value ([`CatalogLookup::NotFound`]), never an
//! error: aggregation treats unknown species as zero-cost lines.

use std::collections::BTreeMap;
use std::path::Path;

use plantplan_types::{MonthRange, SpeciesKey, SpeciesRecord};
use rust_decimal::Decimal;

/// Errors that can occur when loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A record has a blank name and cannot be keyed.
    #[error("catalog record {index} has no name")]
    UnnamedRecord {
        /// Position of the record in the file.
        index: usize,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Result of a catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLookup {
    /// The species is in the catalog.
    Found(SpeciesRecord),
    /// The species is not in the catalog.
    NotFound,
}

impl CatalogLookup {
    /// Whether the species was found.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Borrow the record, if found.
    pub const fn as_found(&self) -> Option<&SpeciesRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound => None,
        }
    }

    /// Take the record, if found.
    pub fn found(self) -> Option<SpeciesRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound => None,
        }
    }
}

/// A read-only source of plant species data.
pub trait SpeciesCatalog {
    /// Look up a species by its normalized key.
    fn lookup(&self, key: &SpeciesKey) -> CatalogLookup;

    /// All species names in the catalog, sorted.
    fn names(&self) -> Vec<String>;

    /// Names containing `fragment`, case-insensitively, in sorted order.
    ///
    /// Used for species autocompletion. A blank fragment matches nothing.
    fn search(&self, fragment: &str) -> Vec<String> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// An in-memory catalog keyed by normalized species name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticCatalog {
    /// Records indexed by their normalized key.
    records: BTreeMap<SpeciesKey, SpeciesRecord>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Build a catalog from records. Records with blank names are skipped;
    /// a later record with the same normalized name replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = SpeciesRecord>) -> Self {
        let mut catalog = Self::new();
        for record in records {
            if catalog.insert(record).is_none() {
                tracing::warn!("skipping catalog record with a blank name");
            }
        }
        catalog
    }

    /// Load a catalog from a YAML file holding a list of species records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Yaml`] if it is not a valid record list, or
    /// [`CatalogError::UnnamedRecord`] if a record has a blank name.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&contents)?;
        tracing::info!(path = %path.display(), species = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog from a YAML list of species records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] on malformed YAML, or
    /// [`CatalogError::UnnamedRecord`] if a record has a blank name.
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let records: Vec<SpeciesRecord> = serde_yml::from_str(yaml)?;
        let mut catalog = Self::new();
        for (index, record) in records.into_iter().enumerate() {
            if catalog.insert(record).is_none() {
                return Err(CatalogError::UnnamedRecord { index });
            }
        }
        Ok(catalog)
    }

    /// Insert a record, returning its key, or `None` if the name is blank.
    pub fn insert(&mut self, record: SpeciesRecord) -> Option<SpeciesKey> {
        let key = record.key()?;
        self.records.insert(key.clone(), record);
        Some(key)
    }

    /// Number of species in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SpeciesCatalog for StaticCatalog {
    fn lookup(&self, key: &SpeciesKey) -> CatalogLookup {
        self.records
            .get(key)
            .cloned()
            .map_or(CatalogLookup::NotFound, CatalogLookup::Found)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.values().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }
}

/// Helper to build a catalog [`SpeciesRecord`].
fn perennial(
    name: &str,
    price_cents: i64,
    density: f64,
    flowering: (u8, u8),
    structure: (u8, u8),
) -> SpeciesRecord {
    SpeciesRecord {
        name: name.to_owned(),
        quality: Some("P9".to_owned()),
        unit_price: Decimal::new(price_cents, 2),
        default_density: Some(density),
        flowering: MonthRange::from_pair(flowering.0, flowering.1),
        structure: MonthRange::from_pair(structure.0, structure.1),
        image_path: None,
    }
}

/// The five perennials a fresh catalog database is seeded with.
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::from_records([
        perennial("Aster \"Little Carlow\"", 350, 7.0, (8, 10), (1, 12)),
        perennial("Calamintha nepeta ssp. nepeta", 300, 9.0, (6, 9), (2, 11)),
        perennial("Echinops bannaticus \"Taplow Blue\"", 325, 7.0, (7, 8), (0, 0)),
        perennial("Geranium x oxonianum \"Rose Clair\"", 350, 8.0, (6, 9), (0, 0)),
        perennial("Salvia nemerosa \"Schneehugel\"", 375, 7.0, (6, 8), (0, 0)),
    ])
}
