//! Configuration loading and typed config structures for plantplan.
//!
//! The configuration lives in `plantplan.yaml` next to the plan files. Every
//! section is optional; a missing file or section yields the defaults below.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::aggregate::DEFAULT_TAX_RATE;
use crate::gallery::DEFAULT_GALLERY_COLUMNS;

/// Default planting density in plants per square metre.
pub const DEFAULT_DENSITY: f64 = 7.0;

/// Environment variable that overrides `catalog.path`.
pub const CATALOG_ENV_VAR: &str = "PLANTPLAN_CATALOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration, mirroring `plantplan.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlannerConfig {
    /// Planting defaults.
    #[serde(default)]
    pub planting: PlantingConfig,

    /// Pricing and tax.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Document export layout.
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Plant catalog location.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PLANTPLAN_CATALOG`, when set, overrides `catalog.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.catalog.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the YAML types cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let density = self.planting.default_density;
        if !density.is_finite() || density <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "planting.default_density",
                message: format!("must be a positive number, got {density}"),
            });
        }
        if self.pricing.tax_rate.is_sign_negative() {
            return Err(ConfigError::Invalid {
                field: "pricing.tax_rate",
                message: format!("must not be negative, got {}", self.pricing.tax_rate),
            });
        }
        if self.export.gallery_columns == 0 {
            return Err(ConfigError::Invalid {
                field: "export.gallery_columns",
                message: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Planting defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantingConfig {
    /// Density for new zones and for species without a catalog density.
    #[serde(default = "default_density")]
    pub default_density: f64,
}

impl Default for PlantingConfig {
    fn default() -> Self {
        Self {
            default_density: default_density(),
        }
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PricingConfig {
    /// Tax rate applied to the order subtotal.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Currency symbol printed before amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            currency: default_currency(),
        }
    }
}

/// Export layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    /// Images per gallery row.
    #[serde(default = "default_gallery_columns")]
    pub gallery_columns: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gallery_columns: default_gallery_columns(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit log lines as JSON objects instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Catalog location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// YAML catalog file. `None` uses the built-in sample catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Override the catalog path with `PLANTPLAN_CATALOG` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Override the catalog path from an arbitrary variable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(CATALOG_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.path = Some(PathBuf::from(val));
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_density() -> f64 {
    DEFAULT_DENSITY
}

const fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

fn default_currency() -> String {
    "€".to_owned()
}

const fn default_gallery_columns() -> usize {
    DEFAULT_GALLERY_COLUMNS
}

fn default_log_level() -> String {
    "info".to_owned()
}
