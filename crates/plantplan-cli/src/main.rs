//! Planting plan command-line tool.
//!
//! Reads a YAML plan file (zone boundaries, species assignments and an
//! optional inline catalog), runs it through a planning session and prints
//! the order list, the priced cost breakdown, the planting calendar, the zone
//! fill colors and the image gallery.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `plantplan.yaml` (or `PLANTPLAN_CONFIG`)
//! 3. Initialize structured logging (tracing)
//! 4. Load the plan file and pick a catalog
//! 5. Import the zones and apply the assignments
//! 6. Print the report as text or JSON

mod error;
mod plan_file;
mod report;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use plantplan_core::aggregate::order_lines;
use plantplan_core::{PlannerConfig, Session, StaticCatalog, sample_catalog};
use plantplan_types::TotalsMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::plan_file::PlanFile;
use crate::report::Report;

/// Environment variable naming the configuration file.
const CONFIG_ENV_VAR: &str = "PLANTPLAN_CONFIG";

/// Configuration file used when `PLANTPLAN_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "plantplan.yaml";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    /// Plan file to load.
    plan: PathBuf,
    /// Print the report as JSON instead of text.
    json: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration, catalog or plan cannot be loaded,
/// if the plan is rejected, or if the report cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Parse the command line.
    let args = parse_args(std::env::args().skip(1))?;

    // 2. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 3. Initialize structured logging.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        config = %config_path.display(),
        default_density = config.planting.default_density,
        tax_rate = %config.pricing.tax_rate,
        "Configuration loaded"
    );

    // 4. Load the plan and pick a catalog.
    let plan = PlanFile::from_file(&args.plan)?;
    let catalog = load_catalog(&plan, &config)?;

    // 5. Build the session.
    let mut session = Session::from_config(&config)?;
    let zones = session.import(&plan)?;
    let applied = plan.apply_assignments(&mut session, &catalog)?;
    info!(zones, applied, finalized = session.live_totals().len(), "Plan applied");

    // 6. Print the report.
    let report = Report {
        order: order_lines(&session.species_totals(TotalsMode::Order)),
        costs: session.cost_breakdown(&catalog),
        calendar: session.calendar_rows(&catalog),
        gallery: session.gallery_rows(&catalog),
        fills: session.zone_fills(),
        currency: config.pricing.currency.clone(),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report).map_err(CliError::from)?;
        writeln!(out)?;
    } else {
        report.write_text(&mut out)?;
    }
    Ok(())
}

/// Parse `[--json] <plan.yaml>`.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut json = false;
    let mut plan = None;
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage {
                    message: format!("unknown flag {flag}"),
                });
            }
            _ if plan.is_some() => {
                return Err(CliError::Usage {
                    message: "more than one plan file given".to_owned(),
                });
            }
            path => plan = Some(PathBuf::from(path)),
        }
    }
    let plan = plan.ok_or_else(|| CliError::Usage {
        message: "no plan file given".to_owned(),
    })?;
    Ok(Args { plan, json })
}

/// Configuration path from `PLANTPLAN_CONFIG`, or `plantplan.yaml`.
fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<PlannerConfig, CliError> {
    if path.exists() {
        Ok(PlannerConfig::from_file(path)?)
    } else {
        let mut config = PlannerConfig::default();
        config.catalog.apply_env_overrides();
        Ok(config)
    }
}

/// The plan's inline catalog, else the configured catalog file, else the
/// built-in sample catalog.
fn load_catalog(plan: &PlanFile, config: &PlannerConfig) -> Result<StaticCatalog, CliError> {
    if let Some(catalog) = plan.inline_catalog() {
        info!(species = catalog.len(), "Using inline plan catalog");
        return Ok(catalog);
    }
    match &config.catalog.path {
        Some(path) => Ok(StaticCatalog::from_file(path)?),
        None => {
            info!("No catalog configured, using sample catalog");
            Ok(sample_catalog())
        }
    }
}
