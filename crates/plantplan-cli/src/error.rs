//! Error types for the planner binary.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! between reading the command line and printing the report.

/// Top-level error for the planner binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: plantplan_core::ConfigError,
    },

    /// Catalog loading failed.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: plantplan_core::CatalogError,
    },

    /// A planning operation was rejected.
    #[error("plan error: {source}")]
    Plan {
        /// The underlying planning error.
        #[from]
        source: plantplan_core::PlanError,
    },

    /// Reading the plan file or writing the report failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The plan file is not valid YAML.
    #[error("failed to parse plan YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// JSON report serialization failed.
    #[error("failed to serialize report: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// An assignment refers to a zone index the plan does not have.
    #[error("assignment {assignment} refers to zone {zone}, but the plan has {zones} zones")]
    UnknownZone {
        /// Position of the assignment in the plan file.
        assignment: usize,
        /// The zone index it refers to.
        zone: usize,
        /// Number of zones in the plan.
        zones: usize,
    },

    /// The command line could not be understood.
    #[error("usage: plantplan [--json] <plan.yaml> ({message})")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },
}

impl From<serde_yml::Error> for CliError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
