//! Error types for cadence-verify.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from the engine and the scenario catalog.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// `run_scenario` was asked for an id that was never registered.
    #[error("unknown scenario '{id}'")]
    UnknownScenario { id: String },

    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context.
    #[error("failed to parse scenario file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The catalog path did not exist.
    #[error("scenario catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },
}

/// Convenience constructor for [`VerifyError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> VerifyError {
    VerifyError::Io {
        path: path.into(),
        source,
    }
}
