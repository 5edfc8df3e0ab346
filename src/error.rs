use std::{fmt, io, path::PathBuf};

use ml_core::MlError;

/// The result type used across the experiment pipeline.
pub type Result<T> = std::result::Result<T, ExperimentError>;

/// All errors that can abort an experiment run.
#[derive(Debug)]
pub enum ExperimentError {
    /// Invalid settings or feature flags, caught before any model is fitted.
    InvalidConfig(String),
    /// A record lacks a field that an enabled feature needs.
    MissingField { artist: String, field: &'static str },
    /// A dataset or settings file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// A dataset or settings file is not valid JSON for its schema.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The predictor rejected its inputs.
    Model(MlError),
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::MissingField { artist, field } => {
                write!(f, "record by '{artist}' has no value for enabled feature '{field}'")
            }
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
            Self::Model(e) => write!(f, "model error: {e}"),
        }
    }
}

impl std::error::Error for ExperimentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlError> for ExperimentError {
    fn from(e: MlError) -> Self {
        Self::Model(e)
    }
}
