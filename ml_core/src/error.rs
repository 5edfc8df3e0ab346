use std::fmt;

/// The result type used by every predictor.
pub type Result<T> = std::result::Result<T, MlError>;

/// Errors produced by predictors when inputs are invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "features", "outputs").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// `predict` or `score` was called before `fit`.
    NotFitted,

    /// A hyperparameter is out of its valid range.
    InvalidParameter { name: &'static str, reason: String },

    /// The underlying estimator failed to fit or predict.
    Solver(String),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::NotFitted => write!(f, "the predictor has not been fitted"),
            MlError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            MlError::Solver(msg) => write!(f, "solver failed: {msg}"),
        }
    }
}

impl std::error::Error for MlError {}
