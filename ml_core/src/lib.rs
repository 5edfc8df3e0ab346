mod error;
mod model;
mod stats;

pub use error::{MlError, Result};
pub use model::{check_samples, Predictor};
pub use stats::r2_score;
