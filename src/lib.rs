pub mod analysis;
pub mod error;
pub mod experiment;
pub mod features;
pub mod metadata;
pub mod settings;
mod test_support;

pub use error::{ExperimentError, Result};
pub use experiment::{run_variants, Experiment, ExperimentReport, ExperimentRunner, ModelChoice};
pub use features::{FeatureFlags, FeatureVectorBuilder};
pub use metadata::{MetadataAccessor, SongCorpus};
pub use settings::Settings;
