use std::{env, fs, path::{Path, PathBuf}};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::Criteria,
    error::{ExperimentError, Result},
    features::FeatureFlags,
};

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "HOTTTNESSS_CONFIG";

/// Environment variable overriding `Settings::dataset_path`.
pub const DATASET_ENV: &str = "HOTTTNESSS_DATASET";

/// Which records the genre and artist vocabularies are built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyScope {
    /// Every loaded record, training and testing alike.
    #[default]
    FullCorpus,
    /// Only the training split.
    TrainingOnly,
}

/// How predictions are obtained once feature vectors are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Fit the selected model and predict with it.
    #[default]
    Fitted,
    /// Skip the model and predict the mean of the training outputs.
    TrainingMean,
}

/// Extra scalar appended on top of an experiment's base feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Basic,
    ArtistLifespan,
    NumPopular,
}

impl Variant {
    pub fn describe(self) -> &'static str {
        match self {
            Variant::Basic => "basic features",
            Variant::ArtistLifespan => "artist lifespan feature",
            Variant::NumPopular => "num popular songs feature",
        }
    }
}

/// Immutable configuration for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub dataset_path: PathBuf,
    /// Share of the records held out for testing, in `(0, 1)`.
    pub test_fraction: f64,
    /// Seed for shuffling before the split. Records keep file order when absent.
    pub seed: Option<u64>,
    pub popularity_threshold: f64,
    pub accuracy_tolerance: f64,
    pub lasso_alpha: f64,
    pub num_neighbors: usize,
    pub vocabulary: VocabularyScope,
    pub prediction: PredictionMode,
    /// Overrides the base feature flags of the binary being run.
    pub features: Option<FeatureFlags>,
    pub variants: Vec<Variant>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/songs.json"),
            test_fraction: 0.2,
            seed: None,
            popularity_threshold: 0.5,
            accuracy_tolerance: 0.05,
            lasso_alpha: 0.5,
            num_neighbors: 5,
            vocabulary: VocabularyScope::default(),
            prediction: PredictionMode::default(),
            features: None,
            variants: vec![Variant::Basic],
        }
    }
}

impl Settings {
    /// Loads the settings named by `HOTTTNESSS_CONFIG`, or the defaults when it
    /// is unset, then applies the `HOTTTNESSS_DATASET` override.
    ///
    /// # Errors
    /// Returns an `ExperimentError` if the file cannot be read or parsed, or if
    /// the resulting settings are invalid.
    pub fn load() -> Result<Self> {
        let mut settings = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::read(Path::new(&path))?,
            None => {
                debug!("{CONFIG_ENV} not set, using default settings");
                Self::default()
            }
        };

        if let Some(path) = env::var_os(DATASET_ENV) {
            settings.dataset_path = PathBuf::from(path);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file without validating them.
    ///
    /// # Errors
    /// Returns `ExperimentError::Io` or `ExperimentError::Parse`.
    pub fn read(path: &Path) -> Result<Self> {
        info!("reading settings from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ExperimentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ExperimentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks every value is within its valid range.
    ///
    /// # Errors
    /// Returns `ExperimentError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ExperimentError::InvalidConfig(format!(
                "test_fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }

        if !self.popularity_threshold.is_finite() {
            return Err(ExperimentError::InvalidConfig(
                "popularity_threshold must be finite".into(),
            ));
        }

        if !(self.accuracy_tolerance.is_finite() && self.accuracy_tolerance >= 0.0) {
            return Err(ExperimentError::InvalidConfig(format!(
                "accuracy_tolerance must be finite and >= 0, got {}",
                self.accuracy_tolerance
            )));
        }

        if !(self.lasso_alpha.is_finite() && self.lasso_alpha >= 0.0) {
            return Err(ExperimentError::InvalidConfig(format!(
                "lasso_alpha must be finite and >= 0, got {}",
                self.lasso_alpha
            )));
        }

        if self.num_neighbors < 2 {
            return Err(ExperimentError::InvalidConfig(format!(
                "num_neighbors must be at least 2, got {}",
                self.num_neighbors
            )));
        }

        if self.variants.is_empty() {
            return Err(ExperimentError::InvalidConfig(
                "at least one variant must be listed".into(),
            ));
        }

        Ok(())
    }

    /// Returns the rules predictions are judged by.
    pub fn criteria(&self) -> Criteria {
        Criteria {
            tolerance: self.accuracy_tolerance,
            popularity_threshold: self.popularity_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{ "seed": 7, "vocabulary": "training_only", "variants": ["basic", "num_popular"] }"#,
        )
        .unwrap();

        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.vocabulary, VocabularyScope::TrainingOnly);
        assert_eq!(settings.variants, vec![Variant::Basic, Variant::NumPopular]);
        assert_eq!(settings.test_fraction, 0.2);
        assert_eq!(settings.prediction, PredictionMode::Fitted);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{ "use_lasso": true }"#).is_err());
    }

    #[test]
    fn out_of_range_values_are_configuration_errors() {
        let cases = [
            Settings {
                test_fraction: 1.0,
                ..Settings::default()
            },
            Settings {
                accuracy_tolerance: -0.1,
                ..Settings::default()
            },
            Settings {
                lasso_alpha: f64::NAN,
                ..Settings::default()
            },
            Settings {
                num_neighbors: 1,
                ..Settings::default()
            },
            Settings {
                variants: vec![],
                ..Settings::default()
            },
        ];

        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(ExperimentError::InvalidConfig(_))),
                "{settings:?} should be rejected"
            );
        }
    }
}
