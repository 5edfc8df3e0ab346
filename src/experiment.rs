use std::{fmt, num::NonZeroUsize};

use log::{debug, info};
use machine_learning::{KNeighborsRegressor, Lasso, LinearRegression, MeanBaseline};
use ml_core::Predictor;

use crate::{
    analysis::{Analysis, Criteria, PopularityRatios, PredictionResult},
    error::Result,
    features::{expected_outputs, FeatureFlags, FeatureVectorBuilder},
    metadata::{MetadataAccessor, Record, SongCorpus},
    settings::{PredictionMode, Settings},
};

/// The model an experiment fits when predictions come from a fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelChoice {
    LinearRegression,
    Lasso { alpha: f64 },
    KNeighbors { k: NonZeroUsize },
}

impl ModelChoice {
    /// Builds a fresh, unfitted predictor for `mode`.
    ///
    /// # Errors
    /// Returns `ExperimentError::Model` if a hyperparameter is out of range.
    pub fn predictor(self, mode: PredictionMode) -> Result<Box<dyn Predictor>> {
        let predictor: Box<dyn Predictor> = match (mode, self) {
            (PredictionMode::TrainingMean, _) => Box::new(MeanBaseline::new()),
            (PredictionMode::Fitted, ModelChoice::LinearRegression) => {
                Box::new(LinearRegression::new())
            }
            (PredictionMode::Fitted, ModelChoice::Lasso { alpha }) => Box::new(Lasso::new(alpha)?),
            (PredictionMode::Fitted, ModelChoice::KNeighbors { k }) => {
                Box::new(KNeighborsRegressor::new(k))
            }
        };

        Ok(predictor)
    }
}

/// A named feature set paired with a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub name: String,
    pub flags: FeatureFlags,
    pub model: ModelChoice,
}

/// Metrics over one evaluated set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReport {
    pub samples: usize,
    /// Percentage of predictions within tolerance.
    pub accuracy: f64,
    /// Coefficient of determination of the predictions.
    pub r2: f64,
}

/// Everything printed at the end of an experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    pub name: String,
    pub model: &'static str,
    pub width: usize,
    pub average_hotttnesss: f64,
    pub training: PhaseReport,
    pub testing: PhaseReport,
    pub ratios: PopularityRatios,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ({}) ===", self.name, self.model)?;
        writeln!(
            f,
            "{} features, {} training songs, {} testing songs, average hotttnesss {:.4}",
            self.width, self.training.samples, self.testing.samples, self.average_hotttnesss
        )?;
        writeln!(f, "Predictor achieved a training accuracy of {:.2}%", self.training.accuracy)?;
        writeln!(f, "Training R^2 score: {:.4}", self.training.r2)?;
        writeln!(f, "Predictor achieved a test accuracy of {:.2}%", self.testing.accuracy)?;
        writeln!(f, "Test R^2 score: {:.4}", self.testing.r2)?;
        writeln!(f, "Ratio of popular songs correctly predicted: {:.4}", self.ratios.popular)?;
        write!(f, "Ratio of unpopular songs correctly predicted: {:.4}", self.ratios.unpopular)
    }
}

/// Fit phase: owns the builder and an unfitted predictor.
pub struct Trainer<'a> {
    builder: FeatureVectorBuilder<'a>,
    predictor: Box<dyn Predictor>,
}

/// Evaluate phase: only reachable through `Trainer::fit`.
pub struct Fitted<'a> {
    builder: FeatureVectorBuilder<'a>,
    predictor: Box<dyn Predictor>,
}

/// Predictions over one set along with the predictor's R² on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: PredictionResult,
    pub r2: f64,
}

impl<'a> Trainer<'a> {
    pub fn new(builder: FeatureVectorBuilder<'a>, predictor: Box<dyn Predictor>) -> Self {
        Self { builder, predictor }
    }

    /// Builds the training vectors and fits the predictor on them.
    ///
    /// # Errors
    /// Returns an `ExperimentError` if a vector cannot be built or the predictor
    /// rejects the samples.
    pub fn fit(mut self, training: &[Record]) -> Result<Fitted<'a>> {
        let inputs = self.builder.build_all(training)?;
        let outputs = expected_outputs(training);

        info!(
            "training {} on {} songs",
            self.predictor.name(),
            training.len()
        );
        self.predictor.fit(inputs.view(), outputs.view())?;

        Ok(Fitted {
            builder: self.builder,
            predictor: self.predictor,
        })
    }
}

impl Fitted<'_> {
    /// Predicts every record of `records` and pairs it with its expected value.
    ///
    /// # Errors
    /// Returns an `ExperimentError` if a vector cannot be built or the predictor
    /// rejects it.
    pub fn evaluate(&self, records: &[Record]) -> Result<Evaluation> {
        let inputs = self.builder.build_all(records)?;
        let expected = expected_outputs(records);

        let predicted = self.predictor.predict(inputs.view())?;
        let r2 = self.predictor.score(inputs.view(), expected.view())?;
        debug!("evaluated {} songs, r2={r2}", records.len());

        let result = PredictionResult::new(predicted.to_vec(), expected.to_vec())?;
        Ok(Evaluation { result, r2 })
    }
}

/// Runs experiments against one metadata accessor.
pub struct ExperimentRunner<'a> {
    metadata: &'a dyn MetadataAccessor,
    criteria: Criteria,
    mode: PredictionMode,
}

impl<'a> ExperimentRunner<'a> {
    pub fn new(
        metadata: &'a dyn MetadataAccessor,
        criteria: Criteria,
        mode: PredictionMode,
    ) -> Self {
        Self {
            metadata,
            criteria,
            mode,
        }
    }

    /// Fits on the training set, then evaluates on both sets.
    ///
    /// # Errors
    /// Returns the first configuration, data or model error encountered.
    pub fn run(&self, experiment: &Experiment) -> Result<ExperimentReport> {
        info!("preparing data with {}", experiment.name);
        let builder = FeatureVectorBuilder::new(self.metadata, &experiment.flags)?;
        let width = builder.width();
        let predictor = experiment.model.predictor(self.mode)?;
        let model = predictor.name();

        let (training, testing) = self.metadata.datasets();
        let fitted = Trainer::new(builder, predictor).fit(training)?;

        let train = fitted.evaluate(training)?;
        info!("testing {model} on {} songs", testing.len());
        let test = fitted.evaluate(testing)?;

        let train_analysis = Analysis::new(&train.result, self.criteria);
        let test_analysis = Analysis::new(&test.result, self.criteria);

        Ok(ExperimentReport {
            name: experiment.name.clone(),
            model,
            width,
            average_hotttnesss: self.metadata.average_hotttnesss(),
            training: PhaseReport {
                samples: training.len(),
                accuracy: train_analysis.percentage_accuracy(),
                r2: train.r2,
            },
            testing: PhaseReport {
                samples: testing.len(),
                accuracy: test_analysis.percentage_accuracy(),
                r2: test.r2,
            },
            ratios: test_analysis.precision_recall_analysis(),
        })
    }
}

/// Loads the dataset once and runs every variant listed in `settings` on top
/// of `base` flags, each with a fresh predictor.
///
/// # Errors
/// Returns the first error of any stage; later variants are not run.
pub fn run_variants(
    settings: &Settings,
    base: &FeatureFlags,
    model: ModelChoice,
) -> Result<Vec<ExperimentReport>> {
    settings.validate()?;
    let corpus = SongCorpus::load(settings)?;
    let runner = ExperimentRunner::new(&corpus, settings.criteria(), settings.prediction);

    settings
        .variants
        .iter()
        .map(|&variant| {
            let experiment = Experiment {
                name: variant.describe().to_string(),
                flags: base.with_variant(variant),
                model,
            };
            runner.run(&experiment)
        })
        .collect()
}

/// Resolves the base flags: the settings override, or `preset` when absent.
pub fn base_flags(settings: &Settings, preset: FeatureFlags) -> FeatureFlags {
    settings.features.clone().unwrap_or(preset)
}
