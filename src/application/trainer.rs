//! Offline training pipeline: bars -> features -> labels -> split -> fit
//! -> evaluation -> artifact.

use crate::application::forest::{ForestParams, ForestPredictor};
use crate::application::predictor::Predictor;
use crate::domain::dataset::DatasetBuilder;
use crate::domain::errors::TrainingError;
use crate::domain::features::{FeatureExtractor, FeatureVector};
use crate::domain::labels::LabelGenerator;
use crate::infrastructure::csv_loader;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub labeler: LabelGenerator,
    pub dataset: DatasetBuilder,
    pub forest: ForestParams,
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub buy_fraction: f64,
    /// Held-out accuracy; `None` when the test side came out empty.
    pub accuracy: Option<f64>,
    pub model_version: String,
}

/// Runs the full offline pipeline and writes the model artifact.
///
/// Aborts before any fit when the labeled sample count is below the
/// minimum viable threshold; no artifact is written on any error path.
pub fn run(config: &TrainerConfig) -> Result<TrainingReport, TrainingError> {
    let bars = csv_loader::load_bars(&config.input)?;
    if bars.is_empty() {
        return Err(TrainingError::EmptySeries);
    }
    info!(bars = bars.len(), input = %config.input.display(), "training data loaded");

    let features = FeatureExtractor::default().extract(&bars);
    let labels = config.labeler.labels(&bars);

    let dataset = config.dataset.build(&features, &labels)?;
    let buys = dataset.labels.iter().filter(|&&l| l == 1).count();
    let buy_fraction = buys as f64 / dataset.len() as f64;
    info!(
        samples = dataset.len(),
        buys,
        sells = dataset.len() - buys,
        "labeled dataset built"
    );

    let split = config.dataset.split(&dataset);
    info!(
        train = split.y_train.len(),
        test = split.y_test.len(),
        "train/test split done"
    );

    let mut model = ForestPredictor::fit(&split.x_train, &split.y_train, &config.forest)?;

    let accuracy = evaluate(&model, &split.x_test, &split.y_test)?;
    if let Some(acc) = accuracy {
        info!(accuracy = format!("{:.4}", acc), "held-out evaluation");
    }

    model.save(&config.output)?;

    Ok(TrainingReport {
        samples: dataset.len(),
        train_size: split.y_train.len(),
        test_size: split.y_test.len(),
        buy_fraction,
        accuracy,
        model_version: model.version().to_string(),
    })
}

fn evaluate(
    model: &ForestPredictor,
    x_test: &[FeatureVector],
    y_test: &[u8],
) -> Result<Option<f64>, TrainingError> {
    if x_test.is_empty() {
        return Ok(None);
    }
    let mut correct = 0usize;
    for (row, &label) in x_test.iter().zip(y_test.iter()) {
        let predicted = model
            .predict(row)
            .map_err(|e| TrainingError::Fit(format!("evaluation failed: {}", e)))?;
        if predicted == label {
            correct += 1;
        }
    }
    Ok(Some(correct as f64 / x_test.len() as f64))
}
