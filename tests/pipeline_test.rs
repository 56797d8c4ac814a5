//! End-to-end pipeline tests: CSV bars through training to a served
//! prediction, exercising the feature/label contract at each stage.

use approx::assert_relative_eq;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use trademl::application::forest::{ForestParams, ForestPredictor};
use trademl::application::service::{PredictionRequest, PredictionService};
use trademl::application::trainer::{self, TrainerConfig};
use trademl::domain::dataset::DatasetBuilder;
use trademl::domain::errors::TrainingError;
use trademl::domain::features::{FEATURE_COUNT, FeatureExtractor};
use trademl::domain::labels::LabelGenerator;
use trademl::infrastructure::csv_loader;

fn write_bars_csv(path: &Path, closes: &[f64]) {
    let mut file = File::create(path).unwrap();
    writeln!(
        file,
        "timestamp,symbol,open,high,low,close,adj_close,volume,bid,ask"
    )
    .unwrap();
    for (i, close) in closes.iter().enumerate() {
        let ts = 1_700_000_000 + i as i64 * 86_400;
        let volume = 1_000_000.0 + (i % 10) as f64 * 50_000.0;
        writeln!(
            file,
            "{ts},AAPL,{close},{close},{close},{close},{close},{volume},{close},{close}"
        )
        .unwrap();
    }
}

/// Oscillating series large enough to train on, with both label classes.
fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 20.0 * (i as f64 / 5.0).sin())
        .collect()
}

fn trainer_config(input: &Path, output: &Path) -> TrainerConfig {
    TrainerConfig {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        labeler: LabelGenerator::default(),
        dataset: DatasetBuilder::default(),
        forest: ForestParams {
            n_trees: 20,
            ..ForestParams::default()
        },
    }
}

#[test]
fn feature_matrix_is_aligned_and_fixed_width() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bars.csv");
    write_bars_csv(&input, &wavy_closes(120));

    let bars = csv_loader::load_bars(&input).unwrap();
    let rows = FeatureExtractor::default().extract(&bars);
    assert_eq!(rows.len(), 120);
    for row in &rows {
        assert_eq!(row.len(), FEATURE_COUNT);
        assert!(row.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn insufficient_samples_abort_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bars.csv");
    let output = dir.path().join("model.json");
    // 85 bars leave 80 labeled rows, below the minimum of 100.
    write_bars_csv(&input, &wavy_closes(85));

    let err = trainer::run(&trainer_config(&input, &output)).unwrap_err();
    assert!(matches!(
        err,
        TrainingError::InsufficientSamples { count: 80, .. }
    ));
    assert!(!output.exists());
}

#[test]
fn missing_input_aborts_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.csv");
    let output = dir.path().join("model.json");

    let err = trainer::run(&trainer_config(&input, &output)).unwrap_err();
    assert!(matches!(err, TrainingError::DataSource { .. }));
    assert!(!output.exists());
}

#[test]
fn training_run_writes_artifact_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bars.csv");
    let output = dir.path().join("model.json");
    write_bars_csv(&input, &wavy_closes(300));

    let report = trainer::run(&trainer_config(&input, &output)).unwrap();
    assert!(output.exists());
    assert_eq!(report.samples, 295);
    assert_eq!(report.train_size + report.test_size, 295);
    assert!(report.buy_fraction > 0.0 && report.buy_fraction < 1.0);
    assert_eq!(report.model_version, "model.json");
}

#[test]
fn trained_model_serves_a_prediction_with_parity_features() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bars.csv");
    let output = dir.path().join("model.json");
    write_bars_csv(&input, &wavy_closes(300));
    trainer::run(&trainer_config(&input, &output)).unwrap();

    let predictor = ForestPredictor::load(&output).unwrap();
    let service = PredictionService::new(Some(Arc::new(predictor)));

    // Serving-time features come from the same extractor routine that
    // produced the training matrix.
    let bars = csv_loader::load_bars(&input).unwrap();
    let latest = FeatureExtractor::default().latest(&bars).unwrap();
    let result = service
        .predict(&PredictionRequest {
            symbol: "AAPL".to_string(),
            timestamp: bars.last().unwrap().timestamp,
            features: latest.to_vec(),
        })
        .unwrap();

    assert!(result.prediction <= 1);
    assert_relative_eq!(
        result.probabilities[0] + result.probabilities[1],
        1.0,
        epsilon = 1e-6
    );
    assert!((0.0..=1.0).contains(&result.score));
    assert_eq!(result.model_version, "model.json");
}
