//! Random-forest implementation of [`Predictor`] backed by smartcore.
//!
//! The forest is fitted as a regressor on {0.0, 1.0} labels, so its raw
//! output is the fraction of trees voting buy. Clamped to [0, 1] that is
//! the buy probability, and the pair `[1-p, p]` is the class distribution.

use crate::application::predictor::Predictor;
use crate::domain::errors::{PredictionError, TrainingError};
use crate::domain::features::FeatureVector;
use anyhow::{Context, Result};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Hyperparameters for fitting, defaults matching the reference model.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 20,
        }
    }
}

pub struct ForestPredictor {
    model: Forest,
    version: String,
}

impl ForestPredictor {
    /// Fits a forest on labeled feature rows.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[u8],
        params: &ForestParams,
    ) -> Result<Self, TrainingError> {
        let rows: Vec<Vec<f64>> = features.iter().map(|f| f.to_vec()).collect();
        let x = DenseMatrix::from_2d_vec(&rows)
            .map_err(|e| TrainingError::Fit(format!("matrix creation failed: {}", e)))?;
        let y: Vec<f64> = labels.iter().map(|&l| f64::from(l)).collect();

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(params.n_trees)
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split);

        let model = RandomForestRegressor::fit(&x, &y, params)
            .map_err(|e| TrainingError::Fit(e.to_string()))?;

        Ok(Self {
            model,
            version: "untrained".to_string(),
        })
    }

    /// Loads a serialized model. The artifact file name becomes the
    /// reported model version.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file {}", path.display()))?;
        let model: Forest = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize model {}", path.display()))?;
        info!("Loaded ML model from {}", path.display());
        Ok(Self {
            model,
            version: artifact_version(path),
        })
    }

    /// Writes the model artifact as JSON and stamps this predictor with
    /// the artifact's version.
    pub fn save(&mut self, path: &Path) -> Result<(), TrainingError> {
        let artifact_err = |detail: String| TrainingError::Artifact {
            path: path.to_path_buf(),
            detail,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| artifact_err(e.to_string()))?;
        }
        let file = File::create(path).map_err(|e| artifact_err(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), &self.model)
            .map_err(|e| artifact_err(e.to_string()))?;
        self.version = artifact_version(path);
        info!("Model saved to {}", path.display());
        Ok(())
    }
}

fn artifact_version(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Predictor for ForestPredictor {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictionError> {
        let inference_err = |detail: String| PredictionError::Inference { detail };

        let matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()])
            .map_err(|e| inference_err(format!("matrix creation failed: {}", e)))?;
        let outputs = self
            .model
            .predict(&matrix)
            .map_err(|e| inference_err(format!("prediction failed: {}", e)))?;
        let vote = outputs
            .first()
            .copied()
            .ok_or_else(|| inference_err("no prediction returned".to_string()))?;

        let p_buy = vote.clamp(0.0, 1.0);
        Ok([1.0 - p_buy, p_buy])
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        &self.version
    }
}
