//! Request validation, readiness, and inference orchestration.
//!
//! The service context is built exactly once at startup and is immutable
//! afterwards; updating the model means restarting the process. The
//! predictor handle is shared by reference across all concurrent requests
//! and is never mutated after construction.

use crate::application::predictor::Predictor;
use crate::domain::errors::PredictionError;
use crate::domain::features::FEATURE_COUNT;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Inbound prediction request. The feature array must follow the
/// [`crate::domain::features::FEATURE_NAMES`] order; only its shape can be
/// checked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symbol: String,
    pub timestamp: i64,
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub symbol: String,
    pub timestamp: i64,
    /// 0 = sell, 1 = buy.
    pub prediction: u8,
    /// `[P(sell), P(buy)]`, summing to 1.
    pub probabilities: [f64; 2],
    /// Probability of the predicted class.
    pub score: f64,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    /// ISO-8601 UTC timestamp of the health check itself.
    pub timestamp: String,
}

pub struct PredictionService {
    predictor: Option<Arc<dyn Predictor>>,
}

impl PredictionService {
    /// Builds the service context. `None` means model load has not
    /// completed; the service then reports not-ready and rejects
    /// prediction requests.
    pub fn new(predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self { predictor }
    }

    pub fn ready(&self) -> bool {
        self.predictor.is_some()
    }

    /// Validates the request and runs inference. Never called for label
    /// generation; the serving path has no forward-looking data.
    pub fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        if request.features.len() != FEATURE_COUNT {
            return Err(PredictionError::Validation(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                request.features.len()
            )));
        }
        if let Some(pos) = request.features.iter().position(|v| !v.is_finite()) {
            return Err(PredictionError::Validation(format!(
                "feature {} is not a finite number",
                pos
            )));
        }

        let predictor = self
            .predictor
            .as_ref()
            .ok_or(PredictionError::ModelUnavailable)?;

        let probabilities = predictor.predict_proba(&request.features)?;
        let prediction = u8::from(probabilities[1] > probabilities[0]);
        let score = probabilities[usize::from(prediction)];

        info!(
            symbol = %request.symbol,
            timestamp = request.timestamp,
            prediction,
            score = format!("{:.4}", score),
            "prediction served"
        );

        Ok(PredictionResult {
            symbol: request.symbol.clone(),
            timestamp: request.timestamp,
            prediction,
            probabilities,
            score,
            model_version: predictor.version().to_string(),
        })
    }

    /// Readiness report. Never performs inference.
    pub fn health(&self) -> HealthStatus {
        match &self.predictor {
            Some(predictor) => HealthStatus {
                status: "healthy".to_string(),
                model_loaded: true,
                model_version: predictor.version().to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
            None => HealthStatus {
                status: "model_not_loaded".to_string(),
                model_loaded: false,
                model_version: "none".to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
        }
    }
}
