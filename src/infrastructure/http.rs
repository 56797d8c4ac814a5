//! HTTP transport for the prediction service.
//!
//! Endpoints:
//! - `POST /predict` -> prediction result, or 400/503/500 per error class
//! - `GET /health`   -> readiness report, always 200

use crate::application::service::{HealthStatus, PredictionRequest, PredictionResult, PredictionService};
use crate::domain::errors::PredictionError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

struct ApiError(PredictionError);

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PredictionError::Validation(reason) => {
                warn!("rejected request: {}", reason);
                StatusCode::BAD_REQUEST
            }
            PredictionError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictionError::Inference { detail } => {
                // Full detail stays in the log; callers get the generic
                // Display string only.
                error!("inference failure: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn predict_handler(
    State(service): State<Arc<PredictionService>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let result = service.predict(&request)?;
    Ok(Json(result))
}

async fn health_handler(State(service): State<Arc<PredictionService>>) -> Json<HealthStatus> {
    Json(service.health())
}

/// Builds the application router over a shared, read-only service context.
pub fn router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .with_state(service)
}

/// Binds and serves until the process is shut down.
pub async fn serve(service: Arc<PredictionService>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("prediction server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received. Exiting...");
    }
}
