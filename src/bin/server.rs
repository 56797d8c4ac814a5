//! Prediction server - headless serving binary
//!
//! Loads the model artifact exactly once at startup and serves predictions
//! over HTTP until shutdown. A failed load is fatal; there is no hot-reload,
//! updating the model means restarting the process.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=data/model.json BIND_ADDR=0.0.0.0:8000 cargo run --bin server
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;
use trademl::application::forest::ForestPredictor;
use trademl::application::predictor::Predictor;
use trademl::application::service::PredictionService;
use trademl::config::Config;
use trademl::infrastructure::http;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Prediction server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: model={}, bind={}",
        config.model_path.display(),
        config.bind_addr
    );

    // Single load attempt; failure here must never be masked.
    let predictor = ForestPredictor::load(&config.model_path)
        .context("Model load failed; run the train binary first")?;
    info!(
        "Model ready: {} ({})",
        predictor.name(),
        predictor.version()
    );

    let service = Arc::new(PredictionService::new(Some(Arc::new(predictor))));
    http::serve(service, config.bind_addr).await
}
