use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration for the prediction server.
///
/// Training parameters are CLI flags on the `train` binary, not
/// environment variables; only the serving process is configured here.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let model_path = env::var("MODEL_PATH")
            .unwrap_or_else(|_| "data/model.json".to_string())
            .into();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse::<SocketAddr>()
            .context("Failed to parse BIND_ADDR")?;

        Ok(Self {
            model_path,
            bind_addr,
        })
    }
}
