use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the serving path.
///
/// `Inference` keeps its diagnostic detail out of the Display string;
/// callers see a generic message and the detail goes to the log.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("model not loaded")]
    ModelUnavailable,

    #[error("internal inference error")]
    Inference { detail: String },
}

/// Errors that abort an offline training run.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("cannot read training data {path}: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse training data: {0}")]
    Csv(#[from] csv::Error),

    #[error("price series is empty")]
    EmptySeries,

    #[error("not enough labeled samples: {count} (minimum {minimum})")]
    InsufficientSamples { count: usize, minimum: usize },

    #[error("model fit failed: {0}")]
    Fit(String),

    #[error("failed to write model artifact {path}: {detail}")]
    Artifact { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let err = PredictionError::Validation("expected 8 features, got 7".to_string());
        let msg = err.to_string();
        assert!(msg.contains("invalid request"));
        assert!(msg.contains("got 7"));
    }

    #[test]
    fn test_inference_error_hides_detail() {
        let err = PredictionError::Inference {
            detail: "matrix shape mismatch in tree 42".to_string(),
        };
        assert_eq!(err.to_string(), "internal inference error");
    }

    #[test]
    fn test_insufficient_samples_formatting() {
        let err = TrainingError::InsufficientSamples {
            count: 80,
            minimum: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("80"));
        assert!(msg.contains("100"));
    }
}
