use crate::domain::errors::PredictionError;

/// Interface to an already-trained binary classifier.
///
/// Implementations must be reentrant for read-only use: the service shares
/// one instance across all concurrent requests without locking.
pub trait Predictor: Send + Sync {
    /// Class probability pair `[P(sell), P(buy)]`, summing to 1.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictionError>;

    /// Predicted class: the argmax of the probability pair, ties going to
    /// class 0.
    fn predict(&self, features: &[f64]) -> Result<u8, PredictionError> {
        let probabilities = self.predict_proba(features)?;
        Ok(u8::from(probabilities[1] > probabilities[0]))
    }

    /// Get model name/type.
    fn name(&self) -> &str;

    /// Get model version/id.
    fn version(&self) -> &str;
}
