//! Forward-return labeling for supervised training.
//!
//! Labels require the realized close `horizon` bars in the future, so this
//! module is strictly offline. Nothing in the serving path may call it.

use crate::domain::bar::PriceBar;

/// Assigns a binary buy/sell label to each bar from its realized forward
/// return: 1 when `close[t+H]/close[t] - 1 > threshold`, else 0.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    /// Forward horizon H in bars.
    pub horizon: usize,
    /// Minimum forward return to label a bar as buy.
    pub threshold: f64,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self {
            horizon: 5,
            threshold: 0.01,
        }
    }
}

impl LabelGenerator {
    /// Labels every bar with a fully observed forward window.
    ///
    /// Output length is `bars.len() - horizon` (zero for shorter series):
    /// tail rows without a realized outcome are excluded, never defaulted.
    pub fn labels(&self, bars: &[PriceBar]) -> Vec<u8> {
        if bars.len() <= self.horizon {
            return Vec::new();
        }
        let n = bars.len() - self.horizon;
        let mut labels = Vec::with_capacity(n);
        for t in 0..n {
            let future_return = bars[t + self.horizon].close / bars[t].close - 1.0;
            labels.push(u8::from(future_return > self.threshold));
        }
        labels
    }
}
