//! Technical-indicator feature computation over OHLCV bars.
//!
//! This module is the single authority for the feature schema: the names,
//! the order, the window lengths, and the fill policy. The same code path
//! serves both offline training and online feature construction, so any
//! change here is a breaking change for every trained model.

use crate::domain::bar::PriceBar;

/// Ordered list of feature names.
/// This order MUST match the order of values inside [`FeatureVector`].
/// Any permutation is a different, incompatible schema.
pub const FEATURE_NAMES: &[&str] = &[
    "return_1",
    "return_5",
    "ma_short",
    "ma_long",
    "volatility",
    "volume_ratio",
    "price",
    "momentum",
];

/// Number of features per bar.
pub const FEATURE_COUNT: usize = 8;

/// A fixed-order feature row, one per bar. Index positions follow
/// [`FEATURE_NAMES`].
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Converts an ordered single-symbol bar sequence into one aligned
/// [`FeatureVector`] per bar.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    /// Short moving-average window (bars).
    pub short_window: usize,
    /// Long moving-average window (bars).
    pub long_window: usize,
    /// Window for volatility and average volume (bars).
    pub vol_window: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 50,
            vol_window: 20,
        }
    }
}

impl FeatureExtractor {
    /// Computes the full feature matrix for `bars`.
    ///
    /// Output length equals input length. All windows are expanding until
    /// they reach their nominal size. Cells that need unavailable history
    /// (lagged returns near the start of the series) are resolved by the
    /// fill pass afterwards; see [`fill_column`] for why the pass order
    /// matters.
    pub fn extract(&self, bars: &[PriceBar]) -> Vec<FeatureVector> {
        let n = bars.len();
        if n == 0 {
            return Vec::new();
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let mut columns: Vec<Vec<Option<f64>>> =
            vec![vec![None; n]; FEATURE_COUNT];

        for t in 0..n {
            columns[0][t] = lagged_return(&closes, t, 1);
            columns[1][t] = lagged_return(&closes, t, 5);
            columns[2][t] = Some(window_mean(&closes, t, self.short_window));
            columns[3][t] = Some(window_mean(&closes, t, self.long_window));
            columns[4][t] = window_std(&closes, t, self.vol_window);
            columns[5][t] = Some(volume_ratio(&volumes, t, self.vol_window));
            columns[6][t] = Some(closes[t]);
            // Momentum is the 5-bar price change rate. It coincides with
            // return_5 numerically but is a separate schema slot.
            columns[7][t] = lagged_return(&closes, t, 5);
        }

        for column in columns.iter_mut() {
            fill_column(column);
        }

        let mut rows = Vec::with_capacity(n);
        for t in 0..n {
            let mut row = [0.0; FEATURE_COUNT];
            for (i, column) in columns.iter().enumerate() {
                row[i] = column[t].unwrap_or(0.0);
            }
            rows.push(row);
        }
        rows
    }

    /// Computes the feature vector for the most recent bar.
    ///
    /// This runs the exact batch routine and takes the last row, so an
    /// online caller gets identical semantics to training-time extraction
    /// instead of hand-rolling its own indicator math.
    pub fn latest(&self, bars: &[PriceBar]) -> Option<FeatureVector> {
        self.extract(bars).pop()
    }
}

/// Return over `lag` bars: `close[t]/close[t-lag] - 1`.
/// Undefined when history is missing or the base close is zero.
fn lagged_return(closes: &[f64], t: usize, lag: usize) -> Option<f64> {
    if t < lag {
        return None;
    }
    let value = closes[t] / closes[t - lag] - 1.0;
    value.is_finite().then_some(value)
}

/// Mean of the trailing window ending at `t`, expanding while fewer than
/// `window` samples exist.
fn window_mean(values: &[f64], t: usize, window: usize) -> f64 {
    let start = (t + 1).saturating_sub(window);
    let slice = &values[start..=t];
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Sample standard deviation (n-1 denominator) of the trailing window.
/// Undefined with fewer than two samples.
fn window_std(values: &[f64], t: usize, window: usize) -> Option<f64> {
    let start = (t + 1).saturating_sub(window);
    let slice = &values[start..=t];
    if slice.len() < 2 {
        return None;
    }
    let mean = slice.iter().sum::<f64>() / slice.len() as f64;
    let variance = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (slice.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Current volume over trailing average volume, forced to 1.0 whenever the
/// average is zero or the ratio is not finite (first bar included).
fn volume_ratio(volumes: &[f64], t: usize, window: usize) -> f64 {
    let avg = window_mean(volumes, t, window);
    if avg <= 0.0 {
        return 1.0;
    }
    let ratio = volumes[t] / avg;
    if ratio.is_finite() { ratio } else { 1.0 }
}

/// Resolves undefined cells in two explicit, ordered passes: backward fill
/// first (nearest later defined value propagates toward the start), then
/// forward fill (nearest earlier defined value propagates toward the end).
///
/// The order is contractual. Leading rows of the training matrix take
/// their values from the first defined row, which only the
/// backward-then-forward order produces.
fn fill_column(column: &mut [Option<f64>]) {
    let mut next = None;
    for cell in column.iter_mut().rev() {
        match cell {
            Some(value) => next = Some(*value),
            None => *cell = next,
        }
    }
    let mut prev = None;
    for cell in column.iter_mut() {
        match cell {
            Some(value) => prev = Some(*value),
            None => *cell = prev,
        }
    }
}
