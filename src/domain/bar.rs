use serde::{Deserialize, Serialize};

/// A single OHLCV observation for one symbol at one timestamp.
///
/// Field order matches the training CSV header:
/// `timestamp,symbol,open,high,low,close,adj_close,volume,bid,ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: i64,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
    pub bid: f64,
    pub ask: f64,
}

/// Sorts bars strictly ascending by timestamp. Every pipeline stage
/// assumes this ordering; it is applied once at load time.
pub fn sort_by_timestamp(bars: &mut [PriceBar]) {
    bars.sort_by_key(|b| b.timestamp);
}
