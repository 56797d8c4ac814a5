//! Training-data CSV input.
//!
//! Expected header: `timestamp,symbol,open,high,low,close,adj_close,volume,bid,ask`.

use crate::domain::bar::{self, PriceBar};
use crate::domain::errors::TrainingError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads all bars from `path` and sorts them ascending by timestamp.
pub fn load_bars(path: &Path) -> Result<Vec<PriceBar>, TrainingError> {
    let file = File::open(path).map_err(|source| TrainingError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let record: PriceBar = record?;
        bars.push(record);
    }
    bar::sort_by_timestamp(&mut bars);
    Ok(bars)
}
