//! Offline training run: CSV bars in, model artifact out.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::prelude::*;
use trademl::application::forest::ForestParams;
use trademl::application::trainer::{self, TrainerConfig};
use trademl::domain::dataset::DatasetBuilder;
use trademl::domain::labels::LabelGenerator;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to training data CSV
    #[arg(long, default_value = "data/bars.csv")]
    input: PathBuf,

    /// Path to output model file
    #[arg(long, default_value = "data/model.json")]
    output: PathBuf,

    /// Forward horizon in bars for labeling
    #[arg(long, default_value_t = 5)]
    horizon: usize,

    /// Minimum forward return for a buy label
    #[arg(long, default_value_t = 0.01)]
    threshold: f64,

    /// Fraction of labeled samples held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum depth of trees
    #[arg(long, default_value_t = 10)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 20)]
    min_split: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let config = TrainerConfig {
        input: args.input,
        output: args.output,
        labeler: LabelGenerator {
            horizon: args.horizon,
            threshold: args.threshold,
        },
        dataset: DatasetBuilder {
            test_fraction: args.test_fraction,
            seed: args.seed,
        },
        forest: ForestParams {
            n_trees: args.n_trees,
            max_depth: args.max_depth,
            min_samples_split: args.min_split,
        },
    };

    let report = trainer::run(&config)?;

    println!("Training complete.");
    println!("  Samples:       {}", report.samples);
    println!("  Train/Test:    {}/{}", report.train_size, report.test_size);
    println!("  Buy fraction:  {:.1}%", report.buy_fraction * 100.0);
    if let Some(accuracy) = report.accuracy {
        println!("  Accuracy:      {:.4}", accuracy);
    }
    println!("  Artifact:      {}", report.model_version);
    Ok(())
}
