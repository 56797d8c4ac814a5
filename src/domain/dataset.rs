//! Joins features to labels and produces the reproducible train/test split.

use crate::domain::errors::TrainingError;
use crate::domain::features::FeatureVector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::warn;

/// Below this many labeled samples a training run aborts outright.
pub const MIN_TRAINING_SAMPLES: usize = 100;

/// Below this many labeled samples the split is not stratified and a
/// warning is emitted instead.
pub const MIN_STRATIFY_SAMPLES: usize = 50;

/// Feature rows joined with their labels, unlabeled tail dropped.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<u8>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Train/test partition of a [`LabeledDataset`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Vec<FeatureVector>,
    pub y_train: Vec<u8>,
    pub x_test: Vec<FeatureVector>,
    pub y_test: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    /// Fraction of labeled samples held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the split shuffle; fixed for reproducibility.
    pub seed: u64,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl DatasetBuilder {
    /// Joins features to labels by row index and enforces the minimum
    /// viable sample count. Labels always cover a prefix of the feature
    /// matrix (the tail has no observed forward window), so the join is a
    /// truncation.
    pub fn build(
        &self,
        features: &[FeatureVector],
        labels: &[u8],
    ) -> Result<LabeledDataset, TrainingError> {
        let count = labels.len().min(features.len());
        if count < MIN_TRAINING_SAMPLES {
            return Err(TrainingError::InsufficientSamples {
                count,
                minimum: MIN_TRAINING_SAMPLES,
            });
        }
        Ok(LabeledDataset {
            features: features[..count].to_vec(),
            labels: labels[..count].to_vec(),
        })
    }

    /// Splits the dataset, stratifying by label when enough samples exist.
    pub fn split(&self, dataset: &LabeledDataset) -> TrainTestSplit {
        let n = dataset.len();
        let test_indices = if n >= MIN_STRATIFY_SAMPLES {
            self.stratified_test_indices(&dataset.labels)
        } else {
            warn!(
                samples = n,
                "too few samples for stratified split; results may be statistically unreliable"
            );
            self.plain_test_indices(n)
        };

        let mut in_test = vec![false; n];
        for &i in &test_indices {
            in_test[i] = true;
        }

        let mut split = TrainTestSplit {
            x_train: Vec::with_capacity(n - test_indices.len()),
            y_train: Vec::with_capacity(n - test_indices.len()),
            x_test: Vec::with_capacity(test_indices.len()),
            y_test: Vec::with_capacity(test_indices.len()),
        };
        for i in 0..n {
            if in_test[i] {
                split.x_test.push(dataset.features[i]);
                split.y_test.push(dataset.labels[i]);
            } else {
                split.x_train.push(dataset.features[i]);
                split.y_train.push(dataset.labels[i]);
            }
        }
        split
    }

    fn plain_test_indices(&self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        let test_count = self.test_count(n);
        indices.truncate(test_count);
        indices
    }

    /// Per-class shuffled allocation so both classes keep their base rate
    /// on each side of the split. Every class with members contributes at
    /// least one test row.
    fn stratified_test_indices(&self, labels: &[u8]) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut test_indices = Vec::new();
        for class in [0u8, 1u8] {
            let mut class_indices: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == class)
                .map(|(i, _)| i)
                .collect();
            if class_indices.is_empty() {
                continue;
            }
            class_indices.shuffle(&mut rng);
            let take = self.test_count(class_indices.len());
            test_indices.extend(class_indices.into_iter().take(take));
        }
        test_indices
    }

    fn test_count(&self, n: usize) -> usize {
        ((n as f64 * self.test_fraction).round() as usize).clamp(1, n.saturating_sub(1).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize, buy_every: usize) -> LabeledDataset {
        LabeledDataset {
            features: (0..n).map(|i| [i as f64; 8]).collect(),
            labels: (0..n).map(|i| u8::from(i % buy_every == 0)).collect(),
        }
    }

    #[test]
    fn test_build_rejects_below_minimum() {
        let builder = DatasetBuilder::default();
        let features: Vec<FeatureVector> = vec![[0.0; 8]; 85];
        let labels = vec![0u8; 80];
        let err = builder.build(&features, &labels).unwrap_err();
        assert!(matches!(
            err,
            TrainingError::InsufficientSamples { count: 80, minimum: MIN_TRAINING_SAMPLES }
        ));
    }

    #[test]
    fn test_build_truncates_to_labeled_prefix() {
        let builder = DatasetBuilder::default();
        let features: Vec<FeatureVector> = vec![[1.0; 8]; 120];
        let labels = vec![1u8; 110];
        let ds = builder.build(&features, &labels).unwrap();
        assert_eq!(ds.len(), 110);
        assert_eq!(ds.features.len(), 110);
    }

    #[test]
    fn test_split_is_reproducible() {
        let builder = DatasetBuilder::default();
        let ds = dataset(200, 3);
        let a = builder.split(&ds);
        let b = builder.split(&ds);
        assert_eq!(a.y_test, b.y_test);
        assert_eq!(a.x_test, b.x_test);
    }

    #[test]
    fn test_split_partitions_everything() {
        let builder = DatasetBuilder::default();
        let ds = dataset(150, 4);
        let split = builder.split(&ds);
        assert_eq!(split.y_train.len() + split.y_test.len(), 150);
        assert!(!split.y_test.is_empty());
        assert!(!split.y_train.is_empty());
    }

    #[test]
    fn test_stratified_split_keeps_both_classes_in_test() {
        let builder = DatasetBuilder::default();
        let ds = dataset(200, 10); // 20 buys, 180 sells
        let split = builder.split(&ds);
        assert!(split.y_test.contains(&0));
        assert!(split.y_test.contains(&1));
        // Roughly the base rate: 20% of each class.
        let buys_in_test = split.y_test.iter().filter(|&&l| l == 1).count();
        assert_eq!(buys_in_test, 4);
    }

    #[test]
    fn test_small_dataset_falls_back_to_plain_split() {
        let builder = DatasetBuilder::default();
        let ds = dataset(30, 3);
        let split = builder.split(&ds);
        assert_eq!(split.y_train.len() + split.y_test.len(), 30);
        assert_eq!(split.y_test.len(), 6);
    }
}
