// DataLoader — batching and iteration
//
// Deliberately synchronous and single-threaded: it draws index ranges in
// order, fetches samples, applies transforms, and hands the batch to the
// configured Collate strategy.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use tracing::debug;

use corral_core::Result;

use crate::collate::{Batch, Collate};
use crate::dataset::{Dataset, Sample};
use crate::transform::Transform;

/// Configuration for the DataLoader.
#[derive(Debug, Clone)]
pub struct DataLoaderConfig {
    /// Number of samples per batch.
    pub batch_size: usize,
    /// Whether to shuffle indices each epoch. Off by default: batch order
    /// then follows dataset index order.
    pub shuffle: bool,
    /// Whether to drop the last incomplete batch.
    pub drop_last: bool,
    /// Optional random seed for reproducible shuffling.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn drop_last(mut self, d: bool) -> Self {
        self.drop_last = d;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
}

/// A DataLoader wraps a Dataset and produces collated batches.
///
/// The collation strategy is a type parameter: [`DefaultCollate`] for the
/// library rule, [`DetectionCollate`] for variable-size map targets, or any
/// user type implementing [`Collate`].
///
/// [`DefaultCollate`]: crate::collate::DefaultCollate
/// [`DetectionCollate`]: crate::collate::DetectionCollate
pub struct DataLoader<'a, C: Collate> {
    dataset: &'a dyn Dataset,
    collate: C,
    config: DataLoaderConfig,
    transforms: Vec<Box<dyn Transform>>,
    indices: Vec<usize>,
}

impl<'a, C: Collate> DataLoader<'a, C> {
    /// Create a new DataLoader over a dataset with the given collation
    /// strategy.
    pub fn new(dataset: &'a dyn Dataset, collate: C, config: DataLoaderConfig) -> Self {
        assert!(
            config.batch_size > 0,
            "DataLoader: batch_size must be at least 1"
        );
        let indices: Vec<usize> = (0..dataset.len()).collect();
        Self {
            dataset,
            collate,
            config,
            transforms: Vec::new(),
            indices,
        }
    }

    /// Add a transform to apply to each sample before collation.
    pub fn with_transform(mut self, t: Box<dyn Transform>) -> Self {
        self.transforms.push(t);
        self
    }

    /// The number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        if self.config.drop_last {
            self.dataset.len() / self.config.batch_size
        } else {
            self.dataset.len().div_ceil(self.config.batch_size)
        }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Reshuffle indices (call at the start of each epoch).
    pub fn reshuffle(&mut self) {
        if self.config.shuffle {
            match self.config.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    self.indices.shuffle(&mut rng);
                }
                None => {
                    let mut rng = thread_rng();
                    self.indices.shuffle(&mut rng);
                }
            }
        }
    }

    /// Fetch and transform a slice of samples.
    fn fetch_samples(&self, indices: &[usize]) -> Vec<Sample> {
        indices
            .iter()
            .map(|&i| {
                let mut s = self.dataset.get(i);
                for t in &self.transforms {
                    s = t.apply(s);
                }
                s
            })
            .collect()
    }

    /// Iterate over batches one at a time.
    ///
    /// Reshuffles first (when configured), then yields `Result<Batch>` —
    /// one per batch, in index order.
    pub fn iter_batches(&mut self) -> BatchIterator<'_, 'a, C> {
        self.reshuffle();
        BatchIterator {
            loader: self,
            batch_idx: 0,
        }
    }

    /// Produce all batches for one epoch.
    pub fn epoch_batches(&mut self) -> Result<Vec<Batch>> {
        self.iter_batches().collect()
    }
}

/// Iterator that yields one collated batch at a time.
pub struct BatchIterator<'l, 'a, C: Collate> {
    loader: &'l DataLoader<'a, C>,
    batch_idx: usize,
}

impl<'l, 'a, C: Collate> Iterator for BatchIterator<'l, 'a, C> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        let bs = self.loader.config.batch_size;
        let n = self.loader.dataset.len();
        let start = self.batch_idx * bs;

        if start >= n {
            return None;
        }

        if self.loader.config.drop_last && start + bs > n {
            return None;
        }

        let end = (start + bs).min(n);
        self.batch_idx += 1;

        let batch_indices = &self.loader.indices[start..end];
        let samples = self.loader.fetch_samples(batch_indices);
        debug!(
            dataset = self.loader.dataset.name(),
            batch = self.batch_idx - 1,
            size = samples.len(),
            "assembling batch"
        );

        Some(self.loader.collate.collate(samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.loader.num_batches().saturating_sub(self.batch_idx);
        (remaining, Some(remaining))
    }
}

impl<'l, 'a, C: Collate> ExactSizeIterator for BatchIterator<'l, 'a, C> {}
