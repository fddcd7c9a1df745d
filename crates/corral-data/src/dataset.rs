// Dataset trait — unified interface for any sample source

use corral_core::{Array, Value};

/// A single sample: an input paired with its annotation.
///
/// The input is a fixed-shape numeric array (e.g. a `[3, H, W]` image).
/// The target is a [`Value`]: a scalar class label, an array, or a map of
/// named fields such as `{"boxes": [k, 4], "labels": [k]}` where `k` varies
/// from sample to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Input array.
    pub input: Array,
    /// Annotation paired with the input.
    pub target: Value,
}

impl Sample {
    /// Create a sample from an input and anything convertible to a [`Value`].
    pub fn new(input: Array, target: impl Into<Value>) -> Self {
        Self {
            input,
            target: target.into(),
        }
    }
}

/// A dataset is an indexed collection of samples.
///
/// This is the full input contract of the loader: a length and indexed
/// access. Implementations must be `Send + Sync` so datasets can be shared.
pub trait Dataset: Send + Sync {
    /// Total number of samples in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the sample at position `index`.
    ///
    /// # Panics
    /// May panic if `index >= self.len()`.
    fn get(&self, index: usize) -> Sample;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}
