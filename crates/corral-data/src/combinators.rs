// Dataset Combinators — compose, subset, concatenate datasets

use crate::dataset::{Dataset, Sample};

// SubsetDataset — view of selected indices

/// A dataset that exposes only the samples at the given indices.
///
/// This is useful for train/val/test splitting.
pub struct SubsetDataset<D: Dataset> {
    inner: D,
    indices: Vec<usize>,
}

impl<D: Dataset> SubsetDataset<D> {
    /// Create a subset of `inner` containing only the samples at `indices`.
    ///
    /// # Panics
    /// Panics (lazily, at `get` time) if any index is out of range.
    pub fn new(inner: D, indices: Vec<usize>) -> Self {
        Self { inner, indices }
    }
}

impl<D: Dataset> Dataset for SubsetDataset<D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Sample {
        self.inner.get(self.indices[index])
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ConcatDataset — concatenate multiple datasets

/// Concatenate two or more datasets end-to-end.
pub struct ConcatDataset {
    datasets: Vec<Box<dyn Dataset>>,
    cumulative_sizes: Vec<usize>,
}

impl ConcatDataset {
    /// Create a concatenation of the given datasets.
    pub fn new(datasets: Vec<Box<dyn Dataset>>) -> Self {
        let mut cumulative_sizes = Vec::with_capacity(datasets.len());
        let mut total = 0;
        for ds in &datasets {
            total += ds.len();
            cumulative_sizes.push(total);
        }

        Self {
            datasets,
            cumulative_sizes,
        }
    }

    /// Locate which dataset and local index a global index maps to.
    fn locate(&self, index: usize) -> (usize, usize) {
        for (ds_idx, &cum) in self.cumulative_sizes.iter().enumerate() {
            if index < cum {
                let offset = if ds_idx == 0 {
                    0
                } else {
                    self.cumulative_sizes[ds_idx - 1]
                };
                return (ds_idx, index - offset);
            }
        }
        panic!(
            "ConcatDataset: index {} out of range (total {})",
            index,
            self.cumulative_sizes.last().unwrap_or(&0)
        );
    }
}

impl Dataset for ConcatDataset {
    fn len(&self) -> usize {
        *self.cumulative_sizes.last().unwrap_or(&0)
    }

    fn get(&self, index: usize) -> Sample {
        let (ds_idx, local_idx) = self.locate(index);
        self.datasets[ds_idx].get(local_idx)
    }

    fn name(&self) -> &str {
        "concat"
    }
}

// VecDataset — in-memory dataset from prebuilt samples

/// A simple in-memory dataset backed by a `Vec<Sample>`.
///
/// Useful for building datasets programmatically and in tests.
pub struct VecDataset {
    samples: Vec<Sample>,
    dataset_name: String,
}

impl VecDataset {
    /// Create a VecDataset from a vector of samples.
    pub fn new(samples: Vec<Sample>, name: &str) -> Self {
        Self {
            samples,
            dataset_name: name.to_string(),
        }
    }
}

impl Dataset for VecDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Sample {
        self.samples[index].clone()
    }

    fn name(&self) -> &str {
        &self.dataset_name
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use corral_core::Array;

    /// Tiny helper dataset for testing.
    #[derive(Clone)]
    struct TinyDataset {
        n: usize,
    }

    impl Dataset for TinyDataset {
        fn len(&self) -> usize {
            self.n
        }
        fn get(&self, idx: usize) -> Sample {
            Sample::new(Array::vector(vec![idx as f64]), (idx % 3) as f64)
        }
    }

    #[test]
    fn subset_dataset() {
        let ds = TinyDataset { n: 10 };
        let sub = SubsetDataset::new(ds, vec![2, 5, 7]);
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.get(0).input.data()[0], 2.0);
        assert_eq!(sub.get(1).input.data()[0], 5.0);
        assert_eq!(sub.get(2).input.data()[0], 7.0);
    }

    #[test]
    fn concat_dataset() {
        let ds1 = TinyDataset { n: 5 };
        let ds2 = TinyDataset { n: 3 };
        let concat = ConcatDataset::new(vec![Box::new(ds1), Box::new(ds2)]);
        assert_eq!(concat.len(), 8);
        // First 5 come from ds1, next 3 from ds2
        assert_eq!(concat.get(0).input.data()[0], 0.0);
        assert_eq!(concat.get(4).input.data()[0], 4.0);
        assert_eq!(concat.get(5).input.data()[0], 0.0); // ds2 index 0
        assert_eq!(concat.get(7).input.data()[0], 2.0); // ds2 index 2
    }

    #[test]
    fn vec_dataset() {
        let samples = vec![
            Sample::new(Array::vector(vec![1.0, 2.0]), 0.0),
            Sample::new(Array::vector(vec![3.0, 4.0]), 1.0),
        ];
        let ds = VecDataset::new(samples, "test");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.name(), "test");
        assert_eq!(ds.get(1).input.data(), &[3.0, 4.0]);
        assert_eq!(ds.get(0).target.as_scalar(), Some(0.0));
    }
}
