// Transform — per-sample preprocessing applied before collation

use corral_core::{Array, Value};

use crate::dataset::Sample;

/// A transform applied to each sample before batching.
pub trait Transform: Send + Sync {
    /// Apply the transform to a sample, returning the modified sample.
    fn apply(&self, sample: Sample) -> Sample;
}

// Built-in transforms

/// Normalize input values to [0, 1] by dividing by a given scale factor.
///
/// Commonly used for image pixels: `Normalize::new(255.0)`.
#[derive(Debug, Clone)]
pub struct Normalize {
    scale: f64,
}

impl Normalize {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Transform for Normalize {
    fn apply(&self, mut sample: Sample) -> Sample {
        for v in sample.input.data_mut() {
            *v /= self.scale;
        }
        sample
    }
}

/// Standardize input values to zero mean and unit variance.
#[derive(Debug, Clone)]
pub struct Standardize {
    pub mean: f64,
    pub std: f64,
}

impl Standardize {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

impl Transform for Standardize {
    fn apply(&self, mut sample: Sample) -> Sample {
        for v in sample.input.data_mut() {
            *v = (*v - self.mean) / self.std;
        }
        sample
    }
}

/// One-hot encode a scalar target into an array of size `num_classes`.
///
/// Targets that are not scalars (array, seq, map) pass through unchanged.
#[derive(Debug, Clone)]
pub struct OneHotEncode {
    pub num_classes: usize,
}

impl OneHotEncode {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

impl Transform for OneHotEncode {
    fn apply(&self, mut sample: Sample) -> Sample {
        if let Value::Scalar(label) = sample.target {
            let class_idx = label as usize;
            let mut one_hot = vec![0.0; self.num_classes];
            if class_idx < self.num_classes {
                one_hot[class_idx] = 1.0;
            }
            sample.target = Value::Array(Array::vector(one_hot));
        }
        sample
    }
}

/// Chain multiple transforms.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for Compose {
    fn apply(&self, mut sample: Sample) -> Sample {
        for t in &self.transforms {
            sample = t.apply(sample);
        }
        sample
    }
}

/// Reshape the input array to a different shape (without changing data).
///
/// Useful for converting flat images `[784]` to channel-first `[1, 28, 28]`.
///
/// # Panics
/// Panics at `apply` time if the element counts differ.
#[derive(Debug, Clone)]
pub struct ReshapeInput {
    pub new_shape: Vec<usize>,
}

impl ReshapeInput {
    pub fn new(new_shape: Vec<usize>) -> Self {
        Self { new_shape }
    }
}

impl Transform for ReshapeInput {
    fn apply(&self, mut sample: Sample) -> Sample {
        let old_count = sample.input.elem_count();
        let new_count: usize = self.new_shape.iter().product();
        assert_eq!(
            old_count, new_count,
            "ReshapeInput: input shape {:?} ({}) != new shape {:?} ({})",
            sample.input.dims(),
            old_count,
            self.new_shape,
            new_count,
        );
        sample.input = sample
            .input
            .reshape(self.new_shape.clone())
            .expect("element count checked above");
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(features: Vec<f64>, label: f64) -> Sample {
        Sample::new(Array::vector(features), label)
    }

    #[test]
    fn test_normalize() {
        let t = Normalize::new(255.0);
        let out = t.apply(sample(vec![0.0, 127.5, 255.0], 5.0));
        assert!((out.input.data()[0] - 0.0).abs() < 1e-9);
        assert!((out.input.data()[1] - 0.5).abs() < 1e-9);
        assert!((out.input.data()[2] - 1.0).abs() < 1e-9);
        // target unchanged
        assert_eq!(out.target.as_scalar(), Some(5.0));
    }

    #[test]
    fn test_standardize() {
        let t = Standardize::new(100.0, 50.0);
        let out = t.apply(sample(vec![100.0, 150.0, 50.0], 0.0));
        assert!((out.input.data()[0] - 0.0).abs() < 1e-9);
        assert!((out.input.data()[1] - 1.0).abs() < 1e-9);
        assert!((out.input.data()[2] - -1.0).abs() < 1e-9);
    }

    #[test]
    fn test_onehot_encode() {
        let t = OneHotEncode::new(10);
        let out = t.apply(sample(vec![1.0, 2.0], 3.0));
        let target = out.target.as_array().unwrap();
        assert_eq!(target.dims(), &[10]);
        assert_eq!(target.data()[3], 1.0);
        assert_eq!(target.data()[0], 0.0);
        // input unchanged
        assert_eq!(out.input.data(), &[1.0, 2.0]);
    }

    #[test]
    fn test_onehot_leaves_map_targets_alone() {
        let t = OneHotEncode::new(10);
        let target = Value::map([("labels", Value::Scalar(1.0))]);
        let s = Sample::new(Array::vector(vec![1.0]), target.clone());
        let out = t.apply(s);
        assert_eq!(out.target, target);
    }

    #[test]
    fn test_compose() {
        let t = Compose::new(vec![
            Box::new(Normalize::new(255.0)),
            Box::new(OneHotEncode::new(5)),
        ]);
        let out = t.apply(sample(vec![255.0, 0.0], 2.0));
        assert!((out.input.data()[0] - 1.0).abs() < 1e-9);
        let target = out.target.as_array().unwrap();
        assert_eq!(target.dims(), &[5]);
        assert_eq!(target.data()[2], 1.0);
    }

    #[test]
    fn test_reshape_input() {
        let t = ReshapeInput::new(vec![1, 2, 2]);
        let out = t.apply(sample(vec![1.0, 2.0, 3.0, 4.0], 0.0));
        assert_eq!(out.input.dims(), &[1, 2, 2]);
    }
}
