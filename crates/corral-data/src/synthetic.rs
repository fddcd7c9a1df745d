// Synthetic datasets — seeded random collaborators for demos and tests
//
// Both datasets are generated eagerly from a seed, so `get` is cheap and
// two datasets built with the same parameters are identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use corral_core::{Array, Value};

use crate::dataset::{Dataset, Sample};

/// A synthetic image-classification dataset: fixed-shape random images with
/// scalar class labels.
pub struct ClassificationDataset {
    samples: Vec<Sample>,
}

impl ClassificationDataset {
    /// Generate `n` random images of the given shape, each labelled with a
    /// class index in `0..num_classes`.
    pub fn new(n: usize, image_shape: &[usize], num_classes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels: usize = image_shape.iter().product();

        let samples = (0..n)
            .map(|_| {
                let data: Vec<f64> = (0..pixels).map(|_| rng.gen::<f64>() * 255.0).collect();
                let image = Array::vector(data)
                    .reshape(image_shape)
                    .expect("pixel count derived from shape");
                let label = rng.gen_range(0..num_classes) as f64;
                Sample::new(image, label)
            })
            .collect();

        Self { samples }
    }
}

impl Dataset for ClassificationDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Sample {
        self.samples[index].clone()
    }

    fn name(&self) -> &str {
        "synthetic-classification"
    }
}

/// A synthetic object-detection dataset: fixed-shape random images whose
/// targets are maps `{"boxes": [k, 4], "labels": [k]}` with `k` varying per
/// sample in `1..=max_objects`.
///
/// This is the workload the default collation rule cannot batch: the box
/// tables have differing row counts across samples.
pub struct DetectionDataset {
    samples: Vec<Sample>,
}

impl DetectionDataset {
    /// Generate `n` random images with `1..=max_objects` boxes each.
    ///
    /// Boxes are `[x1, y1, x2, y2]` rows in normalized [0, 1] coordinates
    /// with `x1 < x2` and `y1 < y2`; labels are class indices in
    /// `0..num_classes`.
    pub fn new(
        n: usize,
        image_shape: &[usize],
        max_objects: usize,
        num_classes: usize,
        seed: u64,
    ) -> Self {
        assert!(max_objects >= 1, "DetectionDataset: need max_objects >= 1");
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels: usize = image_shape.iter().product();

        let samples = (0..n)
            .map(|_| {
                let data: Vec<f64> = (0..pixels).map(|_| rng.gen::<f64>() * 255.0).collect();
                let image = Array::vector(data)
                    .reshape(image_shape)
                    .expect("pixel count derived from shape");

                let k = rng.gen_range(1..=max_objects);
                let mut boxes = Vec::with_capacity(k * 4);
                let mut labels = Vec::with_capacity(k);
                for _ in 0..k {
                    let x1 = rng.gen::<f64>() * 0.5;
                    let y1 = rng.gen::<f64>() * 0.5;
                    let w = 0.05 + rng.gen::<f64>() * 0.45;
                    let h = 0.05 + rng.gen::<f64>() * 0.45;
                    boxes.extend_from_slice(&[x1, y1, x1 + w, y1 + h]);
                    labels.push(rng.gen_range(0..num_classes) as f64);
                }

                let target = Value::map([
                    (
                        "boxes",
                        Value::Array(
                            Array::from_vec(boxes, (k, 4)).expect("4 values pushed per box"),
                        ),
                    ),
                    ("labels", Value::Array(Array::vector(labels))),
                ]);
                Sample::new(image, target)
            })
            .collect();

        Self { samples }
    }
}

impl Dataset for DetectionDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Sample {
        self.samples[index].clone()
    }

    fn name(&self) -> &str {
        "synthetic-detection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_shapes() {
        let ds = ClassificationDataset::new(10, &[3, 8, 8], 5, 42);
        assert_eq!(ds.len(), 10);
        for i in 0..10 {
            let s = ds.get(i);
            assert_eq!(s.input.dims(), &[3, 8, 8]);
            let label = s.target.as_scalar().unwrap();
            assert!((0.0..5.0).contains(&label));
        }
    }

    #[test]
    fn test_detection_targets_vary() {
        let ds = DetectionDataset::new(20, &[3, 8, 8], 6, 4, 42);
        let mut counts = Vec::new();
        for i in 0..20 {
            let s = ds.get(i);
            let target = s.target.as_map().unwrap();
            let boxes = target["boxes"].as_array().unwrap();
            let labels = target["labels"].as_array().unwrap();
            let k = boxes.dims()[0];
            assert!((1..=6).contains(&k));
            assert_eq!(boxes.dims(), &[k, 4]);
            assert_eq!(labels.dims(), &[k]);
            counts.push(k);
        }
        // With 20 samples and k in 1..=6, the counts should not all agree
        assert!(counts.iter().any(|&k| k != counts[0]));
    }

    #[test]
    fn test_boxes_are_well_formed() {
        let ds = DetectionDataset::new(5, &[1, 4, 4], 3, 2, 7);
        for i in 0..5 {
            let s = ds.get(i);
            let boxes = s.target.as_map().unwrap()["boxes"].as_array().unwrap();
            for row in boxes.data().chunks(4) {
                let (x1, y1, x2, y2) = (row[0], row[1], row[2], row[3]);
                assert!(x1 < x2 && y1 < y2);
                assert!(x2 <= 1.0 && y2 <= 1.0);
            }
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = DetectionDataset::new(8, &[1, 4, 4], 4, 3, 123);
        let b = DetectionDataset::new(8, &[1, 4, 4], 4, 3, 123);
        for i in 0..8 {
            assert_eq!(a.get(i), b.get(i));
        }
    }
}
