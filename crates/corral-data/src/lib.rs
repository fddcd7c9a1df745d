//! # corral-data
//!
//! Datasets, batching, and collation for Corral.
//!
//! This crate provides:
//! - [`Dataset`] trait — unified interface for any sample source
//! - [`collate_values`] — the default type-directed collation rule
//! - [`DefaultCollate`] / [`DetectionCollate`] — batch collation strategies
//! - [`DataLoader`] — synchronous batching and iteration over a Dataset
//! - Per-sample transforms — Normalize, Standardize, OneHotEncode, ...
//! - Dataset combinators — SubsetDataset, ConcatDataset, VecDataset
//! - Synthetic datasets — seeded classification and detection collaborators
//!
//! The one piece of real logic lives in [`collate`]: the default rule merges
//! a batch of map-valued targets into a single map of stacked arrays, which
//! fails when per-sample field lengths differ (detection targets).
//! [`DetectionCollate`] branches on the target variant before that rule can
//! be reached and keeps the per-sample maps as a plain list instead.

pub mod collate;
pub mod combinators;
pub mod dataset;
pub mod loader;
pub mod synthetic;
pub mod transform;

pub use collate::{
    collate_values, Batch, BatchInputs, BatchTargets, Collate, DefaultCollate, DetectionCollate,
};
pub use combinators::{ConcatDataset, SubsetDataset, VecDataset};
pub use dataset::{Dataset, Sample};
pub use loader::{BatchIterator, DataLoader, DataLoaderConfig};
pub use synthetic::{ClassificationDataset, DetectionDataset};
pub use transform::{Compose, Normalize, OneHotEncode, ReshapeInput, Standardize, Transform};
