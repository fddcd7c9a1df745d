use crate::shape::Shape;
use crate::value::Kind;

/// All errors that can occur within Corral.
///
/// Collation has essentially one interesting failure mode — trying to stack
/// arrays whose shapes disagree — plus a handful of structural mismatches
/// (heterogeneous batches, diverging map keys, diverging tuple arities).
/// Using a single error type across the workspace simplifies propagation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Shape mismatch while stacking (e.g. a [3,4] box table next to [5,4]).
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Element count mismatch when creating an array from a vec.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Dimension index out of range for the array's rank.
    #[error("dimension out of range: dim {dim} for array with {rank} dimensions")]
    DimOutOfRange { dim: usize, rank: usize },

    /// A batch mixes annotation variants (e.g. scalars next to maps).
    #[error("cannot collate a mixed batch: expected {expected}, got {got}")]
    KindMismatch { expected: Kind, got: Kind },

    /// Map-valued annotations in one batch carry different key sets.
    #[error("map key mismatch: expected [{expected}], got [{got}]")]
    KeyMismatch { expected: String, got: String },

    /// Sequence-valued annotations in one batch have different lengths.
    #[error("sequence arity mismatch: expected {expected} elements, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Collation needs at least one sample to inspect.
    #[error("cannot collate an empty batch")]
    EmptyBatch,
}

/// Convenience Result type used throughout Corral.
pub type Result<T> = std::result::Result<T, Error>;
