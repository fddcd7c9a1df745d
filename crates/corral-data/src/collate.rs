// Collation — combining per-sample values into batched structures
//
// The default rule dispatches on the variant tag of the FIRST batch element
// and stacks recursively:
//   scalars → one 1-D array          tuples → tuple of stacked fields
//   arrays  → one stacked array      maps   → ONE map of stacked fields
//
// The map rule is the classic footgun: a batch of per-sample maps does not
// collate to a list of maps, it is merged into a single map whose values are
// stacked across the batch. For detection-style targets, where each map
// holds a different number of boxes, that stack has no legal shape and the
// default rule fails. DetectionCollate branches before reaching it.

use std::collections::BTreeMap;

use tracing::trace;

use corral_core::{Array, Error, Kind, Result, Value};

use crate::dataset::Sample;

// Collated batch representation

/// Inputs of a collated batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchInputs {
    /// One array of shape `[n, ...input shape]`.
    Stacked(Array),
    /// One array per sample, in sample order.
    PerSample(Vec<Array>),
}

impl BatchInputs {
    /// Number of samples represented.
    pub fn len(&self) -> usize {
        match self {
            BatchInputs::Stacked(a) => a.dims().first().copied().unwrap_or(0),
            BatchInputs::PerSample(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_stacked(&self) -> Option<&Array> {
        match self {
            BatchInputs::Stacked(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_per_sample(&self) -> Option<&[Array]> {
        match self {
            BatchInputs::PerSample(items) => Some(items),
            _ => None,
        }
    }
}

/// Targets of a collated batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchTargets {
    /// Targets merged into a single collated value (the default rule).
    Collated(Value),
    /// The original per-sample targets, untouched and in sample order.
    PerSample(Vec<Value>),
}

impl BatchTargets {
    pub fn as_collated(&self) -> Option<&Value> {
        match self {
            BatchTargets::Collated(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_per_sample(&self) -> Option<&[Value]> {
        match self {
            BatchTargets::PerSample(items) => Some(items),
            _ => None,
        }
    }
}

/// A collated batch, ready for a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: BatchInputs,
    pub targets: BatchTargets,
}

impl Batch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

// Default resolver

/// Collate a batch of values with the default type-directed rule.
///
/// Dispatches on the variant of the first element; all elements must carry
/// the same variant ([`Error::KindMismatch`] otherwise). An empty batch is
/// not collatable ([`Error::EmptyBatch`]).
pub fn collate_values(values: Vec<Value>) -> Result<Value> {
    let kind = match values.first() {
        Some(v) => v.kind(),
        None => return Err(Error::EmptyBatch),
    };
    trace!(kind = kind.name(), n = values.len(), "collating values");
    match kind {
        Kind::Scalar => collate_scalars(values),
        Kind::Array => collate_arrays(values),
        Kind::Seq => collate_seqs(values),
        Kind::Map => collate_maps(values),
    }
}

/// Scalars collate to a single 1-D array of the values, order-preserving.
fn collate_scalars(values: Vec<Value>) -> Result<Value> {
    let mut data = Vec::with_capacity(values.len());
    for v in &values {
        match v {
            Value::Scalar(s) => data.push(*s),
            other => {
                return Err(Error::KindMismatch {
                    expected: Kind::Scalar,
                    got: other.kind(),
                })
            }
        }
    }
    Ok(Value::Array(Array::vector(data)))
}

/// Arrays collate by stacking along a new leading batch dimension.
fn collate_arrays(values: Vec<Value>) -> Result<Value> {
    let mut items = Vec::with_capacity(values.len());
    for v in values {
        match v {
            Value::Array(a) => items.push(a),
            other => {
                return Err(Error::KindMismatch {
                    expected: Kind::Array,
                    got: other.kind(),
                })
            }
        }
    }
    Ok(Value::Array(Array::stack(&items)?))
}

/// Sequences collate position by position: the i-th element of the result
/// is the collation of the i-th elements across the batch.
fn collate_seqs(values: Vec<Value>) -> Result<Value> {
    let arity = match values.first() {
        Some(Value::Seq(fields)) => fields.len(),
        Some(other) => {
            return Err(Error::KindMismatch {
                expected: Kind::Seq,
                got: other.kind(),
            })
        }
        None => return Err(Error::EmptyBatch),
    };

    let mut columns: Vec<Vec<Value>> = (0..arity)
        .map(|_| Vec::with_capacity(values.len()))
        .collect();
    for v in values {
        match v {
            Value::Seq(fields) => {
                if fields.len() != arity {
                    return Err(Error::ArityMismatch {
                        expected: arity,
                        got: fields.len(),
                    });
                }
                for (column, field) in columns.iter_mut().zip(fields) {
                    column.push(field);
                }
            }
            other => {
                return Err(Error::KindMismatch {
                    expected: Kind::Seq,
                    got: other.kind(),
                })
            }
        }
    }

    let fields = columns
        .into_iter()
        .map(collate_values)
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Seq(fields))
}

/// Maps merge into ONE map: each key's value is the collation of that key's
/// values across the batch. All maps must carry the same key set.
fn collate_maps(values: Vec<Value>) -> Result<Value> {
    let keys: Vec<String> = match values.first() {
        Some(Value::Map(m)) => m.keys().cloned().collect(),
        Some(other) => {
            return Err(Error::KindMismatch {
                expected: Kind::Map,
                got: other.kind(),
            })
        }
        None => return Err(Error::EmptyBatch),
    };

    let mut columns: BTreeMap<String, Vec<Value>> = keys
        .iter()
        .map(|k| (k.clone(), Vec::with_capacity(values.len())))
        .collect();
    for v in values {
        match v {
            Value::Map(m) => {
                if !m.keys().eq(keys.iter()) {
                    return Err(Error::KeyMismatch {
                        expected: keys.join(", "),
                        got: m.keys().cloned().collect::<Vec<_>>().join(", "),
                    });
                }
                for (key, field) in m {
                    columns
                        .get_mut(&key)
                        .expect("key set checked above")
                        .push(field);
                }
            }
            other => {
                return Err(Error::KindMismatch {
                    expected: Kind::Map,
                    got: other.kind(),
                })
            }
        }
    }

    let mut merged = BTreeMap::new();
    for (key, column) in columns {
        merged.insert(key, collate_values(column)?);
    }
    Ok(Value::Map(merged))
}

// Collate strategies

/// Strategy for combining a drawn batch of samples into a [`Batch`].
///
/// This is the seam the loader is parameterized by, so callers can swap the
/// default rule for a custom one where the default breaks down.
pub trait Collate: Send + Sync {
    fn collate(&self, samples: Vec<Sample>) -> Result<Batch>;
}

/// The default collation rule.
///
/// Inputs are stacked into a single `[n, ...input shape]` array; targets go
/// through [`collate_values`]. For scalar labels this yields a 1-D target
/// array. For map targets it yields one merged map of stacked fields — and
/// fails with [`Error::ShapeMismatch`] as soon as a field's length varies
/// across samples, which is exactly the detection-target situation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCollate;

impl Collate for DefaultCollate {
    fn collate(&self, samples: Vec<Sample>) -> Result<Batch> {
        let (inputs, targets): (Vec<_>, Vec<_>) = samples
            .into_iter()
            .map(|s| (s.input, s.target))
            .unzip();
        let inputs = Array::stack(&inputs)?;
        let targets = collate_values(targets)?;
        Ok(Batch {
            inputs: BatchInputs::Stacked(inputs),
            targets: BatchTargets::Collated(targets),
        })
    }
}

/// Collation override for variable-size structured targets.
///
/// When the first sample's target is a map, the per-sample maps are kept as
/// a plain list (order-preserving, untouched) instead of being merged; the
/// inputs are stacked when every input shares the first input's shape and
/// kept as a list otherwise. Any other target variant is handed to
/// [`DefaultCollate`] unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionCollate;

impl Collate for DetectionCollate {
    fn collate(&self, samples: Vec<Sample>) -> Result<Batch> {
        let first_is_map = match samples.first() {
            Some(sample) => sample.target.kind() == Kind::Map,
            None => return Err(Error::EmptyBatch),
        };
        if !first_is_map {
            return DefaultCollate.collate(samples);
        }

        let (inputs, targets): (Vec<_>, Vec<_>) = samples
            .into_iter()
            .map(|s| (s.input, s.target))
            .unzip();

        let uniform = inputs.iter().all(|a| a.shape() == inputs[0].shape());
        trace!(
            n = inputs.len(),
            uniform_inputs = uniform,
            "detection collate: targets left per-sample"
        );
        let inputs = if uniform {
            BatchInputs::Stacked(Array::stack(&inputs)?)
        } else {
            BatchInputs::PerSample(inputs)
        };

        Ok(Batch {
            inputs,
            targets: BatchTargets::PerSample(targets),
        })
    }
}
