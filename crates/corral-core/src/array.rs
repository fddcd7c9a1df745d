use crate::shape::Shape;
use crate::{Error, Result};

// Array — dense numeric storage
//
// Inputs and annotation fields are stored as flat row-major f64 data plus a
// Shape. That is all collation needs: stacking a batch of equal-shaped
// arrays is a concatenation of their storage under a new leading dimension.

/// A dense row-major array of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: Vec<f64>,
    shape: Shape,
}

impl Array {
    /// Create an array from flat data and a shape.
    ///
    /// Fails with [`Error::ElementCountMismatch`] if `data.len()` doesn't
    /// equal the shape's element count.
    pub fn from_vec(data: Vec<f64>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
                shape,
            });
        }
        Ok(Self { data, shape })
    }

    /// Create a 1-D array from the given values. Never fails: the shape is
    /// derived from the data length.
    pub fn vector(data: Vec<f64>) -> Self {
        let shape = Shape::from(data.len());
        Self { data, shape }
    }

    /// Create a rank-0 (scalar) array.
    pub fn scalar(v: f64) -> Self {
        Self {
            data: vec![v],
            shape: Shape::from(()),
        }
    }

    /// Create an array of zeros with the given shape.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Self {
            data: vec![0.0; shape.elem_count()],
            shape,
        }
    }

    /// The flat row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the flat data (the shape cannot change through this).
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// The array's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Reinterpret the data under a new shape with the same element count.
    pub fn reshape(self, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if self.data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: self.data.len(),
                shape,
            });
        }
        Ok(Self {
            data: self.data,
            shape,
        })
    }

    /// Stack arrays along a new leading batch dimension.
    ///
    /// All items must share an identical shape; the result has shape
    /// `[n, ...item shape]` with item order preserved. This is the
    /// fundamental batching operation — and the one that fails when
    /// per-sample shapes vary (e.g. box tables with differing row counts).
    pub fn stack(items: &[Array]) -> Result<Array> {
        let first = items.first().ok_or(Error::EmptyBatch)?;
        let item_shape = first.shape.clone();
        let mut data = Vec::with_capacity(items.len() * item_shape.elem_count());
        for item in items {
            if item.shape != item_shape {
                return Err(Error::ShapeMismatch {
                    expected: item_shape,
                    got: item.shape.clone(),
                });
            }
            data.extend_from_slice(&item.data);
        }
        Ok(Array {
            data,
            shape: item_shape.batched(items.len()),
        })
    }
}
