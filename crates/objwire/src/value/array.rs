// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric array values with explicit dtype and shape.

use crate::value::Value;

/// Scalar element kinds understood by the array codec.
///
/// Codes follow the remote kernel's dtype spelling so symbol references
/// round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int64,
    Float64,
    Complex128,
    Str,
}

impl ScalarKind {
    /// Wire spelling of the dtype code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Complex128 => "complex128",
            Self::Str => "str",
        }
    }

    /// Parse a wire dtype code.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "bool" => Some(Self::Bool),
            "int64" => Some(Self::Int64),
            "float64" => Some(Self::Float64),
            "complex128" => Some(Self::Complex128),
            "str" => Some(Self::Str),
            _ => None,
        }
    }
}

/// Element-type descriptor. Field dtypes nest, so record layouts can
/// contain record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DType {
    Scalar(ScalarKind),
    Record { fields: Vec<(String, DType)> },
}

impl DType {
    /// Field names for a record layout, empty for scalars.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Scalar(_) => Vec::new(),
            Self::Record { fields } => fields.iter().map(|(n, _)| n.as_str()).collect(),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }
}

/// Final view applied to a record array: a plain record array or the
/// named-tuple-like view selected by the `recarray` subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayView {
    Plain,
    Records,
}

/// An n-dimensional array: flat row-major data plus shape.
///
/// `data.len()` always equals the product of `shape`. For record dtypes
/// each element is a tuple of field values; `mask`, when present, marks
/// invalid elements and has the same length as `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub data: Vec<Value>,
    pub mask: Option<Vec<bool>>,
    pub view: ArrayView,
}

impl NdArray {
    /// Create a plain array. Returns `None` when `data` does not fill `shape`.
    pub fn new(dtype: DType, shape: Vec<usize>, data: Vec<Value>) -> Option<Self> {
        if element_count(&shape) != data.len() {
            return None;
        }
        Some(Self {
            dtype,
            shape,
            data,
            mask: None,
            view: ArrayView::Plain,
        })
    }

    /// Attach a validity mask. Returns `None` on length mismatch.
    pub fn with_mask(mut self, mask: Vec<bool>) -> Option<Self> {
        if mask.len() != self.data.len() {
            return None;
        }
        self.mask = Some(mask);
        Some(self)
    }

    pub fn with_view(mut self, view: ArrayView) -> Self {
        self.view = view;
        self
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Product of the shape extents (1 for a zero-dimensional array).
fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}
