// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime value model.
//!
//! A closed enumeration of every value category the codec can carry:
//! scalars, containers, numeric arrays with explicit dtype/shape, runtime
//! record types and their instances, and references to types and callables
//! themselves. Objects outside these categories participate through the
//! [`WireExport`] capability trait.
//!
//! Values own their children by value. The tree shape is what makes cyclic
//! object graphs inexpressible (an explicit non-goal).

mod array;
mod export;
mod record;

pub use array::{ArrayView, DType, NdArray, ScalarKind};
pub use export::{ExportedValue, WireExport};
pub use record::{RecordType, RecordValue};

use std::collections::BTreeMap;
use std::sync::Arc;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Complex { re: f64, im: f64 },
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Array(NdArray),
    /// Instance of a runtime-generated record type.
    Record(RecordValue),
    /// Element-type descriptor (scalar kind or named/typed fields).
    Dtype(DType),
    /// A type used as data, not instantiated.
    Type(TypeHandle),
    /// A free function or bound method used as data.
    Callable(CallableHandle),
    /// Object carrying its own wire description (capability dispatch).
    Exported(ExportedValue),
}

impl Value {
    /// Check if value is none.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64 (integers widen).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the element slice of a list or tuple.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) | Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// Short label for error messages ("int", "ndarray", ...).
    pub fn category(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Complex { .. } => "complex",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
            Self::Array(_) => "ndarray",
            Self::Record(_) => "record",
            Self::Dtype(_) => "dtype",
            Self::Type(_) => "type",
            Self::Callable(_) => "callable",
            Self::Exported(_) => "exported",
        }
    }
}

/// A type as a value.
///
/// `Named` types are resolvable through the symbol table; `Record` types
/// only exist as products of a type factory (runtime-generated record
/// types) and carry their own definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeHandle {
    Named { name: String, module: String },
    Record(Arc<RecordType>),
}

impl TypeHandle {
    pub fn named(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            module: module.into(),
        }
    }

    /// Qualified name of the type.
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::Record(rt) => &rt.name,
        }
    }

    /// Module path the type is recorded under.
    pub fn module(&self) -> &str {
        match self {
            Self::Named { module, .. } => module,
            Self::Record(rt) => &rt.module,
        }
    }
}

/// A callable (free function or bound method) as a value.
///
/// `owner` is recorded for bound methods so the decoder can verify the
/// resolved method still belongs to the expected type.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableHandle {
    pub name: String,
    pub module: String,
    pub owner: Option<TypeHandle>,
}

impl CallableHandle {
    pub fn function(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            owner: None,
        }
    }

    pub fn method(
        name: impl Into<String>,
        module: impl Into<String>,
        owner: TypeHandle,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            owner: Some(owner),
        }
    }
}
