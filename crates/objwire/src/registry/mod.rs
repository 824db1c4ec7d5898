// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoder registry and dispatch.
//!
//! An append-only table mapping a value category to the encoder
//! responsible for it. Resolution order: exact category match, then the
//! fixed structural capability checks in registration order, then failure
//! with [`CodecError::UnsupportedType`]. Registration happens during
//! codec assembly only; a built codec never mutates its registry, so
//! lookups are safe from any number of concurrent encode calls.

use crate::codec::Codec;
use crate::envelope::Envelope;
use crate::error::{CodecError, Result};
use crate::value::{TypeHandle, Value};
use std::collections::HashMap;

/// Encoder strategy for one value category.
pub type EncoderFn = fn(&Codec, &Value) -> Result<Envelope>;

/// Exactly matchable value categories.
///
/// Runtime-generated record types and their instances have no exact
/// category (each generated type is distinct); they are reached through
/// the capability checks, as are wire-export objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeTarget {
    None,
    Bool,
    Int,
    Float,
    Str,
    Complex,
    List,
    Tuple,
    Dict,
    Array,
    Dtype,
    Type,
    Callable,
}

impl EncodeTarget {
    /// Exact category of a value, if it has one.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(Self::None),
            Value::Bool(_) => Some(Self::Bool),
            Value::Int(_) => Some(Self::Int),
            Value::Float(_) => Some(Self::Float),
            Value::Str(_) => Some(Self::Str),
            Value::Complex { .. } => Some(Self::Complex),
            Value::List(_) => Some(Self::List),
            Value::Tuple(_) => Some(Self::Tuple),
            Value::Dict(_) => Some(Self::Dict),
            Value::Array(_) => Some(Self::Array),
            Value::Dtype(_) => Some(Self::Dtype),
            Value::Type(TypeHandle::Named { .. }) => Some(Self::Type),
            Value::Type(TypeHandle::Record(_)) => None,
            Value::Record(_) => None,
            Value::Callable(_) => Some(Self::Callable),
            Value::Exported(_) => None,
        }
    }
}

/// Fixed structural capability checks, consulted after exact dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A runtime-generated record type used as data.
    RecordType,
    /// An instance of a runtime-generated record type.
    RecordInstance,
    /// Object implementing the wire-export capability.
    WireExport,
}

impl Capability {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::RecordType => matches!(value, Value::Type(TypeHandle::Record(_))),
            Self::RecordInstance => matches!(value, Value::Record(_)),
            Self::WireExport => matches!(value, Value::Exported(_)),
        }
    }
}

/// The process-wide, write-once/read-many table of encoders.
#[derive(Default)]
pub struct Registry {
    exact: HashMap<EncodeTarget, EncoderFn>,
    capabilities: Vec<(Capability, EncoderFn)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate an exact value category with an encoder.
    pub fn register_encoder(&mut self, target: EncodeTarget, encoder: EncoderFn) {
        self.exact.insert(target, encoder);
    }

    /// Append a capability check with its encoder.
    pub fn register_capability(&mut self, capability: Capability, encoder: EncoderFn) {
        self.capabilities.push((capability, encoder));
    }

    /// Select the most specific registered encoder for a value.
    ///
    /// Pure function of the registry contents and the value's category;
    /// no I/O, no side effects.
    pub fn dispatch(&self, value: &Value) -> Result<EncoderFn> {
        if let Some(target) = EncodeTarget::of(value) {
            if let Some(encoder) = self.exact.get(&target) {
                return Ok(*encoder);
            }
        }
        for (capability, encoder) in &self.capabilities {
            if capability.matches(value) {
                log::debug!(
                    "[DISPATCH] {} handled via capability {:?}",
                    value.category(),
                    capability
                );
                return Ok(*encoder);
            }
        }
        Err(CodecError::UnsupportedType(value.category().to_string()))
    }
}
