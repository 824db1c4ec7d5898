// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime-generated record types and their instances.

use crate::value::Value;
use std::sync::Arc;

/// A record type synthesized at runtime from a name plus a field list.
///
/// These types do not exist until constructed by a type factory, so the
/// recorded `module` may be unresolvable; the wire envelope carries the
/// factory descriptor needed to re-synthesize the type at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    pub module: String,
    pub fields: Vec<String>,
}

impl RecordType {
    pub fn new(
        name: impl Into<String>,
        module: impl Into<String>,
        fields: Vec<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            module: module.into(),
            fields,
        })
    }

    /// Position of a field in declaration order.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }
}

/// An instance of a [`RecordType`]; `values` follow field declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub ty: Arc<RecordType>,
    pub values: Vec<Value>,
}

impl RecordValue {
    /// Create an instance. Returns `None` when the value count does not
    /// match the field count.
    pub fn new(ty: Arc<RecordType>, values: Vec<Value>) -> Option<Self> {
        if ty.fields.len() != values.len() {
            return None;
        }
        Some(Self { ty, values })
    }

    /// Field access by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.ty.field_index(field).map(|i| &self.values[i])
    }
}
