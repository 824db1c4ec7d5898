// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec assembly: registry plus symbol table, frozen after building.
//!
//! Registration follows a strict two-phase lifecycle: an unordered set of
//! registration calls while the [`CodecBuilder`] exists, after which
//! [`CodecBuilder::build`] freezes the tables. A built [`Codec`] is
//! immutable, so independent encode/decode calls are fully reentrant and
//! need no locking. The process-wide default instance is initialized once
//! with the default adapter set.

use crate::adapters;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::registry::{Capability, EncodeTarget, EncoderFn, Registry};
use crate::resolve::{FactoryEntry, SymbolTable, TypeEntry};
use crate::stream;
use crate::value::Value;
use std::io::{Read, Write};
use std::sync::OnceLock;

static GLOBAL: OnceLock<Codec> = OnceLock::new();

/// An immutable encoder registry plus symbol table.
pub struct Codec {
    registry: Registry,
    symbols: SymbolTable,
}

impl Codec {
    /// Registration-phase builder with no registrations.
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// Codec with the default adapter set installed.
    pub fn with_defaults() -> Self {
        CodecBuilder::with_defaults().build()
    }

    /// The process-wide codec, built once from the default adapters.
    pub fn global() -> &'static Codec {
        GLOBAL.get_or_init(Codec::with_defaults)
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        CodecBuilder::new().build()
    }

    /// Encode a value to wire text.
    pub fn encode(&self, value: &Value) -> Result<String> {
        crate::encode::encode_text(self, value)
    }

    /// Encode a value to an envelope tree.
    pub fn encode_envelope(&self, value: &Value) -> Result<Envelope> {
        crate::encode::encode_value(self, value)
    }

    /// Decode wire text to a value.
    pub fn decode(&self, text: &str) -> Result<Value> {
        crate::decode::decode_text(self, text)
    }

    /// Reconstruct the value an envelope describes.
    pub fn decode_envelope(&self, envelope: &Envelope) -> Result<Value> {
        crate::decode::decode_envelope(self, envelope)
    }

    /// Encode a value onto a stream.
    pub fn dump<W: Write>(&self, value: &Value, writer: W) -> Result<()> {
        stream::dump_with(self, value, writer)
    }

    /// Decode a value from a stream.
    pub fn load<R: Read>(&self, reader: R) -> Result<Value> {
        stream::load_with(self, reader)
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

/// Registration phase of a [`Codec`].
///
/// Adapter modules register their encoders and symbols here; `build`
/// freezes the result. Not shared across threads: assembly happens in the
/// single startup routine.
#[derive(Default)]
pub struct CodecBuilder {
    registry: Registry,
    symbols: SymbolTable,
}

impl CodecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-populated by every default adapter's registration call.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        adapters::install_defaults(&mut builder);
        builder
    }

    /// Associate an exact value category with an encoder.
    pub fn register_encoder(&mut self, target: EncodeTarget, encoder: EncoderFn) -> &mut Self {
        self.registry.register_encoder(target, encoder);
        self
    }

    /// Append a capability check with its encoder.
    pub fn register_capability(&mut self, capability: Capability, encoder: EncoderFn) -> &mut Self {
        self.registry.register_capability(capability, encoder);
        self
    }

    /// Register a resolvable type under its own `(module, name)`.
    pub fn register_type(&mut self, entry: TypeEntry) -> &mut Self {
        self.symbols.register_type(entry);
        self
    }

    /// Register a resolvable factory.
    pub fn register_factory(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        entry: FactoryEntry,
    ) -> &mut Self {
        self.symbols.register_factory(module, name, entry);
        self
    }

    /// Freeze the tables.
    pub fn build(self) -> Codec {
        Codec {
            registry: self.registry,
            symbols: self.symbols,
        }
    }
}

/// Encode a value to wire text with the process-wide codec.
pub fn encode(value: &Value) -> Result<String> {
    Codec::global().encode(value)
}

/// Decode wire text to a value with the process-wide codec.
pub fn decode(text: &str) -> Result<Value> {
    Codec::global().decode(text)
}
