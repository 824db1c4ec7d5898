// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Symbol resolution: `(module, qualified name)` to a live symbol.
//!
//! The source relied on dynamic import; here the table is populated
//! statically by the adapter registrations during codec assembly, and an
//! unresolved symbol is a first-class miss result rather than an import
//! exception. `resolve` never fails for "not found" -- callers build
//! fallback chains on top of [`Resolved::Unresolved`] -- and only errors
//! for malformed input (empty name).

use crate::codec::Codec;
use crate::envelope::SignatureRef;
use crate::error::{CodecError, Result};
use crate::value::{TypeHandle, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Reason a factory invocation failed; the decoder wraps it into
/// [`CodecError::Reconstruction`] together with the factory's signature.
#[derive(Debug)]
pub struct FactoryError(pub String);

impl FactoryError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Native reconstruction routine invoked with fully decoded arguments.
pub type FactoryFn = fn(&Codec, CallArgs) -> std::result::Result<Value, FactoryError>;

/// Decoded positional and keyword arguments for one factory invocation.
///
/// Positionals preserve declared order (`posonly` then `varpos`); the
/// keyword map is the collision-checked merge of `named`, `kwonly` and
/// `varkw`.
#[derive(Debug, Default)]
pub struct CallArgs {
    pub pos: Vec<Value>,
    pub kw: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new(pos: Vec<Value>, kw: BTreeMap<String, Value>) -> Self {
        Self { pos, kw }
    }

    /// Required positional argument.
    pub fn pos_arg(&self, index: usize) -> std::result::Result<&Value, FactoryError> {
        self.pos
            .get(index)
            .ok_or_else(|| FactoryError::new(format!("missing positional argument {}", index)))
    }

    /// Optional keyword argument.
    pub fn kw_arg(&self, key: &str) -> Option<&Value> {
        self.kw.get(key)
    }

    /// Insert the implicit first positional argument (two-phase
    /// constructor convention).
    pub fn prepend(&mut self, value: Value) {
        self.pos.insert(0, value);
    }
}

/// Construction convention of a registered factory.
///
/// `TwoPhase` is the allocate-then-init idiom: the decoder passes the
/// resolved type as an implicit first positional argument. Recorded
/// explicitly at registration, never inferred from the callable's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    Direct,
    TwoPhase,
}

/// The closed set of structurally special factories. Recognized by
/// identity of the resolved table entry; each uses a dedicated
/// reconstruction path because generic argument substitution is
/// insufficient for these shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialFactory {
    /// Dtype describing named/typed fields (nests recursively).
    FieldDtype,
    /// Array with named/typed fields.
    RecordArray,
    /// Array with a validity mask.
    MaskedArray,
}

/// A resolvable type: its handle plus an optional native constructor
/// (used when the type itself is called, directly or as the generic
/// factory fallback).
pub struct TypeEntry {
    pub handle: TypeHandle,
    pub construct: Option<FactoryFn>,
    pub special: Option<SpecialFactory>,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            handle: TypeHandle::named(name, module),
            construct: None,
            special: None,
        }
    }

    pub fn with_construct(mut self, f: FactoryFn) -> Self {
        self.construct = Some(f);
        self
    }

    pub fn with_special(mut self, special: SpecialFactory) -> Self {
        self.special = Some(special);
        self
    }
}

/// A resolvable free function or bound method.
pub struct FactoryEntry {
    pub kind: FactoryKind,
    pub call: FactoryFn,
    pub special: Option<SpecialFactory>,
    /// Owning type, present for bound methods.
    pub owner: Option<SignatureRef>,
}

impl FactoryEntry {
    pub fn direct(call: FactoryFn) -> Self {
        Self {
            kind: FactoryKind::Direct,
            call,
            special: None,
            owner: None,
        }
    }

    pub fn two_phase(call: FactoryFn) -> Self {
        Self {
            kind: FactoryKind::TwoPhase,
            call,
            special: None,
            owner: None,
        }
    }

    pub fn with_special(mut self, special: SpecialFactory) -> Self {
        self.special = Some(special);
        self
    }

    pub fn with_owner(mut self, owner: SignatureRef) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// A live symbol: a type or a callable.
pub enum Symbol {
    Type(TypeEntry),
    Factory(FactoryEntry),
}

impl Symbol {
    pub fn special(&self) -> Option<SpecialFactory> {
        match self {
            Self::Type(t) => t.special,
            Self::Factory(f) => f.special,
        }
    }
}

/// Result of a lookup; a miss is data, not an error.
pub enum Resolved<'a> {
    Symbol(&'a Symbol),
    Unresolved,
}

/// Statically populated `(module, qualified name)` table.
#[derive(Default)]
pub struct SymbolTable {
    symbols: HashMap<(String, String), Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol. Later registrations for the same key replace
    /// earlier ones (last adapter wins, deterministic startup order).
    pub fn register(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        symbol: Symbol,
    ) {
        self.symbols.insert((module.into(), name.into()), symbol);
    }

    pub fn register_type(&mut self, entry: TypeEntry) {
        let key = (
            entry.handle.module().to_owned(),
            entry.handle.name().to_owned(),
        );
        self.symbols.insert(key, Symbol::Type(entry));
    }

    pub fn register_factory(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        entry: FactoryEntry,
    ) {
        self.symbols
            .insert((module.into(), name.into()), Symbol::Factory(entry));
    }

    /// Look up a symbol.
    ///
    /// Never fails for a miss; errors only for malformed input.
    pub fn resolve(&self, module: &str, name: &str) -> Result<Resolved<'_>> {
        if name.is_empty() {
            return Err(CodecError::Schema("symbol name is empty".into()));
        }
        match self.symbols.get(&(module.to_owned(), name.to_owned())) {
            Some(symbol) => Ok(Resolved::Symbol(symbol)),
            None => Ok(Resolved::Unresolved),
        }
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbols are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
