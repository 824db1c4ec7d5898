// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # objwire - self-describing object-graph codec
//!
//! Converts in-memory runtime values -- numeric scalars and arrays,
//! composite records, runtime-generated record types, and references to
//! callables/types themselves -- into a textual, self-describing wire
//! format, and reconstructs equivalent values from that format later,
//! possibly in a different process.
//!
//! The wire format follows the remote execution kernel's convention:
//! every object-valued node is a single-key JSON object tagged
//! `python_type`, `python_function_or_method` or `python_object`; bare
//! scalars and arrays are untagged leaves. Symbol references use the
//! kernel's `(module, qualified name)` naming, and the codec's symbol
//! table maps those names onto native reconstruction routines.
//!
//! ## Quick Start
//!
//! ```rust
//! use objwire::{decode, encode, Value};
//!
//! fn main() -> objwire::Result<()> {
//!     let value = Value::Tuple(vec![
//!         Value::Int(1),
//!         Value::Float(2.5),
//!         Value::Str("abc".into()),
//!         Value::None,
//!         Value::Bool(true),
//!     ]);
//!
//!     let text = encode(&value)?;
//!     assert_eq!(decode(&text)?, value);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                        Public surface                        |
//! |        encode/decode (text) | dump/load (streams)            |
//! +--------------------------------------------------------------+
//! |   Encoder                           Decoder/Reconstructor    |
//! |   dispatch -> strategy              post-order walk,         |
//! |   pre-order traversal               factory resolution       |
//! +--------------------------------------------------------------+
//! |   Type Registry (encoders)   |   Symbol Table (factories)    |
//! |          write-once at startup, read-many after              |
//! +--------------------------------------------------------------+
//! |              Envelope schema  <->  JSON wire text            |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Value`] | Closed model of every supported runtime value category |
//! | [`Envelope`] | Tagged wire-format node representing one value |
//! | [`CallDescriptor`] | Recorded recipe for invoking a factory/constructor |
//! | [`Codec`] | Frozen encoder registry plus symbol table |
//! | [`CodecBuilder`] | Registration phase; adapters install themselves here |
//!
//! Encoding and decoding of independent value graphs are fully reentrant:
//! the only shared state is the process-wide [`Codec`], which is built
//! once and immutable thereafter. Cyclic object graphs are not
//! supported -- value trees own their children, so a cycle cannot be
//! constructed in the first place.

/// Per-category adapters and the default symbol registrations.
pub mod adapters;
/// Codec assembly (registry + symbol table) and the process-wide instance.
pub mod codec;
/// Decoder / reconstructor (post-order envelope walk).
pub mod decode;
/// Encoder traversal (pre-order, dispatch-driven).
pub mod encode;
/// Envelope schema and wire-text conversion.
pub mod envelope;
/// Error taxonomy.
pub mod error;
/// Encoder registry and dispatch.
pub mod registry;
/// Symbol resolution (module + qualified name to live symbol).
pub mod resolve;
/// Stream transport wrappers (dump/load).
pub mod stream;
/// Runtime value model.
pub mod value;

pub use codec::{decode, encode, Codec, CodecBuilder};
pub use envelope::{CallDescriptor, Envelope, SignatureRef};
pub use error::{CodecError, Result};
pub use stream::{dump, dump_file, load, load_file};
pub use value::{
    ArrayView, CallableHandle, DType, ExportedValue, NdArray, RecordType, RecordValue, ScalarKind,
    TypeHandle, Value, WireExport,
};
