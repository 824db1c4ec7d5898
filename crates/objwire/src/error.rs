// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for encode/decode operations.

use std::fmt;

/// Errors surfaced by the codec.
///
/// All failures propagate immediately to the caller of `encode`/`decode`;
/// there are no retries and no partial results. Transport layers are
/// expected to treat any variant as "(de)serialization failed" while
/// keeping the variant for diagnostics.
#[derive(Debug)]
pub enum CodecError {
    /// Encoder: no registered strategy and no capability matched.
    UnsupportedType(String),
    /// Decoder: malformed envelope (missing keys, conflicting keyword
    /// argument sources, unknown envelope kind under reconstruction).
    Schema(String),
    /// Decoder: neither direct resolution nor `type_factory` produced a type.
    UnresolvedType { module: String, name: String },
    /// Decoder: the instance factory cannot be resolved and the generic
    /// call-the-type fallback did not succeed either.
    UnresolvedFactory { module: String, name: String },
    /// Decoder: factory resolved but its invocation failed.
    Reconstruction {
        module: String,
        name: String,
        reason: String,
    },
    /// Wire text is not valid JSON.
    Wire(serde_json::Error),
    /// Stream transport failure (dump/load only).
    Io(std::io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType(what) => write!(f, "No encoder registered for: {}", what),
            Self::Schema(msg) => write!(f, "Malformed envelope: {}", msg),
            Self::UnresolvedType { module, name } => {
                write!(f, "Cannot resolve type {}.{}", module, name)
            }
            Self::UnresolvedFactory { module, name } => {
                write!(f, "Cannot resolve factory {}.{}", module, name)
            }
            Self::Reconstruction {
                module,
                name,
                reason,
            } => write!(f, "Factory {}.{} failed: {}", module, name, reason),
            Self::Wire(e) => write!(f, "Invalid wire text: {}", e),
            Self::Io(e) => write!(f, "Stream I/O failed: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Wire(e)
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Convenient alias for API results using the public [`CodecError`] type.
pub type Result<T> = std::result::Result<T, CodecError>;
