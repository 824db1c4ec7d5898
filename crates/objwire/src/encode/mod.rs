// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoder traversal.
//!
//! Depth-first, pre-order on containers: dispatch builds the outer
//! envelope stub for a composite value, and the selected strategy
//! recursively encodes every child value it collects. A failure deep in a
//! child aborts the whole tree; no partial envelope is ever returned.

use crate::codec::Codec;
use crate::envelope::{self, Envelope};
use crate::error::Result;
use crate::value::Value;

/// Encode a value into an envelope tree.
///
/// Propagates [`crate::CodecError::UnsupportedType`] unchanged from
/// dispatch; has no side effects beyond building the return value.
pub fn encode_value(codec: &Codec, value: &Value) -> Result<Envelope> {
    let encoder = codec.registry().dispatch(value)?;
    encoder(codec, value)
}

/// Encode a value to wire text.
pub fn encode_text(codec: &Codec, value: &Value) -> Result<String> {
    envelope::to_text(&encode_value(codec, value)?)
}
