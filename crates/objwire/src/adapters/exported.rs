// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-export capability adapter: objects that already know how to
//! describe themselves. The exported form becomes the envelope's `value`
//! with no factory; decoding returns it unchanged.

use crate::codec::{Codec, CodecBuilder};
use crate::encode::encode_value;
use crate::envelope::{Envelope, InstanceEnvelope};
use crate::error::{CodecError, Result};
use crate::registry::Capability;
use crate::value::Value;

pub fn register(builder: &mut CodecBuilder) {
    builder.register_capability(Capability::WireExport, encode_exported);
}

fn encode_exported(codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Exported(exported) => {
            let described = exported.0.wire_export();
            let value_env = encode_value(codec, &described)?;
            Ok(
                InstanceEnvelope::new(exported.0.type_name(), exported.0.type_module())
                    .with_value(value_env)
                    .into_envelope(),
            )
        }
        other => Err(CodecError::UnsupportedType(other.category().to_string())),
    }
}
