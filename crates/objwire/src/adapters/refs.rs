// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type and callable references: values that are themselves symbols.

use crate::codec::{Codec, CodecBuilder};
use crate::envelope::{CallableReference, Envelope, TypeReference};
use crate::error::{CodecError, Result};
use crate::registry::EncodeTarget;
use crate::value::{TypeHandle, Value};

pub fn register(builder: &mut CodecBuilder) {
    builder
        .register_encoder(EncodeTarget::Type, encode_type)
        .register_encoder(EncodeTarget::Callable, encode_callable);
}

fn encode_type(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Type(TypeHandle::Named { name, module }) => Ok(Envelope::TypeRef(
            TypeReference::new(name.clone(), module.clone()),
        )),
        other => Err(CodecError::UnsupportedType(other.category().to_string())),
    }
}

fn encode_callable(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Callable(handle) => Ok(Envelope::CallableRef(CallableReference {
            name: handle.name.clone(),
            module: handle.module.clone(),
            owner: handle
                .owner
                .as_ref()
                .map(|o| TypeReference::new(o.name(), o.module())),
        })),
        other => Err(CodecError::UnsupportedType(other.category().to_string())),
    }
}
