// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container adapters. Lists encode as bare leaf arrays; tuples and
//! dicts need a factory so the decoder can restore the exact container
//! kind (`builtins.tuple` takes its elements positionally, `builtins.dict`
//! takes its entries through the keyword catch-all).

use crate::codec::{Codec, CodecBuilder};
use crate::encode::encode_value;
use crate::envelope::{CallDescriptor, Envelope, InstanceEnvelope};
use crate::error::{CodecError, Result};
use crate::registry::EncodeTarget;
use crate::resolve::{CallArgs, FactoryError, TypeEntry};
use crate::value::Value;

pub fn register(builder: &mut CodecBuilder) {
    builder
        .register_encoder(EncodeTarget::List, encode_list)
        .register_encoder(EncodeTarget::Tuple, encode_tuple)
        .register_encoder(EncodeTarget::Dict, encode_dict)
        .register_type(TypeEntry::new("tuple", "builtins").with_construct(tuple_construct))
        .register_type(TypeEntry::new("dict", "builtins").with_construct(dict_construct));
}

fn unexpected(value: &Value) -> CodecError {
    CodecError::UnsupportedType(value.category().to_string())
}

fn encode_items(codec: &Codec, items: &[Value]) -> Result<Envelope> {
    let encoded: Result<Vec<Envelope>> = items.iter().map(|v| encode_value(codec, v)).collect();
    Ok(Envelope::array(encoded?))
}

fn encode_list(codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::List(items) => encode_items(codec, items),
        other => Err(unexpected(other)),
    }
}

fn encode_tuple(codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Tuple(items) => Ok(InstanceEnvelope::new("tuple", "builtins")
            .with_factory(
                CallDescriptor::new("builtins", "tuple").posonly(encode_items(codec, items)?),
            )
            .into_envelope()),
        other => Err(unexpected(other)),
    }
}

fn encode_dict(codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Dict(entries) => {
            let mut factory = CallDescriptor::new("builtins", "dict");
            for (key, entry) in entries {
                factory = factory.varkw(key.clone(), encode_value(codec, entry)?);
            }
            Ok(InstanceEnvelope::new("dict", "builtins")
                .with_factory(factory)
                .into_envelope())
        }
        other => Err(unexpected(other)),
    }
}

/// `builtins.tuple`: one positional, the element sequence.
fn tuple_construct(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
    match args.pos_arg(0)? {
        Value::List(items) | Value::Tuple(items) => Ok(Value::Tuple(items.clone())),
        other => Err(FactoryError::new(format!(
            "cannot build a tuple from {}",
            other.category()
        ))),
    }
}

/// `builtins.dict`: entries arrive as keyword arguments.
fn dict_construct(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
    if !args.pos.is_empty() {
        return Err(FactoryError::new("dict factory takes no positionals"));
    }
    Ok(Value::Dict(args.kw))
}
