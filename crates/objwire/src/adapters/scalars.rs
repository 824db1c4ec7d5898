// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar adapters: none, bool, int, float (including the non-finite
//! lowering factory) and str encode as leaves; complex encodes through
//! the `builtins.complex` factory.

use crate::codec::{Codec, CodecBuilder};
use crate::envelope::{CallDescriptor, Envelope, InstanceEnvelope};
use crate::error::{CodecError, Result};
use crate::registry::EncodeTarget;
use crate::resolve::{CallArgs, FactoryError, TypeEntry};
use crate::value::Value;

pub fn register(builder: &mut CodecBuilder) {
    builder
        .register_encoder(EncodeTarget::None, encode_none)
        .register_encoder(EncodeTarget::Bool, encode_bool)
        .register_encoder(EncodeTarget::Int, encode_int)
        .register_encoder(EncodeTarget::Float, encode_float)
        .register_encoder(EncodeTarget::Str, encode_str)
        .register_encoder(EncodeTarget::Complex, encode_complex)
        .register_type(TypeEntry::new("float", "builtins").with_construct(float_construct))
        .register_type(TypeEntry::new("complex", "builtins").with_construct(complex_construct));
}

fn unexpected(value: &Value) -> CodecError {
    CodecError::UnsupportedType(value.category().to_string())
}

fn encode_none(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::None => Ok(Envelope::null()),
        other => Err(unexpected(other)),
    }
}

fn encode_bool(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Bool(b) => Ok(Envelope::bool(*b)),
        other => Err(unexpected(other)),
    }
}

fn encode_int(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Int(i) => Ok(Envelope::int(*i)),
        other => Err(unexpected(other)),
    }
}

fn encode_float(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        // Non-finite values are lowered by the wire layer.
        Value::Float(f) => Ok(Envelope::float(*f)),
        other => Err(unexpected(other)),
    }
}

fn encode_str(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Str(s) => Ok(Envelope::str(s.clone())),
        other => Err(unexpected(other)),
    }
}

fn encode_complex(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Complex { re, im } => Ok(InstanceEnvelope::new("complex", "builtins")
            .with_factory(
                CallDescriptor::new("builtins", "complex")
                    .named("real", Envelope::float(*re))
                    .named("imag", Envelope::float(*im)),
            )
            .into_envelope()),
        other => Err(unexpected(other)),
    }
}

/// `builtins.float`: numeric passthrough plus the textual spellings the
/// non-finite lowering emits.
fn float_construct(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
    match args.pos_arg(0)? {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Str(s) => match s.as_str() {
            "nan" => Ok(Value::Float(f64::NAN)),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            "-inf" => Ok(Value::Float(f64::NEG_INFINITY)),
            other => other
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| FactoryError::new(format!("cannot parse float from '{}'", other))),
        },
        other => Err(FactoryError::new(format!(
            "cannot build a float from {}",
            other.category()
        ))),
    }
}

/// `builtins.complex`: `real`/`imag` keywords, or two positionals.
fn complex_construct(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
    let part = |value: &Value, which: &str| {
        value.as_float().ok_or_else(|| {
            FactoryError::new(format!("{} part is {}, not a number", which, value.category()))
        })
    };
    let re = match args.kw_arg("real") {
        Some(v) => part(v, "real")?,
        None => part(args.pos_arg(0)?, "real")?,
    };
    let im = match args.kw_arg("imag") {
        Some(v) => part(v, "imag")?,
        None => match args.pos.get(1) {
            Some(v) => part(v, "imag")?,
            None => 0.0,
        },
    };
    Ok(Value::Complex { re, im })
}
