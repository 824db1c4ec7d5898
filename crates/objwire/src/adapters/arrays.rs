// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric array adapters.
//!
//! Arrays encode as their nested-list representation plus a dtype
//! sub-envelope. Plain arrays go through the generic `numpy.array`
//! factory with the dtype as a keyword argument; record arrays and
//! masked arrays use the structurally special factories, whose envelopes
//! carry the dtype in the dedicated `dtype` slot.

use crate::codec::{Codec, CodecBuilder};
use crate::decode::array_factory;
use crate::encode::encode_value;
use crate::envelope::{CallDescriptor, Envelope, InstanceEnvelope};
use crate::error::{CodecError, Result};
use crate::registry::EncodeTarget;
use crate::resolve::{CallArgs, FactoryEntry, FactoryError, SpecialFactory, TypeEntry};
use crate::value::{ArrayView, DType, NdArray, Value};

pub fn register(builder: &mut CodecBuilder) {
    builder
        .register_encoder(EncodeTarget::Array, encode_array)
        .register_encoder(EncodeTarget::Dtype, encode_dtype)
        .register_type(TypeEntry::new("ndarray", "numpy"))
        .register_type(TypeEntry::new("dtype", "numpy").with_special(SpecialFactory::FieldDtype))
        .register_type(TypeEntry::new("MaskedArray", "numpy.ma"))
        .register_factory("numpy", "array", FactoryEntry::direct(array_factory))
        .register_factory(
            "numpy.rec",
            "fromrecords",
            FactoryEntry::direct(special_only).with_special(SpecialFactory::RecordArray),
        )
        .register_factory(
            "numpy.ma",
            "masked_array",
            FactoryEntry::direct(special_only).with_special(SpecialFactory::MaskedArray),
        );
}

/// Placeholder for factories that are only ever reached through their
/// dedicated reconstruction path.
fn special_only(_codec: &Codec, _args: CallArgs) -> std::result::Result<Value, FactoryError> {
    Err(FactoryError::new(
        "factory requires its dedicated reconstruction path",
    ))
}

fn encode_array(codec: &Codec, value: &Value) -> Result<Envelope> {
    let Value::Array(array) = value else {
        return Err(CodecError::UnsupportedType(value.category().to_string()));
    };
    let dtype_env = encode_value(codec, &Value::Dtype(array.dtype.clone()))?;
    match (&array.mask, array.dtype.is_record()) {
        (Some(_), true) => Err(CodecError::UnsupportedType(
            "masked array with record dtype".into(),
        )),
        (Some(mask), false) => {
            let factory = CallDescriptor::new("numpy.ma", "masked_array")
                .named("data", nest(codec, &array.data, &array.shape)?)
                .named("mask", nest_mask(mask, &array.shape));
            Ok(InstanceEnvelope::new("MaskedArray", "numpy.ma")
                .with_dtype(dtype_env)
                .with_factory(factory)
                .into_envelope())
        }
        (None, true) => {
            let rows: Result<Vec<Envelope>> = array
                .data
                .iter()
                .map(|row| encode_row(codec, row))
                .collect();
            let factory =
                CallDescriptor::new("numpy.rec", "fromrecords").posonly(Envelope::array(rows?));
            let mut envelope = InstanceEnvelope::new("ndarray", "numpy")
                .with_dtype(dtype_env)
                .with_factory(factory);
            if array.view == ArrayView::Records {
                envelope = envelope.with_subtype("recarray");
            }
            Ok(envelope.into_envelope())
        }
        (None, false) => {
            let factory = CallDescriptor::new("numpy", "array")
                .posonly(nest(codec, &array.data, &array.shape)?)
                .named("dtype", dtype_env);
            Ok(InstanceEnvelope::new("ndarray", "numpy")
                .with_factory(factory)
                .into_envelope())
        }
    }
}

/// Nested-list form of flat row-major data.
fn nest(codec: &Codec, data: &[Value], shape: &[usize]) -> Result<Envelope> {
    match shape.split_first() {
        None => match data.first() {
            Some(element) => encode_value(codec, element),
            None => Err(CodecError::UnsupportedType(
                "zero-dimensional array with no element".into(),
            )),
        },
        Some((&extent, rest)) => {
            let stride: usize = rest.iter().product();
            let mut items = Vec::with_capacity(extent);
            for chunk in 0..extent {
                items.push(nest(codec, &data[chunk * stride..(chunk + 1) * stride], rest)?);
            }
            Ok(Envelope::array(items))
        }
    }
}

fn nest_mask(mask: &[bool], shape: &[usize]) -> Envelope {
    match shape.split_first() {
        None => Envelope::bool(mask.first().copied().unwrap_or(false)),
        Some((&extent, rest)) => {
            let stride: usize = rest.iter().product();
            let items = (0..extent)
                .map(|chunk| nest_mask(&mask[chunk * stride..(chunk + 1) * stride], rest))
                .collect();
            Envelope::array(items)
        }
    }
}

/// A record row encodes as a bare leaf array of its field values.
fn encode_row(codec: &Codec, row: &Value) -> Result<Envelope> {
    match row.as_items() {
        Some(items) => {
            let encoded: Result<Vec<Envelope>> =
                items.iter().map(|v| encode_value(codec, v)).collect();
            Ok(Envelope::array(encoded?))
        }
        None => Err(CodecError::UnsupportedType(format!(
            "record array element is {}",
            row.category()
        ))),
    }
}

fn encode_dtype(codec: &Codec, value: &Value) -> Result<Envelope> {
    let Value::Dtype(dtype) = value else {
        return Err(CodecError::UnsupportedType(value.category().to_string()));
    };
    let payload = match dtype {
        DType::Scalar(kind) => Envelope::str(kind.code()),
        DType::Record { fields } => {
            let mut pairs = Vec::with_capacity(fields.len());
            for (name, field_dtype) in fields {
                let field_env = encode_value(codec, &Value::Dtype(field_dtype.clone()))?;
                pairs.push(Envelope::array(vec![Envelope::str(name.clone()), field_env]));
            }
            Envelope::array(pairs)
        }
    };
    Ok(InstanceEnvelope::new("dtype", "numpy")
        .with_factory(CallDescriptor::new("numpy", "dtype").posonly(payload))
        .into_envelope())
}

/// Helper for adapters and hosts building arrays from nested data.
pub fn array_from_nested(codec: &Codec, nested: Value, dtype: Option<DType>) -> Result<NdArray> {
    let mut args = CallArgs::new(vec![nested], Default::default());
    if let Some(d) = dtype {
        args.kw.insert("dtype".into(), Value::Dtype(d));
    }
    match array_factory(codec, args) {
        Ok(Value::Array(array)) => Ok(array),
        Ok(other) => Err(CodecError::Schema(format!(
            "array factory produced {}",
            other.category()
        ))),
        Err(e) => Err(CodecError::Reconstruction {
            module: "numpy".into(),
            name: "array".into(),
            reason: e.to_string(),
        }),
    }
}
