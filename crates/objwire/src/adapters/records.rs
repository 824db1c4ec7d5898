// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime record types and their instances.
//!
//! Generated types have no exact encoder category; both the type and its
//! instances dispatch through capability checks. Envelopes always embed
//! the `collections.namedtuple` type factory so decoding works even when
//! the recorded module is unresolvable -- the instance factory then falls
//! back to calling the synthesized type itself.

use crate::codec::{Codec, CodecBuilder};
use crate::encode::encode_value;
use crate::envelope::{CallDescriptor, Envelope, InstanceEnvelope, TypeReference};
use crate::error::{CodecError, Result};
use crate::registry::Capability;
use crate::resolve::{CallArgs, FactoryEntry, FactoryError};
use crate::value::{RecordType, TypeHandle, Value};

pub fn register(builder: &mut CodecBuilder) {
    builder
        .register_capability(Capability::RecordType, encode_record_type)
        .register_capability(Capability::RecordInstance, encode_record_instance)
        .register_factory(
            "collections",
            "namedtuple",
            FactoryEntry::direct(namedtuple_factory),
        );
}

fn type_factory_descriptor(rt: &RecordType) -> CallDescriptor {
    let fields = rt.fields.iter().map(|f| Envelope::str(f.clone())).collect();
    CallDescriptor::new("collections", "namedtuple")
        .posonly(Envelope::str(rt.name.clone()))
        .posonly(Envelope::array(fields))
        .kwonly("module", Envelope::str(rt.module.clone()))
}

fn encode_record_type(_codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Type(TypeHandle::Record(rt)) => Ok(Envelope::TypeRef(
            TypeReference::new(rt.name.clone(), rt.module.clone())
                .with_factory(type_factory_descriptor(rt)),
        )),
        other => Err(CodecError::UnsupportedType(other.category().to_string())),
    }
}

fn encode_record_instance(codec: &Codec, value: &Value) -> Result<Envelope> {
    match value {
        Value::Record(record) => {
            let rt = &record.ty;
            let mut factory = CallDescriptor::new(rt.module.clone(), rt.name.clone());
            for (field, field_value) in rt.fields.iter().zip(&record.values) {
                factory = factory.named(field.clone(), encode_value(codec, field_value)?);
            }
            Ok(InstanceEnvelope::new(rt.name.clone(), rt.module.clone())
                .with_type_factory(type_factory_descriptor(rt))
                .with_factory(factory)
                .into_envelope())
        }
        other => Err(CodecError::UnsupportedType(other.category().to_string())),
    }
}

/// `collections.namedtuple(name, fields, module=...)`: synthesizes the
/// record type itself.
fn namedtuple_factory(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
    let name = args
        .pos_arg(0)?
        .as_str()
        .ok_or_else(|| FactoryError::new("type name is not a string"))?;
    let field_values = args
        .pos_arg(1)?
        .as_items()
        .ok_or_else(|| FactoryError::new("field list is not a sequence"))?;
    let fields: std::result::Result<Vec<String>, FactoryError> = field_values
        .iter()
        .map(|f| {
            f.as_str()
                .map(str::to_owned)
                .ok_or_else(|| FactoryError::new("field name is not a string"))
        })
        .collect();
    let module = match args.kw_arg("module") {
        Some(v) => v
            .as_str()
            .ok_or_else(|| FactoryError::new("module is not a string"))?,
        None => "",
    };
    Ok(Value::Type(TypeHandle::Record(RecordType::new(
        name, module, fields?,
    ))))
}
