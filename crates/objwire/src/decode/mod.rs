// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoder / reconstructor.
//!
//! Walks an envelope tree post-order: all nested envelopes inside a call
//! descriptor's argument lists are decoded first, then the now-concrete
//! arguments are used to invoke the resolved factory.
//!
//! Per decode call the state machine is
//! `Unresolved -> TypeFactoryAttempt -> {Resolved | Failed}` followed by
//! `Resolved -> ArgumentDecode -> FactoryInvoke -> {Value | error}`.
//! Terminal failures are `UnresolvedType`, `UnresolvedFactory`,
//! `Reconstruction` or `Schema`; there are no retries.

mod arrays;

pub(crate) use arrays::array_factory;

use crate::codec::Codec;
use crate::envelope::{
    self, CallDescriptor, CallableReference, Envelope, InstanceEnvelope, LeafValue, SignatureRef,
    TypeReference,
};
use crate::error::{CodecError, Result};
use crate::resolve::{CallArgs, FactoryFn, FactoryKind, Resolved, SpecialFactory, Symbol};
use crate::value::{CallableHandle, RecordValue, TypeHandle, Value};
use std::collections::BTreeMap;

/// Decode wire text into a value.
pub fn decode_text(codec: &Codec, text: &str) -> Result<Value> {
    decode_envelope(codec, &envelope::from_text(text)?)
}

/// Reconstruct the value an envelope describes.
pub fn decode_envelope(codec: &Codec, env: &Envelope) -> Result<Value> {
    match env {
        Envelope::Leaf(leaf) => decode_leaf(codec, leaf),
        Envelope::TypeRef(t) => decode_type_ref(codec, t),
        Envelope::CallableRef(c) => decode_callable_ref(codec, c),
        Envelope::Instance(i) => decode_instance(codec, i),
        Envelope::Unknown(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(CodecError::Schema(format!(
                "cannot reconstruct envelope of unknown kind (keys: {})",
                keys.join(", ")
            )))
        }
    }
}

fn decode_leaf(codec: &Codec, leaf: &LeafValue) -> Result<Value> {
    Ok(match leaf {
        LeafValue::Null => Value::None,
        LeafValue::Bool(v) => Value::Bool(*v),
        LeafValue::Int(v) => Value::Int(*v),
        LeafValue::Float(v) => Value::Float(*v),
        LeafValue::Str(v) => Value::Str(v.clone()),
        LeafValue::Array(items) => {
            let decoded: Result<Vec<Value>> =
                items.iter().map(|e| decode_envelope(codec, e)).collect();
            Value::List(decoded?)
        }
    })
}

// ---------------------------------------------------------------------------
// Type and callable references
// ---------------------------------------------------------------------------

fn decode_type_ref(codec: &Codec, t: &TypeReference) -> Result<Value> {
    match codec.symbols().resolve(&t.type_module, &t.type_name)? {
        Resolved::Symbol(Symbol::Type(entry)) => Ok(Value::Type(entry.handle.clone())),
        Resolved::Symbol(Symbol::Factory(_)) => Err(CodecError::Schema(format!(
            "type reference {}.{} names a factory",
            t.type_module, t.type_name
        ))),
        Resolved::Unresolved => match &t.type_factory {
            Some(tf) => Ok(Value::Type(synthesize_type(
                codec,
                tf,
                &t.type_module,
                &t.type_name,
            )?)),
            None => Err(CodecError::UnresolvedType {
                module: t.type_module.clone(),
                name: t.type_name.clone(),
            }),
        },
    }
}

fn decode_callable_ref(codec: &Codec, c: &CallableReference) -> Result<Value> {
    let owner = c
        .owner
        .as_ref()
        .map(|o| TypeHandle::named(&o.type_name, &o.type_module));
    match codec.symbols().resolve(&c.module, &c.name)? {
        Resolved::Unresolved => Err(CodecError::UnresolvedFactory {
            module: c.module.clone(),
            name: c.name.clone(),
        }),
        Resolved::Symbol(Symbol::Type(_)) => Ok(Value::Callable(CallableHandle {
            name: c.name.clone(),
            module: c.module.clone(),
            owner,
        })),
        Resolved::Symbol(Symbol::Factory(entry)) => {
            if let Some(recorded) = &c.owner {
                let matches = entry.owner.as_ref().is_some_and(|sig| {
                    sig.name == recorded.type_name && sig.module == recorded.type_module
                });
                if !matches {
                    return Err(CodecError::Schema(format!(
                        "method {}.{} does not belong to {}.{}",
                        c.module, c.name, recorded.type_module, recorded.type_name
                    )));
                }
            }
            Ok(Value::Callable(CallableHandle {
                name: c.name.clone(),
                module: c.module.clone(),
                owner,
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

fn decode_instance(codec: &Codec, ie: &InstanceEnvelope) -> Result<Value> {
    let type_handle = resolve_instance_type(codec, ie)?;

    // Factory-less instances carry their value directly.
    let Some(factory) = &ie.factory else {
        let Some(value) = &ie.value else {
            return Err(CodecError::Schema(format!(
                "instance {}.{} has neither factory nor value",
                ie.instance_module, ie.instance_type
            )));
        };
        return decode_envelope(codec, value);
    };

    // Post-order: arguments before invocation.
    let args = decode_call_args(codec, factory)?;
    let value = invoke_factory(codec, ie, factory, &type_handle, args)?;

    // Subtype view conversion is the final step.
    apply_subtype(value, ie.subtype.as_deref())
}

/// Steps 1-2: resolve `(instance_module, instance_type)`, falling back to
/// the embedded type factory when direct resolution misses.
fn resolve_instance_type(codec: &Codec, ie: &InstanceEnvelope) -> Result<TypeHandle> {
    match codec
        .symbols()
        .resolve(&ie.instance_module, &ie.instance_type)?
    {
        Resolved::Symbol(Symbol::Type(entry)) => Ok(entry.handle.clone()),
        Resolved::Symbol(Symbol::Factory(_)) => Err(CodecError::Schema(format!(
            "instance type {}.{} names a factory",
            ie.instance_module, ie.instance_type
        ))),
        Resolved::Unresolved => match &ie.type_factory {
            Some(tf) => {
                log::debug!(
                    "[DECODE] type {}.{} unresolved, synthesizing via {}.{}",
                    ie.instance_module,
                    ie.instance_type,
                    tf.signature.module,
                    tf.signature.name
                );
                synthesize_type(codec, tf, &ie.instance_module, &ie.instance_type)
            }
            None => Err(CodecError::UnresolvedType {
                module: ie.instance_module.clone(),
                name: ie.instance_type.clone(),
            }),
        },
    }
}

/// Invoke a type factory to manufacture the type itself at decode time.
///
/// Any failure past argument decoding surfaces as `UnresolvedType` for the
/// original `(module, name)` pair.
fn synthesize_type(
    codec: &Codec,
    tf: &CallDescriptor,
    module: &str,
    name: &str,
) -> Result<TypeHandle> {
    let unresolved = || CodecError::UnresolvedType {
        module: module.to_owned(),
        name: name.to_owned(),
    };
    let args = decode_call_args(codec, tf)?;
    let call = match codec
        .symbols()
        .resolve(&tf.signature.module, &tf.signature.name)?
    {
        Resolved::Symbol(Symbol::Factory(entry)) => entry.call,
        Resolved::Symbol(Symbol::Type(entry)) => entry.construct.ok_or_else(unresolved)?,
        Resolved::Unresolved => return Err(unresolved()),
    };
    match call(codec, args) {
        Ok(Value::Type(handle)) => Ok(handle),
        Ok(_) | Err(_) => Err(unresolved()),
    }
}

/// Decode a descriptor's argument lists in declared order.
///
/// Positionals are `posonly` then `varpos`; keywords merge `named`, then
/// `kwonly`, then `varkw`. A key defined by more than one source is a
/// schema error, never a silent overwrite.
fn decode_call_args(codec: &Codec, d: &CallDescriptor) -> Result<CallArgs> {
    let mut pos = Vec::with_capacity(d.posonly.len() + d.varpos.len());
    for env in d.posonly.iter().chain(&d.varpos) {
        pos.push(decode_envelope(codec, env)?);
    }
    let mut kw = BTreeMap::new();
    for (key, env) in d.named.iter().chain(&d.kwonly).chain(&d.varkw) {
        let value = decode_envelope(codec, env)?;
        if kw.insert(key.clone(), value).is_some() {
            return Err(CodecError::Schema(format!(
                "keyword '{}' defined by more than one argument source",
                key
            )));
        }
    }
    Ok(CallArgs::new(pos, kw))
}

/// Steps 4-5: resolve the instance factory and invoke it, routing the
/// structurally special factories to their dedicated paths and falling
/// back to calling the type itself when the factory is unresolved.
fn invoke_factory(
    codec: &Codec,
    ie: &InstanceEnvelope,
    factory: &CallDescriptor,
    type_handle: &TypeHandle,
    mut args: CallArgs,
) -> Result<Value> {
    let sig = &factory.signature;
    match codec.symbols().resolve(&sig.module, &sig.name)? {
        Resolved::Symbol(symbol) => {
            if let Some(special) = symbol.special() {
                return reconstruct_special(codec, ie, sig, special, args);
            }
            let (kind, call) = match symbol {
                Symbol::Factory(entry) => (entry.kind, entry.call),
                Symbol::Type(entry) => {
                    let call = entry.construct.ok_or_else(|| CodecError::UnresolvedFactory {
                        module: sig.module.clone(),
                        name: sig.name.clone(),
                    })?;
                    (FactoryKind::Direct, call)
                }
            };
            if kind == FactoryKind::TwoPhase {
                // Allocate-then-init idiom: the resolved type is the
                // implicit first positional argument.
                args.prepend(Value::Type(type_handle.clone()));
            }
            invoke(codec, sig, call, args)
        }
        Resolved::Unresolved => {
            log::debug!(
                "[DECODE] factory {}.{} unresolved, calling type {} as constructor",
                sig.module,
                sig.name,
                type_handle.name()
            );
            call_type_constructor(codec, type_handle, args).map_err(|_| {
                CodecError::UnresolvedFactory {
                    module: sig.module.clone(),
                    name: sig.name.clone(),
                }
            })
        }
    }
}

fn invoke(codec: &Codec, sig: &SignatureRef, call: FactoryFn, args: CallArgs) -> Result<Value> {
    call(codec, args).map_err(|e| CodecError::Reconstruction {
        module: sig.module.clone(),
        name: sig.name.clone(),
        reason: e.to_string(),
    })
}

/// Generic fallback: invoke the (possibly synthesized) type itself as an
/// ordinary constructor with the decoded arguments.
fn call_type_constructor(codec: &Codec, handle: &TypeHandle, args: CallArgs) -> Result<Value> {
    match handle {
        TypeHandle::Record(rt) => {
            let mut slots: Vec<Option<Value>> = vec![None; rt.fields.len()];
            if args.pos.len() > rt.fields.len() {
                return Err(CodecError::Schema(format!(
                    "record type {} takes {} values, got {} positionals",
                    rt.name,
                    rt.fields.len(),
                    args.pos.len()
                )));
            }
            for (i, value) in args.pos.into_iter().enumerate() {
                slots[i] = Some(value);
            }
            for (key, value) in args.kw {
                let index = rt.field_index(&key).ok_or_else(|| {
                    CodecError::Schema(format!("record type {} has no field '{}'", rt.name, key))
                })?;
                if slots[index].replace(value).is_some() {
                    return Err(CodecError::Schema(format!(
                        "record field '{}' given twice",
                        key
                    )));
                }
            }
            let values: Option<Vec<Value>> = slots.into_iter().collect();
            let values = values.ok_or_else(|| {
                CodecError::Schema(format!("record type {} is missing field values", rt.name))
            })?;
            let record = RecordValue::new(rt.clone(), values).ok_or_else(|| {
                CodecError::Schema(format!("record type {} arity mismatch", rt.name))
            })?;
            Ok(Value::Record(record))
        }
        TypeHandle::Named { name, module } => {
            let sig = SignatureRef::new(module.clone(), name.clone());
            match codec.symbols().resolve(module, name)? {
                Resolved::Symbol(Symbol::Type(entry)) => match entry.construct {
                    Some(call) => invoke(codec, &sig, call, args),
                    None => Err(CodecError::UnresolvedFactory {
                        module: module.clone(),
                        name: name.clone(),
                    }),
                },
                _ => Err(CodecError::UnresolvedFactory {
                    module: module.clone(),
                    name: name.clone(),
                }),
            }
        }
    }
}

/// Dedicated reconstruction paths for the closed set of special factories.
fn reconstruct_special(
    codec: &Codec,
    ie: &InstanceEnvelope,
    sig: &SignatureRef,
    special: SpecialFactory,
    args: CallArgs,
) -> Result<Value> {
    let wrap = |e: crate::resolve::FactoryError| CodecError::Reconstruction {
        module: sig.module.clone(),
        name: sig.name.clone(),
        reason: e.to_string(),
    };
    match special {
        SpecialFactory::FieldDtype => arrays::reconstruct_dtype(&args).map_err(wrap),
        SpecialFactory::RecordArray => {
            let dtype = decode_dtype_field(codec, ie)?;
            arrays::reconstruct_record_array(dtype, &args).map_err(wrap)
        }
        SpecialFactory::MaskedArray => {
            let dtype = match &ie.dtype {
                Some(_) => Some(decode_dtype_field(codec, ie)?),
                None => None,
            };
            arrays::reconstruct_masked_array(dtype, &args).map_err(wrap)
        }
    }
}

/// Decode the `dtype` sub-envelope of an instance (recursive, since field
/// dtypes nest).
fn decode_dtype_field(codec: &Codec, ie: &InstanceEnvelope) -> Result<crate::value::DType> {
    let env = ie.dtype.as_ref().ok_or_else(|| {
        CodecError::Schema(format!(
            "instance {}.{} is missing its dtype sub-envelope",
            ie.instance_module, ie.instance_type
        ))
    })?;
    match decode_envelope(codec, env)? {
        Value::Dtype(d) => Ok(d),
        other => Err(CodecError::Schema(format!(
            "dtype sub-envelope decoded to {}, not a dtype",
            other.category()
        ))),
    }
}

/// Step 6: `subtype` selects between structurally similar final views.
fn apply_subtype(value: Value, subtype: Option<&str>) -> Result<Value> {
    match subtype {
        None => Ok(value),
        Some("recarray") => match value {
            Value::Array(a) => Ok(Value::Array(a.with_view(crate::value::ArrayView::Records))),
            other => Err(CodecError::Schema(format!(
                "subtype 'recarray' applied to {}",
                other.category()
            ))),
        },
        Some(other) => Err(CodecError::Schema(format!("unknown subtype '{}'", other))),
    }
}

#[cfg(test)]
mod tests;
