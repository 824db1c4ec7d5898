// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lossless conversion between envelopes and JSON wire text.
//!
//! Schema-directed in both directions: tags select the node kind, and
//! descriptor bodies are parsed by field name. Empty argument slots and
//! absent options are omitted on the wire so re-encoding a decoded tree
//! is textually stable.

use crate::envelope::{
    CallDescriptor, CallableReference, Envelope, InstanceEnvelope, LeafValue, SignatureRef,
    TypeReference, TAG_CALLABLE, TAG_INSTANCE, TAG_TYPE,
};
use crate::error::{CodecError, Result};
use serde_json::{json, Map, Number, Value as Json};
use std::collections::BTreeMap;

/// Serialize an envelope tree to wire text.
pub fn to_text(envelope: &Envelope) -> Result<String> {
    Ok(serde_json::to_string(&to_wire(envelope))?)
}

/// Parse wire text into an envelope tree.
pub fn from_text(text: &str) -> Result<Envelope> {
    let json: Json = serde_json::from_str(text)?;
    from_wire(&json)
}

// ---------------------------------------------------------------------------
// Envelope -> JSON
// ---------------------------------------------------------------------------

/// Convert an envelope tree to its JSON form.
pub fn to_wire(envelope: &Envelope) -> Json {
    match envelope {
        Envelope::Leaf(leaf) => leaf_to_wire(leaf),
        Envelope::TypeRef(t) => tagged(TAG_TYPE, type_ref_body(t)),
        Envelope::CallableRef(c) => tagged(TAG_CALLABLE, callable_body(c)),
        Envelope::Instance(i) => tagged(TAG_INSTANCE, instance_body(i)),
        Envelope::Unknown(map) => Json::Object(map.clone()),
    }
}

/// Single-key tagged object.
fn tagged(tag: &str, body: Json) -> Json {
    let mut map = Map::new();
    map.insert(tag.to_owned(), body);
    Json::Object(map)
}

fn leaf_to_wire(leaf: &LeafValue) -> Json {
    match leaf {
        LeafValue::Null => Json::Null,
        LeafValue::Bool(v) => Json::Bool(*v),
        LeafValue::Int(v) => Json::Number(Number::from(*v)),
        LeafValue::Str(v) => Json::String(v.clone()),
        LeafValue::Array(items) => Json::Array(items.iter().map(to_wire).collect()),
        LeafValue::Float(v) => match Number::from_f64(*v) {
            Some(n) => Json::Number(n),
            // JSON text has no NaN/Infinity tokens; lower to an explicit
            // factory envelope instead of failing.
            None => tagged(TAG_INSTANCE, instance_body(&nonfinite_float(*v))),
        },
    }
}

/// The factory envelope a non-finite float leaf is lowered to.
fn nonfinite_float(v: f64) -> InstanceEnvelope {
    let repr = if v.is_nan() {
        "nan"
    } else if v > 0.0 {
        "inf"
    } else {
        "-inf"
    };
    InstanceEnvelope::new("float", "builtins")
        .with_factory(CallDescriptor::new("builtins", "float").posonly(Envelope::str(repr)))
}

fn type_ref_body(t: &TypeReference) -> Json {
    let mut body = Map::new();
    body.insert("type_name".into(), Json::String(t.type_name.clone()));
    body.insert("type_module".into(), Json::String(t.type_module.clone()));
    if let Some(f) = &t.type_factory {
        body.insert("type_factory".into(), descriptor_body(f));
    }
    Json::Object(body)
}

fn callable_body(c: &CallableReference) -> Json {
    let mut body = Map::new();
    body.insert("name".into(), Json::String(c.name.clone()));
    body.insert("module".into(), Json::String(c.module.clone()));
    if let Some(owner) = &c.owner {
        body.insert("owner".into(), tagged(TAG_TYPE, type_ref_body(owner)));
    }
    Json::Object(body)
}

fn instance_body(i: &InstanceEnvelope) -> Json {
    let mut body = Map::new();
    body.insert("instance_type".into(), Json::String(i.instance_type.clone()));
    body.insert(
        "instance_module".into(),
        Json::String(i.instance_module.clone()),
    );
    if let Some(f) = &i.type_factory {
        body.insert("type_factory".into(), descriptor_body(f));
    }
    if let Some(f) = &i.factory {
        body.insert("factory".into(), descriptor_body(f));
    }
    if let Some(s) = &i.subtype {
        body.insert("subtype".into(), Json::String(s.clone()));
    }
    if let Some(d) = &i.dtype {
        body.insert("dtype".into(), to_wire(d));
    }
    if let Some(v) = &i.value {
        body.insert("value".into(), to_wire(v));
    }
    Json::Object(body)
}

fn descriptor_body(d: &CallDescriptor) -> Json {
    let mut body = Map::new();
    body.insert(
        "signature".into(),
        json!({ "name": d.signature.name, "module": d.signature.module }),
    );
    if !d.posonly.is_empty() {
        body.insert(
            "posonly".into(),
            Json::Array(d.posonly.iter().map(to_wire).collect()),
        );
    }
    if !d.named.is_empty() {
        body.insert("named".into(), envelope_map(&d.named));
    }
    if !d.varpos.is_empty() {
        body.insert(
            "varpos".into(),
            Json::Array(d.varpos.iter().map(to_wire).collect()),
        );
    }
    if !d.kwonly.is_empty() {
        body.insert("kwonly".into(), envelope_map(&d.kwonly));
    }
    if !d.varkw.is_empty() {
        body.insert("varkw".into(), envelope_map(&d.varkw));
    }
    Json::Object(body)
}

fn envelope_map(map: &BTreeMap<String, Envelope>) -> Json {
    Json::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), to_wire(v)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// JSON -> Envelope
// ---------------------------------------------------------------------------

/// Convert a JSON node to an envelope.
///
/// Object nodes whose single key is a recognized tag become typed
/// envelopes and fail with [`CodecError::Schema`] when their body is
/// malformed; any other object node is preserved verbatim as
/// [`Envelope::Unknown`].
pub fn from_wire(json: &Json) -> Result<Envelope> {
    match json {
        Json::Null => Ok(Envelope::null()),
        Json::Bool(v) => Ok(Envelope::bool(*v)),
        Json::String(v) => Ok(Envelope::str(v.clone())),
        Json::Number(n) => Ok(number_leaf(n)),
        Json::Array(items) => {
            let parsed: Result<Vec<Envelope>> = items.iter().map(from_wire).collect();
            Ok(Envelope::array(parsed?))
        }
        Json::Object(map) => from_object(map),
    }
}

fn number_leaf(n: &Number) -> Envelope {
    if let Some(i) = n.as_i64() {
        Envelope::int(i)
    } else {
        Envelope::float(n.as_f64().unwrap_or(f64::MAX))
    }
}

fn from_object(map: &Map<String, Json>) -> Result<Envelope> {
    if map.len() != 1 {
        return Ok(Envelope::Unknown(map.clone()));
    }
    let (tag, body) = match map.iter().next() {
        Some(entry) => entry,
        None => return Ok(Envelope::Unknown(map.clone())),
    };
    match tag.as_str() {
        TAG_TYPE => Ok(Envelope::TypeRef(parse_type_ref(body)?)),
        TAG_CALLABLE => Ok(Envelope::CallableRef(parse_callable(body)?)),
        TAG_INSTANCE => Ok(Envelope::Instance(Box::new(parse_instance(body)?))),
        _ => Ok(Envelope::Unknown(map.clone())),
    }
}

fn body_object<'a>(tag: &str, body: &'a Json) -> Result<&'a Map<String, Json>> {
    body.as_object()
        .ok_or_else(|| CodecError::Schema(format!("{} body is not an object", tag)))
}

fn required_str(tag: &str, body: &Map<String, Json>, key: &str) -> Result<String> {
    body.get(key)
        .and_then(Json::as_str)
        .map(str::to_owned)
        .ok_or_else(|| CodecError::Schema(format!("{} node missing '{}'", tag, key)))
}

fn parse_type_ref(body: &Json) -> Result<TypeReference> {
    let body = body_object(TAG_TYPE, body)?;
    Ok(TypeReference {
        type_name: required_str(TAG_TYPE, body, "type_name")?,
        type_module: required_str(TAG_TYPE, body, "type_module")?,
        type_factory: match body.get("type_factory") {
            Some(d) => Some(parse_descriptor(d)?),
            None => None,
        },
    })
}

fn parse_callable(body: &Json) -> Result<CallableReference> {
    let body = body_object(TAG_CALLABLE, body)?;
    let owner = match body.get("owner") {
        Some(node) => match from_wire(node)? {
            Envelope::TypeRef(t) => Some(t),
            _ => {
                return Err(CodecError::Schema(
                    "callable owner is not a type reference".into(),
                ))
            }
        },
        None => None,
    };
    Ok(CallableReference {
        name: required_str(TAG_CALLABLE, body, "name")?,
        module: required_str(TAG_CALLABLE, body, "module")?,
        owner,
    })
}

fn parse_instance(body: &Json) -> Result<InstanceEnvelope> {
    let body = body_object(TAG_INSTANCE, body)?;
    Ok(InstanceEnvelope {
        instance_type: required_str(TAG_INSTANCE, body, "instance_type")?,
        instance_module: required_str(TAG_INSTANCE, body, "instance_module")?,
        type_factory: match body.get("type_factory") {
            Some(d) => Some(parse_descriptor(d)?),
            None => None,
        },
        factory: match body.get("factory") {
            Some(d) => Some(parse_descriptor(d)?),
            None => None,
        },
        subtype: match body.get("subtype") {
            Some(s) => Some(
                s.as_str()
                    .ok_or_else(|| CodecError::Schema("subtype is not a string".into()))?
                    .to_owned(),
            ),
            None => None,
        },
        dtype: match body.get("dtype") {
            Some(d) => Some(from_wire(d)?),
            None => None,
        },
        value: match body.get("value") {
            Some(v) => Some(from_wire(v)?),
            None => None,
        },
    })
}

fn parse_descriptor(json: &Json) -> Result<CallDescriptor> {
    let body = json
        .as_object()
        .ok_or_else(|| CodecError::Schema("call descriptor is not an object".into()))?;
    let signature = body
        .get("signature")
        .and_then(Json::as_object)
        .ok_or_else(|| CodecError::Schema("call descriptor missing 'signature'".into()))?;
    Ok(CallDescriptor {
        signature: SignatureRef {
            name: required_str("signature", signature, "name")?,
            module: required_str("signature", signature, "module")?,
        },
        posonly: parse_slot_list(body, "posonly")?,
        named: parse_slot_map(body, "named")?,
        varpos: parse_slot_list(body, "varpos")?,
        kwonly: parse_slot_map(body, "kwonly")?,
        varkw: parse_slot_map(body, "varkw")?,
    })
}

fn parse_slot_list(body: &Map<String, Json>, key: &str) -> Result<Vec<Envelope>> {
    match body.get(key) {
        None => Ok(Vec::new()),
        Some(Json::Array(items)) => items.iter().map(from_wire).collect(),
        Some(_) => Err(CodecError::Schema(format!("'{}' is not an array", key))),
    }
}

fn parse_slot_map(body: &Map<String, Json>, key: &str) -> Result<BTreeMap<String, Envelope>> {
    match body.get(key) {
        None => Ok(BTreeMap::new()),
        Some(Json::Object(map)) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), from_wire(v)?)))
            .collect(),
        Some(_) => Err(CodecError::Schema(format!("'{}' is not an object", key))),
    }
}
