// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unit tests for the reconstruction algorithm.

use super::*;
use crate::codec::CodecBuilder;
use crate::resolve::{FactoryEntry, FactoryError, TypeEntry};
use serde_json::json;

fn defaults() -> Codec {
    Codec::with_defaults()
}

#[test]
fn test_keyword_collision_is_schema_error() {
    let env = InstanceEnvelope::new("complex", "builtins")
        .with_factory(
            CallDescriptor::new("builtins", "complex")
                .named("real", Envelope::float(1.0))
                .named("imag", Envelope::float(2.0))
                .varkw("real", Envelope::float(3.0)),
        )
        .into_envelope();
    match defaults().decode_envelope(&env) {
        Err(CodecError::Schema(msg)) => assert!(msg.contains("real"), "{}", msg),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_unresolved_type_without_factory() {
    let env = InstanceEnvelope::new("Missing", "nowhere").into_envelope();
    match defaults().decode_envelope(&env) {
        Err(CodecError::UnresolvedType { module, name }) => {
            assert_eq!(module, "nowhere");
            assert_eq!(name, "Missing");
        }
        other => panic!("expected UnresolvedType, got {:?}", other),
    }
}

#[test]
fn test_unresolved_type_ref_without_factory() {
    let env = Envelope::TypeRef(crate::envelope::TypeReference::new("Missing", "nowhere"));
    assert!(matches!(
        defaults().decode_envelope(&env),
        Err(CodecError::UnresolvedType { .. })
    ));
}

#[test]
fn test_type_factory_synthesizes_record_type() {
    // module path deliberately invalid; only the embedded factory works
    let type_factory = CallDescriptor::new("collections", "namedtuple")
        .posonly(Envelope::str("Point"))
        .posonly(Envelope::array(vec![Envelope::str("x"), Envelope::str("y")]))
        .kwonly("module", Envelope::str("bogus.module"));
    let env = InstanceEnvelope::new("Point", "bogus.module")
        .with_type_factory(type_factory)
        .with_factory(
            CallDescriptor::new("bogus.module", "Point")
                .named("x", Envelope::int(1))
                .named("y", Envelope::int(2)),
        )
        .into_envelope();

    match defaults().decode_envelope(&env).expect("decode") {
        Value::Record(record) => {
            assert_eq!(record.ty.name, "Point");
            assert_eq!(record.ty.fields, vec!["x".to_string(), "y".to_string()]);
            assert_eq!(record.get("x"), Some(&Value::Int(1)));
            assert_eq!(record.get("y"), Some(&Value::Int(2)));
        }
        other => panic!("expected record, got {:?}", other),
    }
}

#[test]
fn test_two_phase_factory_receives_type_first() {
    fn build(_codec: &Codec, args: CallArgs) -> std::result::Result<Value, FactoryError> {
        match (args.pos_arg(0)?, args.pos_arg(1)?) {
            (Value::Type(handle), Value::Int(i)) if handle.name() == "Thing" => Ok(Value::Int(*i)),
            _ => Err(FactoryError::new("expected the implicit type argument")),
        }
    }

    let mut builder = CodecBuilder::with_defaults();
    builder
        .register_type(TypeEntry::new("Thing", "demo"))
        .register_factory("demo", "Thing.__new__", FactoryEntry::two_phase(build));
    let codec = builder.build();

    let env = InstanceEnvelope::new("Thing", "demo")
        .with_factory(CallDescriptor::new("demo", "Thing.__new__").posonly(Envelope::int(5)))
        .into_envelope();
    assert_eq!(codec.decode_envelope(&env).expect("decode"), Value::Int(5));
}

#[test]
fn test_bound_method_owner_verification() {
    fn nop(_: &Codec, _: CallArgs) -> std::result::Result<Value, FactoryError> {
        Ok(Value::None)
    }

    let mut builder = CodecBuilder::with_defaults();
    builder.register_factory(
        "numpy",
        "ndarray.tolist",
        FactoryEntry::direct(nop).with_owner(SignatureRef::new("numpy", "ndarray")),
    );
    let codec = builder.build();

    let good = Envelope::CallableRef(CallableReference {
        name: "ndarray.tolist".into(),
        module: "numpy".into(),
        owner: Some(crate::envelope::TypeReference::new("ndarray", "numpy")),
    });
    match codec.decode_envelope(&good).expect("decode") {
        Value::Callable(handle) => assert_eq!(handle.name, "ndarray.tolist"),
        other => panic!("expected callable, got {:?}", other),
    }

    let mismatched = Envelope::CallableRef(CallableReference {
        name: "ndarray.tolist".into(),
        module: "numpy".into(),
        owner: Some(crate::envelope::TypeReference::new("matrix", "numpy")),
    });
    assert!(matches!(
        codec.decode_envelope(&mismatched),
        Err(CodecError::Schema(_))
    ));
}

#[test]
fn test_unresolved_callable_ref() {
    let env = Envelope::CallableRef(CallableReference {
        name: "vanished".into(),
        module: "nowhere".into(),
        owner: None,
    });
    assert!(matches!(
        defaults().decode_envelope(&env),
        Err(CodecError::UnresolvedFactory { .. })
    ));
}

#[test]
fn test_unknown_kind_fails_only_at_reconstruction() {
    let raw = json!({ "python_objekt": { "x": 1 } });
    let env = crate::envelope::from_wire(&raw).expect("from_wire");
    match defaults().decode_envelope(&env) {
        Err(CodecError::Schema(msg)) => assert!(msg.contains("python_objekt"), "{}", msg),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_factory_less_instance_returns_value() {
    let mut builder = CodecBuilder::with_defaults();
    builder.register_type(TypeEntry::new("Blob", "demo"));
    let codec = builder.build();

    let env = InstanceEnvelope::new("Blob", "demo")
        .with_value(Envelope::int(42))
        .into_envelope();
    assert_eq!(codec.decode_envelope(&env).expect("decode"), Value::Int(42));

    let empty = InstanceEnvelope::new("Blob", "demo").into_envelope();
    assert!(matches!(
        codec.decode_envelope(&empty),
        Err(CodecError::Schema(_))
    ));
}

#[test]
fn test_unresolved_factory_with_uncallable_type() {
    // ndarray resolves but has no native constructor, and the recorded
    // factory does not exist: the fallback cannot succeed
    let env = InstanceEnvelope::new("ndarray", "numpy")
        .with_factory(CallDescriptor::new("nowhere", "make").posonly(Envelope::int(1)))
        .into_envelope();
    match defaults().decode_envelope(&env) {
        Err(CodecError::UnresolvedFactory { module, name }) => {
            assert_eq!(module, "nowhere");
            assert_eq!(name, "make");
        }
        other => panic!("expected UnresolvedFactory, got {:?}", other),
    }
}

#[test]
fn test_instance_type_naming_a_factory_is_schema_error() {
    let env = InstanceEnvelope::new("array", "numpy")
        .with_value(Envelope::int(1))
        .into_envelope();
    assert!(matches!(
        defaults().decode_envelope(&env),
        Err(CodecError::Schema(_))
    ));
}

#[test]
fn test_unknown_subtype_is_schema_error() {
    let env = InstanceEnvelope::new("tuple", "builtins")
        .with_factory(
            CallDescriptor::new("builtins", "tuple")
                .posonly(Envelope::array(vec![Envelope::int(1)])),
        )
        .with_subtype("sideways")
        .into_envelope();
    match defaults().decode_envelope(&env) {
        Err(CodecError::Schema(msg)) => assert!(msg.contains("sideways"), "{}", msg),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_factory_failure_is_reconstruction_error() {
    // complex() with a string argument: the factory resolves but rejects it
    let env = InstanceEnvelope::new("complex", "builtins")
        .with_factory(
            CallDescriptor::new("builtins", "complex").named("real", Envelope::str("abc")),
        )
        .into_envelope();
    match defaults().decode_envelope(&env) {
        Err(CodecError::Reconstruction { module, name, .. }) => {
            assert_eq!(module, "builtins");
            assert_eq!(name, "complex");
        }
        other => panic!("expected Reconstruction, got {:?}", other),
    }
}
