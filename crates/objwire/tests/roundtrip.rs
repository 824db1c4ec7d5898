// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Whole-surface round-trip tests: every wire scenario the codec
// guarantees, exercised through the public API.

use objwire::{
    decode, dump, dump_file, encode, load, load_file, ArrayView, Codec, CodecBuilder, CodecError,
    DType, NdArray, RecordType, RecordValue, ScalarKind, TypeHandle, Value,
};

fn roundtrip(value: &Value) -> Value {
    decode(&encode(value).expect("encode")).expect("decode")
}

#[test]
fn leaf_kinds_roundtrip() {
    for value in [
        Value::None,
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(i64::MIN),
        Value::Int(i64::MAX),
        Value::Float(-0.5),
        Value::Str(String::new()),
        Value::Str("with \"quotes\" and \u{3b4}".into()),
    ] {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn nonfinite_floats_roundtrip() {
    assert_eq!(roundtrip(&Value::Float(f64::INFINITY)), Value::Float(f64::INFINITY));
    assert_eq!(
        roundtrip(&Value::Float(f64::NEG_INFINITY)),
        Value::Float(f64::NEG_INFINITY)
    );
    match roundtrip(&Value::Float(f64::NAN)) {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn mixed_tuple_roundtrips_with_order_and_kinds() {
    // (1, 2.5, "abc", None, True)
    let value = Value::Tuple(vec![
        Value::Int(1),
        Value::Float(2.5),
        Value::Str("abc".into()),
        Value::None,
        Value::Bool(true),
    ]);
    let text = encode(&value).expect("encode");
    assert!(text.contains("python_object"));
    assert_eq!(decode(&text).expect("decode"), value);
}

#[test]
fn complex_number_roundtrips() {
    // 3.0 - 4.0i
    let value = Value::Complex { re: 3.0, im: -4.0 };
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn two_by_two_float_array_keeps_dtype_and_shape() {
    let array = NdArray::new(
        DType::Scalar(ScalarKind::Float64),
        vec![2, 2],
        vec![
            Value::Float(1.0),
            Value::Float(2.0),
            Value::Float(3.0),
            Value::Float(4.0),
        ],
    )
    .expect("array");
    match roundtrip(&Value::Array(array.clone())) {
        Value::Array(decoded) => {
            assert_eq!(decoded.shape, vec![2, 2]);
            assert_eq!(decoded.dtype, DType::Scalar(ScalarKind::Float64));
            assert_eq!(decoded.data, array.data);
        }
        other => panic!("expected array, got {:?}", other),
    }
}

#[test]
fn invalid_module_with_type_factory_still_decodes() {
    let rt = RecordType::new("Point", "no.such.module", vec!["x".into(), "y".into()]);
    let record = RecordValue::new(rt, vec![Value::Int(1), Value::Int(2)]).expect("record");
    match roundtrip(&Value::Record(record)) {
        Value::Record(decoded) => {
            assert_eq!(decoded.ty.name, "Point");
            assert_eq!(decoded.values, vec![Value::Int(1), Value::Int(2)]);
        }
        other => panic!("expected record, got {:?}", other),
    }
}

#[test]
fn unsupported_category_fails_encode() {
    // a codec with no registered strategies and no capability matches
    let bare = CodecBuilder::new().build();
    match bare.encode(&Value::Int(1)) {
        Err(CodecError::UnsupportedType(_)) => {}
        other => panic!("expected UnsupportedType, got {:?}", other),
    }
}

#[test]
fn unresolved_type_is_an_error_not_a_default() {
    let text = r#"{"python_object": {"instance_type": "Ghost", "instance_module": "no.where"}}"#;
    match decode(text) {
        Err(CodecError::UnresolvedType { module, name }) => {
            assert_eq!(module, "no.where");
            assert_eq!(name, "Ghost");
        }
        other => panic!("expected UnresolvedType, got {:?}", other),
    }
}

#[test]
fn conflicting_keyword_sources_are_rejected() {
    let text = r#"{"python_object": {"instance_type": "dict", "instance_module": "builtins",
        "factory": {"signature": {"name": "dict", "module": "builtins"},
        "named": {"k": 1}, "varkw": {"k": 2}}}}"#;
    match decode(text) {
        Err(CodecError::Schema(msg)) => assert!(msg.contains('k'), "{}", msg),
        other => panic!("expected Schema, got {:?}", other),
    }
}

#[test]
fn encode_decode_encode_is_textually_stable() {
    let rt = RecordType::new("Row", "scratch", vec!["a".into(), "b".into()]);
    let values = [
        Value::Tuple(vec![Value::Int(1), Value::Float(2.5), Value::None]),
        Value::Record(
            RecordValue::new(rt, vec![Value::Int(1), Value::Str("x".into())]).expect("record"),
        ),
        Value::Array(
            NdArray::new(
                DType::Scalar(ScalarKind::Float64),
                vec![3],
                vec![Value::Float(0.0), Value::Float(0.5), Value::Float(1.0)],
            )
            .expect("array"),
        ),
    ];
    for value in values {
        let first = encode(&value).expect("encode");
        let again = encode(&decode(&first).expect("decode")).expect("re-encode");
        assert_eq!(first, again);
    }
}

#[test]
fn record_array_view_survives_the_wire() {
    let dtype = DType::Record {
        fields: vec![
            ("t".into(), DType::Scalar(ScalarKind::Float64)),
            ("v".into(), DType::Scalar(ScalarKind::Int64)),
        ],
    };
    let rows = vec![
        Value::Tuple(vec![Value::Float(0.0), Value::Int(10)]),
        Value::Tuple(vec![Value::Float(0.1), Value::Int(20)]),
    ];
    let array = NdArray::new(dtype, vec![2], rows)
        .expect("array")
        .with_view(ArrayView::Records);
    let text = encode(&Value::Array(array)).expect("encode");
    assert!(text.contains("recarray"));
    match decode(&text).expect("decode") {
        Value::Array(decoded) => assert_eq!(decoded.view, ArrayView::Records),
        other => panic!("expected array, got {:?}", other),
    }
}

#[test]
fn streams_roundtrip_through_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.owl");

    let value = Value::Tuple(vec![
        Value::Str("trace".into()),
        Value::Array(
            NdArray::new(
                DType::Scalar(ScalarKind::Int64),
                vec![2],
                vec![Value::Int(3), Value::Int(4)],
            )
            .expect("array"),
        ),
    ]);

    dump_file(&value, &path).expect("dump_file");
    assert_eq!(load_file(&path).expect("load_file"), value);

    // generic writer/reader form
    let mut buffer = Vec::new();
    dump(&value, &mut buffer).expect("dump");
    assert_eq!(load(buffer.as_slice()).expect("load"), value);
}

#[test]
fn wire_text_is_valid_json_with_tagged_nodes() {
    let value = Value::Type(TypeHandle::named("ndarray", "numpy"));
    let text = encode(&value).expect("encode");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert!(parsed.get("python_type").is_some());

    let codec = Codec::with_defaults();
    assert_eq!(codec.decode(&text).expect("decode"), value);
}
