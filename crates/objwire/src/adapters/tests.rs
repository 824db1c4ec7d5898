// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Round-trip tests for the default adapter set.

use crate::codec::{Codec, CodecBuilder};
use crate::resolve::TypeEntry;
use crate::value::{
    ArrayView, DType, ExportedValue, NdArray, RecordType, RecordValue, ScalarKind, TypeHandle,
    Value, WireExport,
};
use std::collections::BTreeMap;

fn roundtrip(codec: &Codec, value: &Value) -> Value {
    let text = codec.encode(value).expect("encode");
    codec.decode(&text).expect("decode")
}

fn assert_roundtrip(codec: &Codec, value: Value) {
    assert_eq!(roundtrip(codec, &value), value);
}

#[test]
fn test_scalar_roundtrips() {
    let codec = Codec::with_defaults();
    assert_roundtrip(&codec, Value::None);
    assert_roundtrip(&codec, Value::Bool(false));
    assert_roundtrip(&codec, Value::Int(-12345));
    assert_roundtrip(&codec, Value::Float(3.25));
    assert_roundtrip(&codec, Value::Str("hello".into()));
    assert_roundtrip(&codec, Value::Complex { re: 3.0, im: -4.0 });
}

#[test]
fn test_nonfinite_float_roundtrips() {
    let codec = Codec::with_defaults();
    assert_roundtrip(&codec, Value::Float(f64::INFINITY));
    assert_roundtrip(&codec, Value::Float(f64::NEG_INFINITY));
    match roundtrip(&codec, &Value::Float(f64::NAN)) {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn test_container_roundtrips() {
    let codec = Codec::with_defaults();
    assert_roundtrip(
        &codec,
        Value::List(vec![
            Value::Int(1),
            Value::List(vec![Value::Str("nested".into()), Value::None]),
        ]),
    );
    assert_roundtrip(
        &codec,
        Value::Tuple(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::Str("abc".into()),
            Value::None,
            Value::Bool(true),
        ]),
    );

    let mut entries = BTreeMap::new();
    entries.insert("alpha".into(), Value::Int(1));
    entries.insert("beta".into(), Value::Tuple(vec![Value::Bool(true)]));
    assert_roundtrip(&codec, Value::Dict(entries));
}

#[test]
fn test_plain_array_roundtrip() {
    let codec = Codec::with_defaults();
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
    assert_roundtrip(&codec, Value::Array(array));
}

#[test]
fn test_complex_array_roundtrip() {
    let codec = Codec::with_defaults();
    let array = NdArray::new(
        DType::Scalar(ScalarKind::Complex128),
        vec![2],
        vec![
            Value::Complex { re: 1.0, im: 2.0 },
            Value::Complex { re: -3.0, im: 0.5 },
        ],
    )
    .expect("array");
    assert_roundtrip(&codec, Value::Array(array));
}

#[test]
fn test_record_array_and_recarray_view() {
    let codec = Codec::with_defaults();
    let dtype = DType::Record {
        fields: vec![
            ("x".into(), DType::Scalar(ScalarKind::Int64)),
            ("y".into(), DType::Scalar(ScalarKind::Float64)),
        ],
    };
    let rows = vec![
        Value::Tuple(vec![Value::Int(1), Value::Float(0.5)]),
        Value::Tuple(vec![Value::Int(2), Value::Float(1.5)]),
    ];
    let plain = NdArray::new(dtype.clone(), vec![2], rows.clone()).expect("array");
    assert_roundtrip(&codec, Value::Array(plain));

    let records = NdArray::new(dtype, vec![2], rows)
        .expect("array")
        .with_view(ArrayView::Records);
    let decoded = roundtrip(&codec, &Value::Array(records.clone()));
    match decoded {
        Value::Array(a) => assert_eq!(a.view, ArrayView::Records),
        other => panic!("expected array, got {:?}", other),
    }
}

#[test]
fn test_masked_array_roundtrip() {
    let codec = Codec::with_defaults();
    let array = NdArray::new(
        DType::Scalar(ScalarKind::Int64),
        vec![3],
        vec![Value::Int(1), Value::Int(2), Value::Int(3)],
    )
    .expect("array")
    .with_mask(vec![false, true, false])
    .expect("mask");
    assert_roundtrip(&codec, Value::Array(array));
}

#[test]
fn test_nested_field_dtype_roundtrip() {
    let codec = Codec::with_defaults();
    let dtype = DType::Record {
        fields: vec![
            (
                "pos".into(),
                DType::Record {
                    fields: vec![
                        ("x".into(), DType::Scalar(ScalarKind::Float64)),
                        ("y".into(), DType::Scalar(ScalarKind::Float64)),
                    ],
                },
            ),
            ("id".into(), DType::Scalar(ScalarKind::Int64)),
        ],
    };
    assert_roundtrip(&codec, Value::Dtype(dtype.clone()));

    let rows = vec![Value::Tuple(vec![
        Value::Tuple(vec![Value::Float(1.0), Value::Float(2.0)]),
        Value::Int(7),
    ])];
    let array = NdArray::new(dtype, vec![1], rows).expect("array");
    assert_roundtrip(&codec, Value::Array(array));
}

#[test]
fn test_record_type_and_instance_roundtrip() {
    let codec = Codec::with_defaults();
    let rt = RecordType::new("Sample", "session.scratch", vec!["t".into(), "v".into()]);
    assert_roundtrip(&codec, Value::Type(TypeHandle::Record(rt.clone())));

    let record = RecordValue::new(rt, vec![Value::Float(0.25), Value::Int(9)]).expect("record");
    assert_roundtrip(&codec, Value::Record(record));
}

#[test]
fn test_named_type_and_callable_roundtrip() {
    let codec = Codec::with_defaults();
    assert_roundtrip(&codec, Value::Type(TypeHandle::named("ndarray", "numpy")));
    assert_roundtrip(
        &codec,
        Value::Callable(crate::value::CallableHandle::function("array", "numpy")),
    );
}

#[test]
fn test_exported_object_decodes_to_its_export() {
    #[derive(Debug)]
    struct Span {
        lo: f64,
        hi: f64,
    }
    impl WireExport for Span {
        fn type_name(&self) -> &str {
            "Span"
        }
        fn type_module(&self) -> &str {
            "host.axes"
        }
        fn wire_export(&self) -> Value {
            Value::Tuple(vec![Value::Float(self.lo), Value::Float(self.hi)])
        }
    }

    let mut builder = CodecBuilder::with_defaults();
    builder.register_type(TypeEntry::new("Span", "host.axes"));
    let codec = builder.build();

    let value = Value::Exported(ExportedValue::new(Span { lo: 0.0, hi: 2.5 }));
    let text = codec.encode(&value).expect("encode");
    assert!(text.contains("host.axes"));
    // factory-less path: the decoded value is the exported description
    assert_eq!(
        codec.decode(&text).expect("decode"),
        Value::Tuple(vec![Value::Float(0.0), Value::Float(2.5)])
    );
}

#[test]
fn test_array_from_nested_infers_dtype() {
    let codec = Codec::with_defaults();
    let nested = Value::List(vec![
        Value::List(vec![Value::Int(1), Value::Float(2.0)]),
        Value::List(vec![Value::Int(3), Value::Int(4)]),
    ]);
    let array = super::arrays::array_from_nested(&codec, nested, None).expect("array");
    assert_eq!(array.shape, vec![2, 2]);
    assert_eq!(array.dtype, DType::Scalar(ScalarKind::Float64));
    assert_eq!(array.data[0], Value::Float(1.0));

    // ragged input is rejected
    let ragged = Value::List(vec![
        Value::List(vec![Value::Int(1)]),
        Value::List(vec![Value::Int(2), Value::Int(3)]),
    ]);
    assert!(super::arrays::array_from_nested(&codec, ragged, None).is_err());
}

#[test]
fn test_encode_is_idempotent_across_decode() {
    let codec = Codec::with_defaults();
    let values = [
        Value::Tuple(vec![Value::Int(1), Value::Str("a".into())]),
        Value::Complex { re: 1.0, im: 2.0 },
        Value::Array(
            NdArray::new(
                DType::Scalar(ScalarKind::Int64),
                vec![2],
                vec![Value::Int(4), Value::Int(5)],
            )
            .expect("array"),
        ),
    ];
    for value in values {
        let first = codec.encode(&value).expect("encode");
        let again = codec
            .encode(&codec.decode(&first).expect("decode"))
            .expect("re-encode");
        assert_eq!(first, again);
    }
}
