// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array reconstruction: the plain array factory and the dedicated paths
//! for the structurally special array factories.

use crate::codec::Codec;
use crate::resolve::{CallArgs, FactoryError};
use crate::value::{DType, NdArray, ScalarKind, Value};

type FactoryResult = std::result::Result<Value, FactoryError>;

/// Plain array factory: `(nested_data, dtype=...)`.
pub(crate) fn array_factory(_codec: &Codec, args: CallArgs) -> FactoryResult {
    let (shape, flat) = flatten(args.pos_arg(0)?)?;
    let dtype = match args.kw_arg("dtype") {
        Some(Value::Dtype(d)) => d.clone(),
        Some(Value::Str(code)) => parse_scalar(code)?,
        Some(other) => {
            return Err(FactoryError::new(format!(
                "dtype argument is {}, not a dtype",
                other.category()
            )))
        }
        None => infer_dtype(&flat),
    };
    build_array(dtype, shape, flat)
}

/// Dtype reconstruction: a scalar code, or a list of `(name, dtype)`
/// pairs for named/typed fields (field dtypes nest).
pub(crate) fn reconstruct_dtype(args: &CallArgs) -> FactoryResult {
    Ok(Value::Dtype(dtype_from_value(args.pos_arg(0)?)?))
}

fn dtype_from_value(value: &Value) -> std::result::Result<DType, FactoryError> {
    match value {
        Value::Dtype(d) => Ok(d.clone()),
        Value::Str(code) => match ScalarKind::parse(code) {
            Some(kind) => Ok(DType::Scalar(kind)),
            None => Err(FactoryError::new(format!("unknown dtype code '{}'", code))),
        },
        Value::List(pairs) | Value::Tuple(pairs) => {
            let mut fields = Vec::with_capacity(pairs.len());
            for pair in pairs {
                let items = pair
                    .as_items()
                    .filter(|p| p.len() == 2)
                    .ok_or_else(|| FactoryError::new("field dtype entry is not a (name, dtype) pair"))?;
                let name = items[0]
                    .as_str()
                    .ok_or_else(|| FactoryError::new("field name is not a string"))?;
                fields.push((name.to_owned(), dtype_from_value(&items[1])?));
            }
            Ok(DType::Record { fields })
        }
        other => Err(FactoryError::new(format!(
            "cannot build a dtype from {}",
            other.category()
        ))),
    }
}

/// Record-array reconstruction: rows of per-field values against an
/// already-decoded record dtype.
pub(crate) fn reconstruct_record_array(dtype: DType, args: &CallArgs) -> FactoryResult {
    if !dtype.is_record() {
        return Err(FactoryError::new("record array requires a field dtype"));
    }
    let rows = args
        .pos_arg(0)?
        .as_items()
        .ok_or_else(|| FactoryError::new("record rows are not a sequence"))?;
    let data: std::result::Result<Vec<Value>, FactoryError> =
        rows.iter().map(|row| coerce(row.clone(), &dtype)).collect();
    build_array(dtype, vec![rows.len()], data?)
}

/// Masked-array reconstruction: data plus a validity mask of equal shape.
pub(crate) fn reconstruct_masked_array(dtype: Option<DType>, args: &CallArgs) -> FactoryResult {
    let data = args
        .kw_arg("data")
        .ok_or_else(|| FactoryError::new("missing keyword argument 'data'"))?;
    let mask = args
        .kw_arg("mask")
        .ok_or_else(|| FactoryError::new("missing keyword argument 'mask'"))?;
    let (shape, flat) = flatten(data)?;
    let (mask_shape, mask_flat) = flatten(mask)?;
    if shape != mask_shape {
        return Err(FactoryError::new("mask shape does not match data shape"));
    }
    let mask: std::result::Result<Vec<bool>, FactoryError> = mask_flat
        .iter()
        .map(|v| {
            v.as_bool()
                .ok_or_else(|| FactoryError::new("mask element is not a bool"))
        })
        .collect();
    let dtype = dtype.unwrap_or_else(|| infer_dtype(&flat));
    match build_array(dtype, shape, flat)? {
        Value::Array(array) => array
            .with_mask(mask?)
            .map(Value::Array)
            .ok_or_else(|| FactoryError::new("mask length does not match data length")),
        _ => Err(FactoryError::new("array construction produced a non-array")),
    }
}

fn build_array(dtype: DType, shape: Vec<usize>, flat: Vec<Value>) -> FactoryResult {
    let coerced: std::result::Result<Vec<Value>, FactoryError> =
        flat.into_iter().map(|v| coerce(v, &dtype)).collect();
    NdArray::new(dtype, shape, coerced?)
        .map(Value::Array)
        .ok_or_else(|| FactoryError::new("element count does not fill the shape"))
}

/// Flatten nested lists row-major, validating rectangularity.
fn flatten(value: &Value) -> std::result::Result<(Vec<usize>, Vec<Value>), FactoryError> {
    match value.as_items() {
        None => Ok((Vec::new(), vec![value.clone()])),
        Some(items) => {
            let mut inner: Option<Vec<usize>> = None;
            let mut flat = Vec::new();
            for item in items {
                let (shape, values) = flatten(item)?;
                match &inner {
                    None => inner = Some(shape),
                    Some(prev) if *prev == shape => {}
                    Some(_) => return Err(FactoryError::new("nested list is ragged")),
                }
                flat.extend(values);
            }
            let mut shape = vec![items.len()];
            shape.extend(inner.unwrap_or_default());
            Ok((shape, flat))
        }
    }
}

/// Element dtype inferred from the data when none was recorded.
fn infer_dtype(flat: &[Value]) -> DType {
    if flat.is_empty() {
        return DType::Scalar(ScalarKind::Float64);
    }
    if flat.iter().all(|v| matches!(v, Value::Bool(_))) {
        return DType::Scalar(ScalarKind::Bool);
    }
    let mut kind = ScalarKind::Int64;
    for value in flat {
        match value {
            Value::Complex { .. } => return DType::Scalar(ScalarKind::Complex128),
            Value::Str(_) => return DType::Scalar(ScalarKind::Str),
            Value::Float(_) => kind = ScalarKind::Float64,
            _ => {}
        }
    }
    DType::Scalar(kind)
}

fn parse_scalar(code: &str) -> std::result::Result<DType, FactoryError> {
    ScalarKind::parse(code)
        .map(DType::Scalar)
        .ok_or_else(|| FactoryError::new(format!("unknown dtype code '{}'", code)))
}

/// Coerce one element to its declared dtype. Record dtypes coerce whole
/// rows (field dtypes may themselves be records).
fn coerce(value: Value, dtype: &DType) -> std::result::Result<Value, FactoryError> {
    match dtype {
        DType::Scalar(kind) => coerce_scalar(value, *kind),
        DType::Record { fields } => {
            let items = match value {
                Value::Tuple(items) | Value::List(items) => items,
                other => {
                    return Err(FactoryError::new(format!(
                        "record element is {}, not a sequence",
                        other.category()
                    )))
                }
            };
            if items.len() != fields.len() {
                return Err(FactoryError::new(format!(
                    "record element has {} values for {} fields",
                    items.len(),
                    fields.len()
                )));
            }
            let coerced: std::result::Result<Vec<Value>, FactoryError> = items
                .into_iter()
                .zip(fields)
                .map(|(item, (_, field_dtype))| coerce(item, field_dtype))
                .collect();
            Ok(Value::Tuple(coerced?))
        }
    }
}

fn coerce_scalar(value: Value, kind: ScalarKind) -> std::result::Result<Value, FactoryError> {
    let mismatch = |value: &Value| {
        FactoryError::new(format!(
            "element {} does not fit dtype {}",
            value.category(),
            kind.code()
        ))
    };
    match kind {
        ScalarKind::Bool => match value {
            Value::Bool(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
        ScalarKind::Int64 => match value {
            Value::Int(_) => Ok(value),
            Value::Bool(b) => Ok(Value::Int(i64::from(b))),
            other => Err(mismatch(&other)),
        },
        ScalarKind::Float64 => match value {
            Value::Float(_) => Ok(value),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            other => Err(mismatch(&other)),
        },
        ScalarKind::Complex128 => match value {
            Value::Complex { .. } => Ok(value),
            Value::Float(f) => Ok(Value::Complex { re: f, im: 0.0 }),
            Value::Int(i) => Ok(Value::Complex {
                re: i as f64,
                im: 0.0,
            }),
            other => Err(mismatch(&other)),
        },
        ScalarKind::Str => match value {
            Value::Str(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
    }
}
