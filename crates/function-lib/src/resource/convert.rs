//! Conversion between protobuf `Struct` values and JSON
//!
//! The host ships every resource as a `google.protobuf.Struct`. Numbers in a
//! Struct are always doubles; integral ones are turned back into JSON
//! integers so quantities and replica counts round-trip cleanly.

use crate::error::{FunctionError, FunctionResult};
use prost_types::value::Kind;
use prost_types::{ListValue, Struct};
use serde_json::{Map, Number, Value};

/// Largest integer a double represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a Struct into a JSON object
pub fn struct_to_map(s: &Struct) -> FunctionResult<Map<String, Value>> {
    s.fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), proto_to_json(value)?)))
        .collect()
}

/// Convert a Struct into a JSON value (always an object)
pub fn struct_to_value(s: &Struct) -> FunctionResult<Value> {
    struct_to_map(s).map(Value::Object)
}

/// Convert a JSON object into a Struct
pub fn map_to_struct(map: &Map<String, Value>) -> Struct {
    Struct {
        fields: map
            .iter()
            .map(|(key, value)| (key.clone(), json_to_proto(value)))
            .collect(),
    }
}

/// Convert a JSON value into a Struct. Only objects are accepted.
pub fn value_to_struct(value: &Value) -> FunctionResult<Struct> {
    match value {
        Value::Object(map) => Ok(map_to_struct(map)),
        other => Err(FunctionError::Conversion(format!(
            "expected a JSON object, got {}",
            json_type_name(other)
        ))),
    }
}

fn proto_to_json(value: &prost_types::Value) -> FunctionResult<Value> {
    let Some(kind) = value.kind.as_ref() else {
        return Ok(Value::Null);
    };

    Ok(match kind {
        Kind::NullValue(_) => Value::Null,
        Kind::BoolValue(b) => Value::Bool(*b),
        Kind::StringValue(s) => Value::String(s.clone()),
        Kind::NumberValue(n) => Value::Number(number_from_f64(*n)?),
        Kind::StructValue(s) => struct_to_value(s)?,
        Kind::ListValue(list) => Value::Array(
            list.values
                .iter()
                .map(proto_to_json)
                .collect::<FunctionResult<Vec<_>>>()?,
        ),
    })
}

fn json_to_proto(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => Kind::NullValue(0),
        Value::Bool(b) => Kind::BoolValue(*b),
        Value::String(s) => Kind::StringValue(s.clone()),
        Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_proto).collect(),
        }),
        Value::Object(map) => Kind::StructValue(map_to_struct(map)),
    };

    prost_types::Value { kind: Some(kind) }
}

fn number_from_f64(n: f64) -> FunctionResult<Number> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Number::from(n as i64));
    }

    Number::from_f64(n)
        .ok_or_else(|| FunctionError::Conversion(format!("number {} has no JSON representation", n)))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
