//! JSON bridge
//!
//! Converts values to and from `serde_json` with `JSON.stringify` /
//! `JSON.parse` semantics. Round-tripping through JSON is a lossy copy:
//! patterns turn into `{}`, callables into `null` (or disappear as object
//! members), dates into ISO strings, classes into plain objects, and cyclic
//! graphs cannot be encoded at all. Use [`crate::deep_clone`] when a faithful
//! copy is needed.

use crate::error::JsonError;
use crate::object::{JsArray, JsObject};
use crate::value::Value;
use serde_json::{Map, Number};

/// Largest integer a double represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encode a value. `Ok(None)` for values JSON cannot hold (`undefined`, callables).
pub fn to_json(value: &Value) -> Result<Option<serde_json::Value>, JsonError> {
    let mut stack = Vec::new();
    encode(value, &mut stack)
}

/// Decode a JSON document into fresh values
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => {
            Value::array(JsArray::from_vec(items.iter().map(from_json).collect()))
        }
        serde_json::Value::Object(members) => {
            let obj = JsObject::new();
            for (key, member) in members {
                obj.set(key, from_json(member));
            }
            Value::object(obj)
        }
    }
}

/// `JSON.parse(JSON.stringify(value))`
pub fn json_round_trip(value: &Value) -> Result<Value, JsonError> {
    Ok(to_json(value)?.as_ref().map_or(Value::Undefined, from_json))
}

fn encode(value: &Value, stack: &mut Vec<usize>) -> Result<Option<serde_json::Value>, JsonError> {
    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => encode_number(*n),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Date(date) => serde_json::Value::String(date.to_iso_string()),
        // Patterns have no enumerable own data
        Value::RegExp(_) => serde_json::Value::Object(Map::new()),
        Value::Array(arr) => {
            let addr = push_frame(value, stack)?;
            let mut items = Vec::with_capacity(arr.len());
            for element in arr.elements() {
                items.push(encode(&element, stack)?.unwrap_or(serde_json::Value::Null));
            }
            stack.retain(|a| *a != addr);
            serde_json::Value::Array(items)
        }
        Value::Object(obj) => {
            let addr = push_frame(value, stack)?;
            let mut members = Map::new();
            for (key, member) in obj.own_enumerable_entries() {
                if let Some(json) = encode(&member, stack)? {
                    members.insert(key.to_string(), json);
                }
            }
            stack.retain(|a| *a != addr);
            serde_json::Value::Object(members)
        }
    };
    Ok(Some(json))
}

fn push_frame(value: &Value, stack: &mut Vec<usize>) -> Result<usize, JsonError> {
    let addr = value.heap_addr().ok_or(JsonError::Circular)?;
    if stack.contains(&addr) {
        return Err(JsonError::Circular);
    }
    stack.push(addr);
    Ok(addr)
}

fn encode_number(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}
