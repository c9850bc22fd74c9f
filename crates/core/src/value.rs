//! Value types for document properties
//!
//! This module defines:
//! - Value: Tagged enum for every property value a document body can hold
//! - Properties: Ordered mapping from property name to value
//!
//! ## Value Model
//!
//! The Value enum has exactly 8 variants:
//! - Null, Bool, Int, Float, String, Bytes, Array, Object
//!
//! ### Type Rules
//!
//! - No implicit type coercions
//! - `Int(1) != Float(1.0)` - different types are NEVER equal
//! - `Bytes` are not `String`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//!
//! ## Sharing
//!
//! Nested objects are held behind `Arc`, so cloning a `Properties` map is
//! shallow. Writers never mutate a shared nested object in place; they build
//! a replacement map or go through `Arc::make_mut`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Wrapper key that marks a JSON object as encoded bytes
const BYTES_KEY: &str = "$bytes";

/// Ordered mapping from property name to value
///
/// Key order is deterministic so the encoded form of a body is stable.
pub type Properties = BTreeMap<String, Value>;

/// Dynamically-typed property value
///
/// ## Type Equality
///
/// Different types are NEVER equal, even if they contain the same "value":
/// - `Int(1) != Float(1.0)`
/// - `Bytes(b"hello") != String("hello")`
///
/// Float equality follows IEEE-754 semantics:
/// - `NaN != NaN`
/// - `-0.0 == 0.0`
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes, encoded as `{"$bytes": "<base64>"}` on the wire
    Bytes(Vec<u8>),
    /// Array of values
    Array(Vec<Value>),
    /// Nested mapping, shared until written
    Object(Arc<Properties>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Wrap a mapping as an object value
    pub fn object(properties: Properties) -> Self {
        Value::Object(Arc::new(properties))
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a boolean value
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this is an integer value
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if this is a float value
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this is a string value
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this is a bytes value
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &Properties if this is an Object value
    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the shared handle of an Object value
    ///
    /// Cloning the returned `Arc` keeps sharing the same mapping.
    pub fn as_object_arc(&self) -> Option<&Arc<Properties>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Maximum nesting depth of this value
    ///
    /// Returns 0 for scalars and counts nested objects/arrays.
    pub fn nesting_depth(&self) -> usize {
        match self {
            Value::Array(arr) => 1 + arr.iter().map(Value::nesting_depth).max().unwrap_or(0),
            Value::Object(obj) => 1 + obj.values().map(Value::nesting_depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Largest array length anywhere in this value
    pub fn max_array_len(&self) -> usize {
        match self {
            Value::Array(arr) => {
                let nested = arr.iter().map(Value::max_array_len).max().unwrap_or(0);
                arr.len().max(nested)
            }
            Value::Object(obj) => obj.values().map(Value::max_array_len).max().unwrap_or(0),
            _ => 0,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Properties> for Value {
    fn from(o: Properties) -> Self {
        Value::object(o)
    }
}

impl From<Arc<Properties>> for Value {
    fn from(o: Arc<Properties>) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// serde_json interop (wire form of a body)
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64 and non-integral numbers
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => match decode_bytes_wrapper(&obj) {
                Some(bytes) => Value::Bytes(bytes),
                None => Value::object(properties_from_json_map(obj)),
            },
        }
    }
}

/// Recognize `{"$bytes": "<base64>"}`; anything else stays a regular object
fn decode_bytes_wrapper(obj: &serde_json::Map<String, serde_json::Value>) -> Option<Vec<u8>> {
    if obj.len() != 1 {
        return None;
    }
    let encoded = obj.get(BYTES_KEY)?.as_str()?;
    BASE64.decode(encoded).ok()
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => {
                let mut wrapper = serde_json::Map::new();
                wrapper.insert(BYTES_KEY.to_string(), serde_json::Value::String(BASE64.encode(b)));
                serde_json::Value::Object(wrapper)
            }
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(properties_to_json_map(obj)),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        serde_json::Value::from(&v)
    }
}

/// Convert a decoded JSON object into a property mapping
pub fn properties_from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Properties {
    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

/// Convert a property mapping into a JSON object
pub fn properties_to_json_map(properties: &Properties) -> serde_json::Map<String, serde_json::Value> {
    properties
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
        .collect()
}
