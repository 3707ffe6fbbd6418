//! # Dynamic Values
//!
//! The value model consumed by the validation engine. A [`Value`] is the
//! "unknown" input at a trust boundary: anything a host framework can hand
//! over, before any check has been applied to it.
//!
//! ## Kinds
//!
//! Besides the JSON-compatible kinds, the model has:
//!
//! - `Undefined`: the absence of a value (a missing object field, an
//!   unset parameter). Distinct from `Null`.
//! - `Opaque`: an arbitrary host value carried by reference, used by
//!   nominal membership checks such as
//!   [`instance_of`](crate::combinators::instance_of).
//!
//! ## Display Safety
//!
//! [`ValueKind`] is the only information about a value that ever reaches
//! an error message. It never inspects contents.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Largest integer exactly representable as an `f64` (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Smallest integer exactly representable as an `f64` (-(2^53 - 1)).
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// A value of unknown shape.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value at all.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. All numbers share one IEEE-754 double representation.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A mapping from field names to values.
    Object(BTreeMap<String, Value>),
    /// A host value that is not representable as data.
    Opaque(Opaque),
}

/// Coarse classification of a [`Value`], safe to show to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Anything that is not plain data.
    Unknown,
    /// A non-array, non-null object.
    Object,
    /// An array.
    Array,
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
}

impl ValueKind {
    /// The lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared, type-erased host value.
///
/// Two `Opaque` values are equal only if they point at the same allocation.
#[derive(Clone)]
pub struct Opaque {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wrap a host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the inner value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns true if the inner value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Full type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>", self.type_name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Wrap a host value as [`Value::Opaque`].
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Opaque::new(value))
    }

    /// Build an object from `(field, value)` pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Classify the value without looking at its contents.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
            Self::Opaque(_) => ValueKind::Unknown,
        }
    }

    /// Returns true for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns the number if this is a [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields if this is a [`Value::Object`].
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Field lookup. Missing fields and non-objects yield `Undefined`.
    pub fn get(&self, field: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        match self {
            Self::Object(fields) => fields.get(field).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Borrow the host value if this is an `Opaque` holding a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(o) => o.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Lossy for the kinds JSON cannot express: `Undefined` and `Opaque`
    /// become `null` (and `Undefined` object fields are dropped), non-finite
    /// numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null | Self::Opaque(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Self::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Integral numbers in the safe range serialize as JSON integers so that
/// integer targets deserialize cleanly.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n) {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null | Self::Opaque(_) => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => number_to_json(*n).serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(fields) => {
                let defined = fields.iter().filter(|(_, v)| !v.is_undefined());
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in defined {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(fields) => {
                Self::Object(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Self::from(json.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Marker;

    #[test]
    fn kind_classification() {
        assert_eq!(Value::Undefined.kind(), ValueKind::Undefined);
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::from(f64::NAN).kind(), ValueKind::Number);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from(json!([1, 2])).kind(), ValueKind::Array);
        assert_eq!(Value::from(json!({"a": 1})).kind(), ValueKind::Object);
        assert_eq!(Value::opaque(Marker).kind(), ValueKind::Unknown);
    }

    #[test]
    fn value_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ValueKind::Undefined).unwrap(), json!("undefined"));
        assert_eq!(ValueKind::Boolean.to_string(), "boolean");
    }

    #[test]
    fn get_missing_field_is_undefined() {
        let v = Value::from(json!({"name": "x"}));
        assert_eq!(v.get("name"), &Value::from("x"));
        assert!(v.get("age").is_undefined());
        assert!(Value::Null.get("age").is_undefined());
    }

    #[test]
    fn to_json_drops_undefined_fields() {
        let v = Value::object([("a", Value::from(1)), ("b", Value::Undefined)]);
        assert_eq!(v.to_json(), json!({"a": 1}));
    }

    #[test]
    fn to_json_keeps_integers_integral() {
        assert_eq!(Value::from(26).to_json(), json!(26));
        assert!(Value::from(26).to_json().is_i64());
        assert_eq!(Value::from(2.5).to_json(), json!(2.5));
        assert_eq!(Value::from(f64::INFINITY).to_json(), json!(null));
    }

    #[test]
    fn serialize_matches_to_json() {
        let v = Value::from(json!({"list": [1, "two", null], "flag": false}));
        assert_eq!(serde_json::to_value(&v).unwrap(), v.to_json());
    }

    #[test]
    fn opaque_equality_is_identity() {
        let a = Value::opaque(Marker);
        let b = a.clone();
        let c = Value::opaque(Marker);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.downcast_ref::<Marker>().is_some());
        assert!(a.downcast_ref::<String>().is_none());
    }
}
