//! # Schema Model
//!
//! The closed vocabulary of schema kinds understood by the engine. Every
//! schema is one of eight shapes; the engine dispatches on the shape with
//! an exhaustive `match`, so adding a kind forces every consumer (engine,
//! pretty-printer, descriptor parser) to handle it.
//!
//! Schemas are immutable once built. Custom validators are reference
//! counted, so cloning a schema never clones user logic.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::path::Path;
use crate::value::Value;

/// Declarative description of the shape a value must have.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Matches only `undefined`.
    Undefined,
    /// Matches only `null`.
    Null,
    /// Matches one exact boolean, number or string.
    Literal(Literal),
    /// Matches any value of a primitive kind.
    Type(TypeTag),
    /// Homogeneous array of any length.
    ArrayOf(Box<Schema>),
    /// Fixed-arity positional array.
    Tuple(Vec<Schema>),
    /// Structural object. Field order is used for display only.
    Record(Vec<(String, Schema)>),
    /// Validation expressed as code.
    Custom(CustomValidator),
}

/// An exact-value schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `true` or `false`.
    Bool(bool),
    /// A number. `NaN` is a usable literal and matches `NaN`.
    Number(f64),
    /// A string.
    String(String),
}

impl Literal {
    /// Strict equality against a value, with `NaN` matching `NaN`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool(expected), Value::Bool(found)) => expected == found,
            (Self::Number(expected), Value::Number(found)) => {
                expected == found || (expected.is_nan() && found.is_nan())
            }
            (Self::String(expected), Value::String(found)) => expected == found,
            _ => false,
        }
    }

    /// The literal as a [`Value`].
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(*n),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

/// Primitive kinds a [`Schema::Type`] can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Any string.
    String,
    /// Any number, including `NaN` and the infinities.
    Number,
    /// `true` or `false`.
    Boolean,
}

impl TypeTag {
    /// Returns true if the value is of this primitive kind.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }

    /// The type name used for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Signature shared by every custom validator: `(value, path) -> narrowed value`.
///
/// A mismatch must be reported as [`Error::Validation`] built with the same
/// `path`. Any other error is treated as an internal failure and passed
/// through untouched.
pub type ValidatorFn = dyn Fn(&Value, &Path) -> Result<Value, Error> + Send + Sync;

/// Display metadata attached to a [`CustomValidator`].
#[derive(Debug, Clone)]
pub struct CustomMetadata {
    /// Name shown in place of the validator.
    pub name: String,
    /// Schemas shown as arguments, e.g. the alternatives of `either`.
    pub child_schemas: Option<Vec<Schema>>,
    /// Separator placed between rendered child schemas.
    pub separator: String,
}

/// Name shown for custom validators without metadata.
pub const DEFAULT_CUSTOM_NAME: &str = "custom_validator";

impl CustomMetadata {
    /// Metadata with a name and no child schemas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            child_schemas: None,
            separator: ", ".to_string(),
        }
    }

    /// Metadata with child schemas rendered between parentheses.
    pub fn with_children(
        name: impl Into<String>,
        child_schemas: Vec<Schema>,
        separator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            child_schemas: Some(child_schemas),
            separator: separator.into(),
        }
    }
}

impl Default for CustomMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_CUSTOM_NAME)
    }
}

/// A schema expressed as executable logic, with optional display metadata.
#[derive(Clone)]
pub struct CustomValidator {
    func: Arc<ValidatorFn>,
    metadata: Option<Arc<CustomMetadata>>,
}

impl CustomValidator {
    /// Wrap a validation function. Without metadata the validator renders
    /// as `custom_validator`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value, &Path) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            metadata: None,
        }
    }

    /// Attach display metadata.
    pub fn with_metadata(mut self, metadata: CustomMetadata) -> Self {
        self.metadata = Some(Arc::new(metadata));
        self
    }

    /// Attach metadata carrying only a display name.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.with_metadata(CustomMetadata::new(name))
    }

    /// Display metadata, if any.
    pub fn metadata(&self) -> Option<&CustomMetadata> {
        self.metadata.as_deref()
    }

    /// Run the validator.
    pub fn call(&self, value: &Value, path: &Path) -> Result<Value, Error> {
        (self.func)(value, path)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.metadata().map_or(DEFAULT_CUSTOM_NAME, |m| m.name.as_str());
        f.debug_struct("CustomValidator").field("name", &name).finish_non_exhaustive()
    }
}

impl Schema {
    /// Any string.
    pub fn string() -> Self {
        Self::Type(TypeTag::String)
    }

    /// Any number.
    pub fn number() -> Self {
        Self::Type(TypeTag::Number)
    }

    /// Any boolean.
    pub fn boolean() -> Self {
        Self::Type(TypeTag::Boolean)
    }

    /// Exactly `null`.
    pub fn null() -> Self {
        Self::Null
    }

    /// Exactly `undefined`.
    pub fn undefined() -> Self {
        Self::Undefined
    }

    /// Exactly the given boolean, number or string.
    pub fn literal(literal: impl Into<Literal>) -> Self {
        Self::Literal(literal.into())
    }

    /// Array whose every element matches `element`.
    pub fn array(element: impl Into<Schema>) -> Self {
        Self::ArrayOf(Box::new(element.into()))
    }

    /// Array of exactly `elements.len()` positional elements.
    pub fn tuple<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Self::Tuple(elements.into_iter().map(Into::into).collect())
    }

    /// Object with the given required fields.
    pub fn record<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        Self::Record(fields.into_iter().map(|(k, s)| (k.into(), s.into())).collect())
    }

    /// Custom validator without metadata.
    pub fn custom<F>(func: F) -> Self
    where
        F: Fn(&Value, &Path) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::Custom(CustomValidator::new(func))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Literal> for Schema {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<TypeTag> for Schema {
    fn from(tag: TypeTag) -> Self {
        Self::Type(tag)
    }
}

impl From<CustomValidator> for Schema {
    fn from(validator: CustomValidator) -> Self {
        Self::Custom(validator)
    }
}

impl From<bool> for Schema {
    fn from(b: bool) -> Self {
        Self::Literal(b.into())
    }
}

impl From<f64> for Schema {
    fn from(n: f64) -> Self {
        Self::Literal(n.into())
    }
}

impl From<i32> for Schema {
    fn from(n: i32) -> Self {
        Self::Literal(n.into())
    }
}

impl From<i64> for Schema {
    fn from(n: i64) -> Self {
        Self::Literal(n.into())
    }
}

impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Self::Literal(s.into())
    }
}

impl From<String> for Schema {
    fn from(s: String) -> Self {
        Self::Literal(s.into())
    }
}
