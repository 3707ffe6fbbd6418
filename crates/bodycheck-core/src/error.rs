//! # Error Types
//!
//! Two layers, both built on `thiserror`:
//!
//! - [`ValidationError`]: a value did not conform to a schema. Built once
//!   at the point of mismatch and never modified afterwards. Its message
//!   and derived fields are safe to show to end users: the only thing
//!   taken from the offending value is its coarse [`ValueKind`].
//! - [`Error`]: everything the engine can return. Mismatches are one
//!   variant; programmer errors (invalid schemas, runaway nesting) and
//!   custom-validator internal failures are the others, and are never
//!   reinterpreted as mismatches.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::path::{pretty_path, Path};
use crate::pretty::pretty_schema;
use crate::schema::Schema;
use crate::value::{Value, ValueKind};

/// Base indentation and increment used for [`ValidationError::pretty_schema`].
const ERROR_SCHEMA_INDENT: usize = 2;

/// A value did not match the schema expected at `path`.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ValidationError {
    path: Path,
    pretty_path: String,
    schema: Schema,
    pretty_schema: String,
    value_type: ValueKind,
    message: String,
}

impl ValidationError {
    /// Build an error from the mismatched path, the expected schema and the
    /// value that was found. Only the value's kind is retained.
    pub fn new(path: Path, schema: Schema, value: &Value) -> Self {
        let value_type = value.kind();
        let pretty_path = pretty_path(&path);
        let pretty_schema = pretty_schema(&schema, ERROR_SCHEMA_INDENT, ERROR_SCHEMA_INDENT);
        let message = format!(
            "validation error on field '{pretty_path}'\n  expected '{pretty_schema}'\n  got '{value_type}'"
        );
        Self {
            path,
            pretty_path,
            schema,
            pretty_schema,
            value_type,
            message,
        }
    }

    /// Path of the mismatched field.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// [`path`](Self::path) rendered with [`pretty_path`].
    pub fn pretty_path(&self) -> &str {
        &self.pretty_path
    }

    /// Schema expected at [`path`](Self::path).
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// [`schema`](Self::schema) rendered with a base indentation of 2 and an
    /// increment of 2. Use [`pretty_schema`] directly for other layouts.
    pub fn pretty_schema(&self) -> &str {
        &self.pretty_schema
    }

    /// Coarse kind of the value that was found.
    pub fn value_type(&self) -> ValueKind {
        self.value_type
    }

    /// Three-line human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Display-safe body for host frameworks. The raw schema is not included.
impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("ValidationError", 5)?;
        body.serialize_field("path", &self.path)?;
        body.serialize_field("pretty_path", &self.pretty_path)?;
        body.serialize_field("pretty_schema", &self.pretty_schema)?;
        body.serialize_field("value_type", &self.value_type)?;
        body.serialize_field("message", &self.message)?;
        body.end()
    }
}

/// Error returned by the validation engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The value did not conform to the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A schema that is none of the recognized shapes. A bug in schema
    /// authoring, not in the data.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Nesting went past the engine's depth limit.
    #[error("schema nesting exceeds the maximum depth of {max_depth} at '{path}'")]
    DepthLimitExceeded {
        /// Path at which the limit was hit.
        path: Path,
        /// The configured limit.
        max_depth: usize,
    },

    /// A custom validator failed for a reason other than a mismatch.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),

    /// The validated value could not be deserialized into the requested type.
    #[error("narrowing to target type failed: {0}")]
    Narrowing(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an internal custom-validator failure.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    /// Shorthand for a mismatch at `path`.
    pub fn mismatch(path: &Path, schema: Schema, value: &Value) -> Self {
        Self::Validation(ValidationError::new(path.clone(), schema, value))
    }

    /// Returns the mismatch if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true for [`Error::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
