//! # Validation Engine
//!
//! Recursive matcher from an unknown [`Value`] to a narrowed one.
//!
//! ## Dispatch
//!
//! The schema kind alone selects the check; the shape of the value never
//! does. There is no backtracking between kinds and no aggregation: the
//! first mismatch at any depth aborts the whole call.
//!
//! | Schema       | Accepts                                                 |
//! |--------------|---------------------------------------------------------|
//! | `Undefined`  | exactly `undefined`                                     |
//! | `Null`       | exactly `null`                                          |
//! | `Literal`    | a strictly equal value (`NaN` matches `NaN`)            |
//! | `Type`       | any value of that primitive kind                        |
//! | `ArrayOf`    | an array whose every element matches                    |
//! | `Tuple`      | an array of exactly that length, matched by position    |
//! | `Record`     | an object with every declared field and no extra fields |
//! | `Custom`     | whatever the validator returns                          |
//!
//! ## Extra Fields
//!
//! Object fields not declared by a record schema are checked against the
//! `undefined` schema: an extra field that is present and defined is a
//! mismatch at that field's path.
//!
//! ## Resources
//!
//! Recursion follows the schema, so depth is bounded by schema nesting.
//! Paths longer than [`MAX_DEPTH`] fail with [`Error::DepthLimitExceeded`]
//! instead of exhausting the stack.

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::path::Path;
use crate::schema::Schema;
use crate::value::Value;

/// Maximum path length, in segments, the engine will descend to.
///
/// The limit applies to the whole path, including the segments of the
/// starting path handed to [`validate_at`]. Custom validators re-enter the
/// engine with the path they were given, so an absolute limit also bounds
/// recursion that goes through them.
pub const MAX_DEPTH: usize = 256;

/// Schema applied to object fields a record does not declare.
static UNDECLARED_FIELD: Schema = Schema::Undefined;

/// Validate `value` against `schema`, rooted at the `body` path.
///
/// # Errors
///
/// Returns [`Error::Validation`] at the first mismatch. Custom validator
/// failures are returned unchanged.
///
/// ```
/// use bodycheck_core::{either, safe_integer, validate, Schema, Value};
/// use serde_json::json;
///
/// let schema = Schema::record([
///     ("name", Schema::string()),
///     ("role", either(["user", "admin"])),
///     ("age", safe_integer()),
///     ("coordinates", Schema::tuple([Schema::number(), Schema::number()])),
/// ]);
/// let body = Value::from(json!({
///     "name": "Ada",
///     "role": "admin",
///     "age": 36,
///     "coordinates": [51.5, -0.12],
/// }));
/// let user = validate(&body, &schema).unwrap();
/// assert_eq!(user, body);
/// ```
pub fn validate(value: &Value, schema: &Schema) -> Result<Value, Error> {
    validate_at(value, schema, &Path::body())
}

/// Validate `value` against `schema` with an explicit starting path.
///
/// Mismatches are logged at `debug` level with their path and value kind.
/// The starting path counts towards [`MAX_DEPTH`].
pub fn validate_at(value: &Value, schema: &Schema, path: &Path) -> Result<Value, Error> {
    check(value, schema, path).map_err(|e| {
        if let Some(mismatch) = e.as_validation() {
            tracing::debug!(
                path = %mismatch.pretty_path(),
                value_type = %mismatch.value_type(),
                "value rejected at boundary"
            );
        }
        e
    })
}

/// The recursive matcher behind [`validate_at`], without boundary logging.
pub(crate) fn check(value: &Value, schema: &Schema, path: &Path) -> Result<Value, Error> {
    if path.len() > MAX_DEPTH {
        return Err(Error::DepthLimitExceeded {
            path: path.clone(),
            max_depth: MAX_DEPTH,
        });
    }

    match schema {
        Schema::Undefined => match value {
            Value::Undefined => Ok(Value::Undefined),
            _ => Err(Error::mismatch(path, schema.clone(), value)),
        },
        Schema::Null => match value {
            Value::Null => Ok(Value::Null),
            _ => Err(Error::mismatch(path, schema.clone(), value)),
        },
        Schema::Literal(literal) => {
            if literal.matches(value) {
                Ok(value.clone())
            } else {
                Err(Error::mismatch(path, schema.clone(), value))
            }
        }
        Schema::Type(tag) => {
            if tag.matches(value) {
                Ok(value.clone())
            } else {
                Err(Error::mismatch(path, schema.clone(), value))
            }
        }
        Schema::ArrayOf(element) => {
            let Value::Array(items) = value else {
                return Err(Error::mismatch(path, schema.clone(), value));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| check(item, element, &path.child(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::Tuple(elements) => {
            let items = match value {
                Value::Array(items) if items.len() == elements.len() => items,
                _ => return Err(Error::mismatch(path, schema.clone(), value)),
            };
            items
                .iter()
                .zip(elements)
                .enumerate()
                .map(|(i, (item, element))| check(item, element, &path.child(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::Record(fields) => {
            let Value::Object(object) = value else {
                return Err(Error::mismatch(path, schema.clone(), value));
            };

            for (name, field_schema) in fields {
                if !object.contains_key(name) {
                    return Err(Error::mismatch(
                        &path.child(name.as_str()),
                        field_schema.clone(),
                        &Value::Undefined,
                    ));
                }
            }

            object
                .iter()
                .map(|(name, field_value)| {
                    let field_schema = fields
                        .iter()
                        .find(|(declared, _)| declared == name)
                        .map_or(&UNDECLARED_FIELD, |(_, s)| s);
                    check(field_value, field_schema, &path.child(name.as_str()))
                        .map(|v| (name.clone(), v))
                })
                .collect::<Result<_, _>>()
                .map(Value::Object)
        }
        Schema::Custom(validator) => validator.call(value, path),
    }
}

/// Validate, then deserialize the narrowed value into `T`.
///
/// `undefined` object fields are omitted before deserialization, so they
/// map onto `Option` fields as `None`.
///
/// # Errors
///
/// Returns [`Error::Narrowing`] when `T` does not accept the validated
/// shape, in addition to everything [`validate`] returns.
pub fn validate_into<T: DeserializeOwned>(value: &Value, schema: &Schema) -> Result<T, Error> {
    validate_into_at(value, schema, &Path::body())
}

/// [`validate_into`] with an explicit starting path.
pub fn validate_into_at<T: DeserializeOwned>(
    value: &Value,
    schema: &Schema,
    path: &Path,
) -> Result<T, Error> {
    let narrowed = validate_at(value, schema, path)?;
    Ok(serde_json::from_value(narrowed.to_json())?)
}
