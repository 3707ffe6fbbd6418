//! # Combinators and Primitive Validators
//!
//! Ready-made custom validators. Each one follows the same calling
//! convention as user-written validators (`(value, path) -> narrowed value`)
//! and carries [`CustomMetadata`] so that errors render it by name.

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::schema::{CustomMetadata, CustomValidator, Schema};
use crate::validate::check;
use crate::value::{Value, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER};

/// Accept the first alternative that matches, tried in declaration order.
///
/// When no alternative matches, the error names the `either` itself as the
/// expected schema, e.g. `either(number | string)`. Only mismatches are
/// caught; any other failure from an alternative aborts immediately.
///
/// ```
/// use bodycheck_core::{either, validate, Schema, Value};
///
/// let id = either([Schema::number(), Schema::string()]);
/// assert!(validate(&Value::from("abc"), &id).is_ok());
/// assert!(validate(&Value::Null, &id).is_err());
/// ```
pub fn either<I, S>(schemas: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::Custom(either_validator(schemas.into_iter().map(Into::into).collect()))
}

fn either_validator(schemas: Vec<Schema>) -> CustomValidator {
    let alternatives: Arc<[Schema]> = schemas.clone().into();
    CustomValidator::new(move |value, path| {
        for (i, alternative) in alternatives.iter().enumerate() {
            match check(value, alternative, path) {
                Ok(narrowed) => return Ok(narrowed),
                Err(Error::Validation(rejected)) => {
                    tracing::trace!(
                        alternative = i,
                        path = %rejected.pretty_path(),
                        "either alternative rejected"
                    );
                }
                Err(other) => return Err(other),
            }
        }
        Err(Error::mismatch(
            path,
            Schema::Custom(either_validator(alternatives.to_vec())),
            value,
        ))
    })
    .with_metadata(CustomMetadata::with_children("either", schemas, " | "))
}

/// Apply every schema in sequence, feeding each narrowed output into the
/// next schema.
///
/// Sequential narrowing of record schemas is unsound: the first record
/// rejects fields that only a later record declares. Prefer a single
/// record or a custom validator.
#[deprecated(
    note = "sequential narrowing is unsound for record schemas; use a single record or a custom validator"
)]
pub fn all<I, S>(schemas: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    let schemas: Vec<Schema> = schemas.into_iter().map(Into::into).collect();
    let steps: Arc<[Schema]> = schemas.clone().into();
    Schema::Custom(
        CustomValidator::new(move |value, path| {
            let mut current = value.clone();
            for step in steps.iter() {
                current = check(&current, step, path)?;
            }
            Ok(current)
        })
        .with_metadata(CustomMetadata::with_children("all", schemas, " & ")),
    )
}

/// A number that is an integer within `±(2^53 - 1)`.
///
/// ```
/// use bodycheck_core::{safe_integer, validate, Value};
///
/// assert!(validate(&Value::from(4), &safe_integer()).is_ok());
/// assert!(validate(&Value::from(4.5), &safe_integer()).is_err());
/// assert!(validate(&Value::from(9_007_199_254_740_992.0), &safe_integer()).is_err());
/// ```
pub fn safe_integer() -> Schema {
    Schema::Custom(
        CustomValidator::new(|value, path| match value {
            Value::Number(n) if is_safe_integer(*n) => Ok(value.clone()),
            _ => Err(Error::mismatch(path, safe_integer(), value)),
        })
        .named("safeInteger"),
    )
}

/// Same test as JavaScript's `Number.isSafeInteger`.
pub fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.trunc() == n && (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n)
}

/// An opaque host value of type `T`.
///
/// Plain data (numbers, objects, `null`, ...) never matches.
pub fn instance_of<T: Any>() -> Schema {
    let name = format!("instanceOf({})", short_type_name::<T>());
    Schema::Custom(
        CustomValidator::new(|value, path| match value {
            Value::Opaque(o) if o.is::<T>() => Ok(value.clone()),
            _ => Err(Error::mismatch(path, instance_of::<T>(), value)),
        })
        .named(name),
    )
}

fn short_type_name<T: Any>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Accept anything. Identical to [`unknown`] at runtime.
pub fn any() -> Schema {
    Schema::Custom(CustomValidator::new(|value, _| Ok(value.clone())).named("any"))
}

/// Accept anything without narrowing it.
pub fn unknown() -> Schema {
    Schema::Custom(CustomValidator::new(|value, _| Ok(value.clone())).named("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use crate::value::ValueKind;
    use serde_json::json;

    struct Foo;
    struct Bar;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn either_accepts_any_alternative() {
        let schema = either([Schema::number(), Schema::string()]);
        assert_eq!(validate(&v(json!(3281.8)), &schema).unwrap(), v(json!(3281.8)));
        assert_eq!(validate(&v(json!("dhiqzd")), &schema).unwrap(), v(json!("dhiqzd")));
    }

    #[test]
    fn either_failure_names_the_combinator() {
        let schema = either([Schema::number(), Schema::string()]);
        let err = validate(&Value::Null, &schema).unwrap_err();
        let e = err.as_validation().unwrap();
        assert_eq!(e.pretty_path(), "body");
        assert_eq!(e.pretty_schema(), "either(number | string)");
        assert_eq!(e.value_type(), ValueKind::Null);
        assert!(matches!(e.schema(), Schema::Custom(_)));
    }

    #[test]
    fn either_returns_first_success() {
        let schema = either([
            Schema::custom(|_, _| Ok(Value::from("first"))),
            Schema::custom(|_, _| Ok(Value::from("second"))),
        ]);
        assert_eq!(validate(&Value::Null, &schema).unwrap(), Value::from("first"));
    }

    #[test]
    fn either_stops_on_internal_failure() {
        let schema = either([
            Schema::custom(|_, _| Err(Error::custom("boom"))),
            Schema::string(),
        ]);
        let err = validate(&v(json!("would match")), &schema).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn either_literals_as_enum() {
        let role = either(["user", "admin"]);
        validate(&v(json!("admin")), &role).unwrap();
        let err = validate(&v(json!("root")), &role).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().pretty_schema(),
            "either(\"user\" | \"admin\")"
        );
    }

    #[test]
    fn either_with_undefined_models_optional_field() {
        let schema = Schema::record([
            ("name", Schema::string()),
            ("role", either([Schema::Undefined, "user".into(), "admin".into()])),
        ]);
        let value = Value::object([("name", Value::from("x")), ("role", Value::Undefined)]);
        assert_eq!(validate(&value, &schema).unwrap(), value);
    }

    #[test]
    #[allow(deprecated)]
    fn all_threads_narrowed_values() {
        let trimmed = Schema::custom(|value, path| match value.as_str() {
            Some(s) => Ok(Value::from(s.trim())),
            None => Err(Error::mismatch(path, Schema::string(), value)),
        });
        let non_empty = Schema::custom(|value, path| match value.as_str() {
            Some(s) if !s.is_empty() => Ok(value.clone()),
            _ => Err(Error::mismatch(path, Schema::string(), value)),
        });
        let schema = all([trimmed, non_empty]);
        assert_eq!(validate(&v(json!("  hi ")), &schema).unwrap(), v(json!("hi")));
        assert!(validate(&v(json!("   ")), &schema).is_err());
        assert_eq!(
            crate::pretty::pretty_schema_default(&schema),
            "all(custom_validator & custom_validator)"
        );
    }

    #[test]
    fn safe_integer_bounds() {
        let schema = safe_integer();
        validate(&v(json!(43)), &schema).unwrap();
        validate(&v(json!(-82)), &schema).unwrap();
        validate(&Value::from(MAX_SAFE_INTEGER), &schema).unwrap();
        validate(&Value::from(MIN_SAFE_INTEGER), &schema).unwrap();

        let err = validate(&Value::from(MAX_SAFE_INTEGER + 1.0), &schema).unwrap_err();
        assert_eq!(err.as_validation().unwrap().pretty_schema(), "safeInteger");
        assert!(validate(&Value::from(MIN_SAFE_INTEGER - 1.0), &schema).is_err());
        assert!(validate(&Value::from(4.5), &schema).is_err());
        assert!(validate(&Value::from(f64::INFINITY), &schema).is_err());
        assert!(validate(&Value::from(f64::NAN), &schema).is_err());
        assert!(validate(&v(json!("4")), &schema).is_err());
    }

    #[test]
    fn instance_of_checks_host_type() {
        let schema = instance_of::<Foo>();
        let foo = Value::opaque(Foo);
        assert_eq!(validate(&foo, &schema).unwrap(), foo);

        for bad in [Value::opaque(Bar), Value::from(834820), Value::Null, Value::Undefined] {
            let err = validate(&bad, &schema).unwrap_err();
            assert_eq!(err.as_validation().unwrap().pretty_schema(), "instanceOf(Foo)");
        }
    }

    #[test]
    fn any_and_unknown_accept_everything() {
        for value in [Value::Undefined, Value::Null, v(json!({"a": [1]})), Value::opaque(Foo)] {
            assert_eq!(validate(&value, &any()).unwrap(), value);
            assert_eq!(validate(&value, &unknown()).unwrap(), value);
        }
        assert_eq!(crate::pretty::pretty_schema_default(&any()), "any");
        assert_eq!(crate::pretty::pretty_schema_default(&unknown()), "unknown");
    }
}
