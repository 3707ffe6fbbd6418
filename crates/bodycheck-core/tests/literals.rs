//! Literal schemas: exact-value matching, including the non-finite numbers.

use bodycheck_core::{validate, Path, Schema, ValidationError, Value};

fn expect_mismatch(value: Value, schema: Schema) -> ValidationError {
    match validate(&value, &schema) {
        Err(bodycheck_core::Error::Validation(e)) => e,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn same_error(actual: &ValidationError, expected: &ValidationError) {
    assert_eq!(actual.path(), expected.path());
    assert_eq!(actual.message(), expected.message());
}

#[test]
fn good_string_literal() {
    let out = validate(&Value::from("test string literal"), &Schema::from("test string literal")).unwrap();
    assert_eq!(out, Value::from("test string literal"));
}

#[test]
fn wrong_string_literal() {
    let e = expect_mismatch(Value::from("value"), Schema::from("schema"));
    same_error(&e, &ValidationError::new(Path::body(), Schema::from("schema"), &Value::from("value")));
    assert_eq!(
        e.message(),
        "validation error on field 'body'\n  expected '\"schema\"'\n  got 'string'"
    );
}

#[test]
fn good_number_literal() {
    assert_eq!(validate(&Value::from(42), &Schema::from(42)).unwrap(), Value::from(42));
}

#[test]
fn wrong_number_literal() {
    let e = expect_mismatch(Value::from(42), Schema::from(89));
    same_error(&e, &ValidationError::new(Path::body(), Schema::from(89), &Value::from(42)));
}

#[test]
fn good_nan_number_literal() {
    let out = validate(&Value::from(f64::NAN), &Schema::from(f64::NAN)).unwrap();
    assert!(out.as_f64().is_some_and(f64::is_nan));
}

#[test]
fn unexpected_nan_number_literal() {
    let e = expect_mismatch(Value::from(f64::NAN), Schema::from(3853));
    assert_eq!(e.pretty_schema(), "3853");
}

#[test]
fn expected_nan_number_literal() {
    let e = expect_mismatch(Value::from(3853), Schema::from(f64::NAN));
    assert_eq!(e.pretty_schema(), "NaN");
}

#[test]
fn infinities() {
    for n in [f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(validate(&Value::from(n), &Schema::from(n)).unwrap(), Value::from(n));
        expect_mismatch(Value::from(n), Schema::from(-82242));
        expect_mismatch(Value::from(-82242), Schema::from(n));
    }
    let e = expect_mismatch(Value::from(-82242), Schema::from(f64::NEG_INFINITY));
    assert_eq!(e.pretty_schema(), "-Infinity");
}

#[test]
fn boolean_literal() {
    assert_eq!(validate(&Value::from(false), &Schema::from(false)).unwrap(), Value::from(false));
    let e = expect_mismatch(Value::from(true), Schema::from(false));
    assert_eq!(e.pretty_schema(), "false");
}
