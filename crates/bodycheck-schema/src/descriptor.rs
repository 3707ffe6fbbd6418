//! # Schema Descriptors
//!
//! Parses schemas written as JSON (or YAML converted to JSON) into
//! [`Schema`] values. The notation mirrors the in-code authoring surface:
//!
//! | Descriptor                         | Schema                                 |
//! |------------------------------------|----------------------------------------|
//! | `null`                             | `Null`                                 |
//! | `true`, `42`, `"admin"`            | literal                                |
//! | `"$string"`, `"$number"`, `"$boolean"` | type tag                           |
//! | `"$undefined"`                     | `Undefined`                            |
//! | `"$<name>"`                        | registered custom validator            |
//! | `"$$text"`                         | the literal string `"$text"`           |
//! | `[S]`                              | array of `S`                           |
//! | `[S0, S1, ...]`, `[]`              | tuple                                  |
//! | `{"$either": [...]}`               | [`either`]                             |
//! | `{"$all": [...]}`                  | [`all`](bodycheck_core::all)           |
//! | `{"field": S, "$$key": S}`         | record (`$$key` declares field `$key`) |
//!
//! Any other `$`-prefixed name is rejected with [`Error::InvalidSchema`].
//! This is the one place where arbitrary schema shapes enter the system.

use std::collections::HashMap;

use bodycheck_core::{either, CustomValidator, Error, Schema};
use serde_json::Value;

/// Sigil marking directives and type names in descriptors.
pub const SIGIL: char = '$';

/// Parse a descriptor, resolving `"$<name>"` references through `validators`.
///
/// # Errors
///
/// Returns [`Error::InvalidSchema`] for unknown directives, unknown
/// validator names and malformed combinator arguments.
pub fn parse_descriptor(
    descriptor: &Value,
    validators: &HashMap<String, CustomValidator>,
) -> Result<Schema, Error> {
    match descriptor {
        Value::Null => Ok(Schema::Null),
        Value::Bool(b) => Ok(Schema::from(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(Schema::from)
            .ok_or_else(|| Error::InvalidSchema(format!("unrepresentable number literal {n}"))),
        Value::String(s) => parse_string(s, validators),
        Value::Array(elements) if elements.len() == 1 => {
            Ok(Schema::array(parse_descriptor(&elements[0], validators)?))
        }
        Value::Array(elements) => elements
            .iter()
            .map(|e| parse_descriptor(e, validators))
            .collect::<Result<Vec<_>, _>>()
            .map(Schema::Tuple),
        Value::Object(fields) => {
            if fields.len() == 1 {
                if let Some((key, args)) = fields.iter().next() {
                    match key.as_str() {
                        "$either" => return Ok(either(parse_alternatives(key, args, validators)?)),
                        #[allow(deprecated)]
                        "$all" => return Ok(bodycheck_core::all(parse_alternatives(key, args, validators)?)),
                        _ => {}
                    }
                }
            }

            fields
                .iter()
                .map(|(key, field)| -> Result<(String, Schema), Error> {
                    let name = unescape(key)
                        .ok_or_else(|| Error::InvalidSchema(format!("unknown directive '{key}'")))?;
                    Ok((name.to_string(), parse_descriptor(field, validators)?))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Schema::Record)
        }
    }
}

fn parse_string(s: &str, validators: &HashMap<String, CustomValidator>) -> Result<Schema, Error> {
    let Some(name) = s.strip_prefix(SIGIL) else {
        return Ok(Schema::from(s));
    };
    if name.starts_with(SIGIL) {
        return Ok(Schema::from(name));
    }
    match name {
        "string" => Ok(Schema::string()),
        "number" => Ok(Schema::number()),
        "boolean" => Ok(Schema::boolean()),
        "undefined" => Ok(Schema::Undefined),
        _ => validators
            .get(name)
            .cloned()
            .map(Schema::Custom)
            .ok_or_else(|| Error::InvalidSchema(format!("unknown type or validator '{s}'"))),
    }
}

fn parse_alternatives(
    directive: &str,
    args: &Value,
    validators: &HashMap<String, CustomValidator>,
) -> Result<Vec<Schema>, Error> {
    let Value::Array(items) = args else {
        return Err(Error::InvalidSchema(format!(
            "'{directive}' expects an array of schemas"
        )));
    };
    items.iter().map(|item| parse_descriptor(item, validators)).collect()
}

/// `$$key` declares the field `$key`; a bare `$key` is an unknown directive.
fn unescape(key: &str) -> Option<&str> {
    match key.strip_prefix(SIGIL) {
        None => Some(key),
        Some(rest) if rest.starts_with(SIGIL) => Some(rest),
        Some(_) => None,
    }
}
