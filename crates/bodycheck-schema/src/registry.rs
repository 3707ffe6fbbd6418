//! # Schema Registry
//!
//! Named schemas loaded from descriptor files, plus the named custom
//! validators descriptors may reference.
//!
//! ## Loading
//!
//! [`SchemaRegistry::load_dir`] reads every `*.schema.json`,
//! `*.schema.yaml` and `*.schema.yml` file in a directory and registers it
//! under its file name with the `.schema.*` suffix removed, so
//! `create-user.schema.yaml` becomes `create-user`. Other files are
//! skipped.
//!
//! ## Built-in Validators
//!
//! `safeInteger`, `any` and `unknown` are registered by
//! [`SchemaRegistry::new`]. Host-specific validators (date parsing,
//! identifier formats, ...) are added with
//! [`SchemaRegistry::with_validator`] before descriptors are parsed.

use std::collections::HashMap;
use std::path::Path;

use bodycheck_core::{any, safe_integer, unknown, CustomValidator, Schema, Value};
use thiserror::Error;

use crate::descriptor::parse_descriptor;

/// Descriptor file suffixes recognized by [`SchemaRegistry::load_dir`].
const JSON_SUFFIX: &str = ".schema.json";
const YAML_SUFFIXES: [&str; 2] = [".schema.yaml", ".schema.yml"];

/// Error raised by the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A descriptor could not be read, parsed or converted to a schema.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema name or file name.
        schema_name: String,
        /// Why loading failed.
        reason: String,
    },

    /// No schema is registered under this name.
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    /// Validation itself failed.
    #[error(transparent)]
    Validation(#[from] bodycheck_core::Error),

    /// IO error while reading a descriptor directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named schemas and the validators their descriptors can reference.
///
/// Schemas are immutable once registered and `Send + Sync`, so a loaded
/// registry can be shared across request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    validators: HashMap<String, CustomValidator>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// An empty registry with the built-in validators available.
    pub fn new() -> Self {
        let mut registry = Self {
            schemas: HashMap::new(),
            validators: HashMap::new(),
        };
        for (name, schema) in [("safeInteger", safe_integer()), ("any", any()), ("unknown", unknown())] {
            if let Schema::Custom(validator) = schema {
                registry.validators.insert(name.to_string(), validator);
            }
        }
        registry
    }

    /// Make a custom validator available to descriptors as `"$<name>"`.
    ///
    /// Registering a name twice replaces the earlier validator for
    /// descriptors parsed afterwards.
    pub fn with_validator(mut self, name: impl Into<String>, validator: CustomValidator) -> Self {
        self.validators.insert(name.into(), validator);
        self
    }

    /// Parse a descriptor without registering it.
    ///
    /// # Errors
    ///
    /// Returns [`bodycheck_core::Error::InvalidSchema`] for malformed descriptors.
    pub fn parse(&self, descriptor: &serde_json::Value) -> Result<Schema, bodycheck_core::Error> {
        parse_descriptor(descriptor, &self.validators)
    }

    /// Parse a descriptor and register it under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let schema = self.parse(descriptor).map_err(|e| RegistryError::SchemaLoad {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;
        self.insert(name, schema);
        Ok(())
    }

    /// Register an already-built schema under `name`.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        if self.schemas.insert(name.clone(), schema).is_some() {
            tracing::warn!(schema = %name, "replacing previously registered schema");
        }
    }

    /// Load every descriptor file in `dir`.
    ///
    /// Returns the number of schemas loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaLoad`] for the first descriptor that
    /// cannot be read, parsed as JSON/YAML, or converted to a schema.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| RegistryError::SchemaLoad {
            schema_name: dir.display().to_string(),
            reason: format!("cannot read schema directory: {e}"),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                files.push((file_name.to_string(), path.clone()));
            }
        }
        // Deterministic load order, so duplicate names resolve the same way.
        files.sort();

        let mut loaded = 0;
        for (file_name, path) in files {
            let Some((name, format)) = descriptor_name(&file_name) else {
                tracing::debug!(file = %file_name, "skipping non-descriptor file");
                continue;
            };
            let descriptor = read_descriptor(&path, &file_name, format)?;
            self.register(name, &descriptor)?;
            loaded += 1;
        }

        tracing::info!(dir = %dir.display(), loaded, "loaded schema descriptors");
        Ok(loaded)
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Names of all registered schemas, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate a value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSchema`] if `schema_name` is not
    /// registered, or [`RegistryError::Validation`] wrapping the engine error.
    pub fn validate(&self, value: &Value, schema_name: &str) -> Result<Value, RegistryError> {
        let schema = self
            .get(schema_name)
            .ok_or_else(|| RegistryError::UnknownSchema(schema_name.to_string()))?;
        Ok(bodycheck_core::validate(value, schema)?)
    }

    /// Validate a parsed JSON document against a named schema.
    pub fn validate_json(
        &self,
        document: &serde_json::Value,
        schema_name: &str,
    ) -> Result<Value, RegistryError> {
        self.validate(&Value::from(document), schema_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn descriptor_name(file_name: &str) -> Option<(&str, Format)> {
    if let Some(name) = file_name.strip_suffix(JSON_SUFFIX) {
        return Some((name, Format::Json));
    }
    YAML_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .map(|name| (name, Format::Yaml))
}

fn read_descriptor(
    path: &Path,
    file_name: &str,
    format: Format,
) -> Result<serde_json::Value, RegistryError> {
    let load_error = |reason: String| RegistryError::SchemaLoad {
        schema_name: file_name.to_string(),
        reason,
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| load_error(format!("cannot read file: {e}")))?;
    match format {
        Format::Json => {
            serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}")))
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?;
            yaml_to_json(yaml, "descriptor")
                .map_err(|e| load_error(format!("unsupported YAML: {e}")))
        }
    }
}

/// Lower a parsed YAML descriptor into the JSON tree [`parse_descriptor`]
/// reads.
///
/// Field names must be YAML strings: an unquoted `1:` or `yes:` key is an
/// error naming the key and where it sits. Tags are unwrapped. Numbers
/// without a JSON form (`.nan`, `.inf`) are rejected.
fn yaml_to_json(node: serde_yaml::Value, location: &str) -> Result<serde_json::Value, String> {
    use serde_yaml::Value as Yaml;

    let json = match node {
        Yaml::Null => serde_json::Value::Null,
        Yaml::Bool(b) => b.into(),
        Yaml::String(s) => s.into(),
        Yaml::Number(n) => yaml_number(&n)
            .ok_or_else(|| format!("number {n} at `{location}` has no JSON form"))?,
        Yaml::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| yaml_to_json(item, &format!("{location}[{i}]")))
            .collect::<Result<Vec<_>, _>>()?
            .into(),
        Yaml::Mapping(entries) => {
            let mut fields = serde_json::Map::with_capacity(entries.len());
            for (key, item) in entries {
                let Yaml::String(name) = key else {
                    return Err(format!(
                        "field name {} at `{location}` is not a string",
                        yaml_key_text(&key)
                    ));
                };
                let item = yaml_to_json(item, &format!("{location}.{name}"))?;
                fields.insert(name, item);
            }
            fields.into()
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value, location)?,
    };
    Ok(json)
}

fn yaml_number(n: &serde_yaml::Number) -> Option<serde_json::Value> {
    if let Some(i) = n.as_i64() {
        return Some(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}

fn yaml_key_text(key: &serde_yaml::Value) -> String {
    serde_yaml::to_string(key)
        .map(|text| text.trim_end().to_string())
        .unwrap_or_else(|_| format!("{key:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_are_available() {
        let registry = SchemaRegistry::new();
        for name in ["$safeInteger", "$any", "$unknown"] {
            assert!(registry.parse(&json!(name)).is_ok(), "{name} missing");
        }
    }

    #[test]
    fn register_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry
            .register("point", &json!({"x": "$number", "y": "$number"}))
            .unwrap();
        assert_eq!(registry.names(), ["point"]);

        let out = registry.validate_json(&json!({"x": 1, "y": 2}), "point").unwrap();
        assert_eq!(out, Value::from(json!({"x": 1, "y": 2})));

        let err = registry.validate_json(&json!({"x": 1}), "point").unwrap_err();
        match err {
            RegistryError::Validation(e) => {
                assert_eq!(e.as_validation().unwrap().pretty_path(), "body.y");
            }
            other => panic!("expected a validation error, got {other}"),
        }
    }

    #[test]
    fn unknown_schema_name() {
        let registry = SchemaRegistry::new();
        let err = registry.validate(&Value::Null, "missing").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSchema(name) if name == "missing"));
    }

    #[test]
    fn invalid_descriptor_is_a_load_error() {
        let mut registry = SchemaRegistry::new();
        let err = registry.register("bad", &json!({"when": "$date"})).unwrap_err();
        assert!(matches!(err, RegistryError::SchemaLoad { ref schema_name, .. } if schema_name == "bad"));
        assert!(err.to_string().contains("invalid schema"));
        assert!(registry.is_empty());
    }

    #[test]
    fn host_validator_registration() {
        let lowercase = CustomValidator::new(|value, path| match value.as_str() {
            Some(s) if s.chars().all(|c| c.is_ascii_lowercase()) => Ok(value.clone()),
            _ => Err(bodycheck_core::Error::mismatch(path, Schema::string(), value)),
        })
        .named("lowercase");
        let mut registry = SchemaRegistry::new().with_validator("lowercase", lowercase);
        registry.register("slug", &json!("$lowercase")).unwrap();
        assert!(registry.validate(&Value::from("abc"), "slug").is_ok());
        assert!(registry.validate(&Value::from("ABC"), "slug").is_err());
    }

    #[test]
    fn descriptor_file_names() {
        assert_eq!(descriptor_name("user.schema.json"), Some(("user", Format::Json)));
        assert_eq!(descriptor_name("user.schema.yaml"), Some(("user", Format::Yaml)));
        assert_eq!(descriptor_name("user.schema.yml"), Some(("user", Format::Yaml)));
        assert_eq!(descriptor_name("user.json"), None);
        assert_eq!(descriptor_name("README.md"), None);
    }

    #[test]
    fn yaml_to_json_conversion() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
name: $string
age: $safeInteger
tags:
  - $string
position: [$number, $number]
"#,
        )
        .unwrap();
        let json = yaml_to_json(yaml, "descriptor").unwrap();
        assert_eq!(
            json,
            json!({
                "name": "$string",
                "age": "$safeInteger",
                "tags": ["$string"],
                "position": ["$number", "$number"]
            })
        );
    }

    fn lower(text: &str) -> Result<serde_json::Value, String> {
        yaml_to_json(serde_yaml::from_str(text).unwrap(), "descriptor")
    }

    #[test]
    fn yaml_non_string_field_names_are_rejected() {
        let err = lower("user:\n  1: $string\n").unwrap_err();
        assert!(err.contains("field name 1"), "{err}");
        assert!(err.contains("`descriptor.user`"), "{err}");

        let err = lower("true: $number\n").unwrap_err();
        assert!(err.contains("field name true"), "{err}");
    }

    #[test]
    fn yaml_non_finite_numbers_are_rejected() {
        let err = lower("limits: [1, .nan]\n").unwrap_err();
        assert!(err.contains("`descriptor.limits[1]`"), "{err}");
        assert!(lower("ceiling: .inf\n").is_err());
    }

    #[test]
    fn yaml_tags_are_unwrapped() {
        let json = lower("name: !label $string\ncount: !weight 3\n").unwrap();
        assert_eq!(json, json!({"name": "$string", "count": 3}));
    }
}
