//! # Schema Pretty-Printing
//!
//! Renders a [`Schema`] as a display-safe string. The renderer mirrors the
//! engine's dispatch table, so each schema kind has exactly one textual
//! form. Output is safe to show to end users provided schema literals and
//! field names hold no sensitive data.

use crate::schema::{Literal, Schema, DEFAULT_CUSTOM_NAME};

/// Indentation step used by [`pretty_schema_default`].
pub const DEFAULT_INDENT_INCREMENT: usize = 2;

/// Render a schema.
///
/// `indent` is the number of spaces at the current nesting level and
/// `indent_increment` is added for each nested record, so nested objects
/// compound indentation consistently.
///
/// ```
/// use bodycheck_core::{pretty_schema, Schema};
///
/// let schema = Schema::record([("tags", Schema::array(Schema::string()))]);
/// assert_eq!(pretty_schema(&schema, 2, 0), "{\n  tags: string[],\n}");
/// ```
pub fn pretty_schema(schema: &Schema, indent_increment: usize, indent: usize) -> String {
    match schema {
        Schema::Undefined => "undefined".to_string(),
        Schema::Null => "null".to_string(),
        Schema::Literal(Literal::Bool(b)) => b.to_string(),
        Schema::Literal(Literal::Number(n)) => format_number(*n),
        Schema::Literal(Literal::String(s)) => format!("\"{s}\""),
        Schema::Type(tag) => tag.as_str().to_string(),
        Schema::ArrayOf(element) => {
            format!("{}[]", pretty_schema(element, indent_increment, indent))
        }
        Schema::Tuple(elements) => {
            let rendered: Vec<String> = elements
                .iter()
                .map(|s| pretty_schema(s, indent_increment, indent))
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        Schema::Record(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let inner = indent + indent_increment;
            let mut out = String::from("{\n");
            for (name, field_schema) in fields {
                out.push_str(&" ".repeat(inner));
                out.push_str(name);
                out.push_str(": ");
                out.push_str(&pretty_schema(field_schema, indent_increment, inner));
                out.push_str(",\n");
            }
            out.push_str(&" ".repeat(indent));
            out.push('}');
            out
        }
        Schema::Custom(validator) => {
            let Some(metadata) = validator.metadata() else {
                return DEFAULT_CUSTOM_NAME.to_string();
            };
            match &metadata.child_schemas {
                None => metadata.name.clone(),
                Some(children) => {
                    let rendered: Vec<String> = children
                        .iter()
                        .map(|s| pretty_schema(s, indent_increment, indent))
                        .collect();
                    format!("{}({})", metadata.name, rendered.join(&metadata.separator))
                }
            }
        }
    }
}

/// Render a schema with an increment of 2 and no base indentation.
pub fn pretty_schema_default(schema: &Schema) -> String {
    pretty_schema(schema, DEFAULT_INDENT_INCREMENT, 0)
}

/// Numbers render the way a JavaScript template string would render them.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Covers -0.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let scientific = format!("{n:e}");
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => scientific,
        }
    } else {
        n.to_string()
    }
}
