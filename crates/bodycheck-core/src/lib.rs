//! # bodycheck-core: Boundary Validation Engine
//!
//! Validates a value of unknown shape against a declaratively described
//! [`Schema`], producing either a narrowed value or a display-safe
//! [`ValidationError`]. Intended for trust boundaries such as inbound
//! request bodies, where the caller controls the schema but not the input.
//!
//! ## Components
//!
//! - [`value`]: the dynamic [`Value`] model and its coarse [`ValueKind`].
//! - [`schema`]: the closed [`Schema`] sum type and the custom-validator
//!   protocol ([`CustomValidator`], [`CustomMetadata`]).
//! - [`validate`](mod@validate): the recursive matcher.
//! - [`combinators`]: [`either`], [`all`], [`safe_integer`],
//!   [`instance_of`], [`any`], [`unknown`].
//! - [`path`] and [`pretty`]: display-safe rendering of paths and schemas.
//! - [`error`]: [`ValidationError`] and the engine-level [`Error`].
//!
//! ## Crate Policy
//!
//! - Fail-fast: the first mismatch wins; failures are never aggregated.
//! - No coercion: a string is never accepted where a number is expected
//!   unless a custom validator converts it explicitly.
//! - The engine never mutates its input or the schema.
//! - No `unsafe` code, no `.unwrap()` outside tests.

pub mod combinators;
pub mod error;
pub mod path;
pub mod pretty;
pub mod schema;
pub mod validate;
pub mod value;

#[allow(deprecated)]
pub use combinators::all;
pub use combinators::{any, either, instance_of, is_safe_integer, safe_integer, unknown};
pub use error::{Error, ValidationError};
pub use path::{pretty_path, Path, PathSegment};
pub use pretty::{pretty_schema, pretty_schema_default};
pub use schema::{CustomMetadata, CustomValidator, Literal, Schema, TypeTag};
pub use validate::{validate, validate_at, validate_into, validate_into_at, MAX_DEPTH};
pub use value::{Opaque, Value, ValueKind};
