//! # bodycheck-schema: Schema Descriptor Registry
//!
//! Loads schemas written as JSON or YAML descriptors and validates
//! documents against them by name, for hosts that keep their request
//! contracts in files rather than in code.
//!
//! ## Descriptors (`descriptor`)
//!
//! [`parse_descriptor`] turns a JSON value into a [`bodycheck_core::Schema`]
//! using a notation that mirrors the in-code authoring surface (`"$string"`,
//! `[S]` for arrays, `{"$either": [...]}`, ...). Malformed descriptors are
//! rejected with `bodycheck_core::Error::InvalidSchema`.
//!
//! ## Registry (`registry`)
//!
//! [`SchemaRegistry`] holds named schemas, loads descriptor directories,
//! and resolves `"$<name>"` references to host-registered custom
//! validators.
//!
//! ## Crate Policy
//!
//! - Depends only on `bodycheck-core` internally.
//! - Descriptor errors are programmer errors and are reported at load
//!   time, never while validating a request.

pub mod descriptor;
pub mod registry;

pub use descriptor::parse_descriptor;
pub use registry::{RegistryError, SchemaRegistry};
