//! Foundation types for the document engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ObjectId`] - Stable per-document identity of an object record
//! - [`NameKey`] - Case-insensitive key for object names and reference targets
//! - [`normalize_field_name`] - Canonical spelling of schema field identifiers
//! - [`FieldValue`] - A canonicalized field value
//! - Domain constants (file extensions, schema resource layout)
//!
//! This module has NO dependencies on other epmodel modules.

pub mod constants;
mod name;
mod object_id;
mod value;

pub use name::{NameKey, normalize_field_name};
pub use object_id::ObjectId;
pub use value::FieldValue;
