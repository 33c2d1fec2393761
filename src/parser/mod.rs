//! Parsers for the two external model formats.
//!
//! Both parsers produce the same intermediate representation, a list of
//! [`RawObject`]s:
//! - **logos** tokenizes the text format; a small state machine groups
//!   tokens into objects and fields
//! - **serde_json** reads the structured format, which is flattened into
//!   keyed fields
//!
//! ## Architecture
//!
//! ```text
//! text bytes ──► Lexer (logos) ──► parse_text ─────────┐
//!                                                      ├──► Vec<RawObject> ──► Document
//! JSON bytes ──► serde_json::Value ──► parse_structured┘
//! ```
//!
//! Neither parser consults the schema. The only schema-facing step here is
//! [`detect_version`], which reads the model's `Version` object so the
//! caller can pick the schema to bind against.

mod ir;
mod lexer;
mod structured;
mod text;

pub use ir::{RawField, RawObject, RawValue};
pub use lexer::{Lexer, Token, TokenKind};
pub use structured::parse_structured;
pub use text::parse_text;

use crate::base::constants::{VERSION_FIELD, VERSION_OBJECT_TYPE};
use crate::schema::Version;

/// Read the schema version declared by a model's `Version` object.
///
/// Accepts the positional text form (`Version, 24.1;`) and the keyed
/// structured form (`{"version_identifier": "24.1"}`). Returns `None` when
/// no version object is present or its value is not a version string.
pub fn detect_version(objects: &[RawObject]) -> Option<Version> {
    let object = objects
        .iter()
        .find(|o| o.object_type.trim().eq_ignore_ascii_case(VERSION_OBJECT_TYPE))?;
    let field = object
        .keyed(VERSION_FIELD)
        .or_else(|| object.fields.iter().find(|f| f.key.is_none()))?;
    Version::parse(&field.value.to_text())
}
