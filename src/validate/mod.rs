//! Schema-driven validation of documents.
//!
//! The [`Validator`] walks every object of a [`Document`](crate::model::Document)
//! and reports, as data:
//! - required names, fields, and object types that are missing
//! - values of the wrong type, outside an enumeration, or out of bounds
//! - references that name no object of an accepted type
//! - object types and fields the schema does not define (warnings)
//!
//! Each issue points at one object, or one field of one object.

mod issue;
mod validator;

pub use issue::{IssueCode, Severity, ValidationIssue};
pub use validator::{Validator, validate};
