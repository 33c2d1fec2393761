//! Error types for structural failures.
//!
//! Only failures that make an operation impossible are errors: unreadable
//! input, a missing schema version, a name collision, or a violation found
//! while eager validation was requested. Content problems in a loaded model
//! are reported by the [`Validator`](crate::validate::Validator) as data.

use crate::base::ObjectId;
use crate::schema::Version;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A text-format syntax failure with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line where the offending object starts.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
    /// Object type being parsed, when known.
    pub object_type: Option<String>,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            object_type: None,
        }
    }

    /// Attach the object type being parsed.
    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }
}

/// Errors that can occur while loading, mutating, or writing a model.
#[derive(Debug, Error)]
pub enum Error {
    /// The text or structured input could not be parsed.
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),

    /// The requested schema version is not available.
    #[error("schema version {requested} not found (available: {})", format_versions(.available))]
    SchemaNotFound {
        requested: Version,
        available: Vec<Version>,
    },

    /// A schema resource exists but could not be decoded.
    #[error("schema {version} could not be loaded: {message}")]
    SchemaLoad { version: Version, message: String },

    /// An object with the same name already exists in the collection.
    #[error("duplicate {object_type} object named '{name}'")]
    DuplicateObject { object_type: String, name: String },

    /// The object type is not defined by the bound schema.
    #[error("unknown object type '{object_type}'")]
    UnknownObjectType { object_type: String },

    /// The field is not defined for the object type.
    #[error("unknown field '{field}' on {object_type} '{name}'")]
    UnknownField {
        object_type: String,
        name: String,
        field: String,
    },

    /// Required fields were left unset.
    #[error("{object_type} '{name}' is missing required field(s): {}", .fields.join(", "))]
    RequiredFieldMissing {
        object_type: String,
        name: String,
        fields: Vec<String>,
    },

    /// A field value violates its schema constraint.
    #[error("invalid value '{value}' for field '{field}' on {object_type} '{name}': {constraint}")]
    InvalidFieldValue {
        object_type: String,
        name: String,
        field: String,
        value: String,
        constraint: String,
    },

    /// The object id does not belong to a live record of this document.
    #[error("object {0} not found in document")]
    ObjectNotFound(ObjectId),

    /// The structured input is not valid JSON or has the wrong shape.
    #[error("JSON error: {0}")]
    Json(String),

    /// The file type cannot be read or written.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a duplicate-object error.
    pub fn duplicate(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateObject {
            object_type: object_type.into(),
            name: name.into(),
        }
    }

    /// Create an unknown-object-type error.
    pub fn unknown_type(object_type: impl Into<String>) -> Self {
        Self::UnknownObjectType {
            object_type: object_type.into(),
        }
    }

    /// Create an unknown-field error.
    pub fn unknown_field(
        object_type: impl Into<String>,
        name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnknownField {
            object_type: object_type.into(),
            name: name.into(),
            field: field.into(),
        }
    }

    /// Create an invalid-field-value error.
    pub fn invalid_value(
        object_type: impl Into<String>,
        name: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            object_type: object_type.into(),
            name: name.into(),
            field: field.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }
}

fn format_versions(versions: &[Version]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
