use std::fmt;

// ============================================================================
// ISSUE TYPES
// ============================================================================

/// Severity level of an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// What an issue is about.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: content errors the simulation engine would reject
/// - **W0001-W0099**: content the schema does not describe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A required field (or required name) is unset.
    RequiredFieldMissing,
    /// A value does not have the field's declared type.
    InvalidType,
    /// A value is not one of the field's enumerated choices.
    InvalidEnum,
    /// A number is outside the field's bounds.
    OutOfRange,
    /// A reference names no object of an accepted type.
    DanglingReference,
    /// An object type the model must contain is absent.
    RequiredObjectMissing,
    /// More than one object of a type that allows only one.
    DuplicateUniqueObject,
    /// The schema does not define the object type.
    UnknownObjectType,
    /// The schema does not define the field for its object type.
    UnknownField,
}

impl IssueCode {
    /// Stable short code (`E0001`).
    pub fn code(self) -> &'static str {
        match self {
            IssueCode::RequiredFieldMissing => "E0001",
            IssueCode::InvalidType => "E0002",
            IssueCode::InvalidEnum => "E0003",
            IssueCode::OutOfRange => "E0004",
            IssueCode::DanglingReference => "E0005",
            IssueCode::RequiredObjectMissing => "E0006",
            IssueCode::DuplicateUniqueObject => "E0007",
            IssueCode::UnknownObjectType => "W0001",
            IssueCode::UnknownField => "W0002",
        }
    }

    /// Severity issues with this code are reported at.
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::UnknownObjectType | IssueCode::UnknownField => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One problem found in a model, addressed to a single object or field.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub object_type: String,
    /// `None` for nameless objects and model-level issues.
    pub object_name: Option<String>,
    /// `None` when the issue concerns the whole object.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue; the severity follows from the code.
    pub fn new(
        code: IssueCode,
        object_type: impl Into<String>,
        object_name: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            object_type: object_type.into(),
            object_name: object_name.map(str::to_string),
            field: None,
            message: message.into(),
        }
    }

    /// Set the field the issue concerns.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}",
            self.severity.as_str(),
            self.code.code(),
            self.object_type
        )?;
        if let Some(name) = &self.object_name {
            write!(f, " '{name}'")?;
        }
        if let Some(field) = &self.field {
            write!(f, ", field '{field}'")?;
        }
        write!(f, ": {}", self.message)
    }
}
