use crate::schema::Version;

/// Options for building a [`Document`](super::Document) from parsed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Bind against this schema version instead of the one declared by the
    /// model's `Version` object.
    pub version: Option<Version>,
    /// Reject unknown object types and unknown fields instead of keeping
    /// them for the validator to report.
    pub strict: bool,
}

impl LoadOptions {
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// How [`Document::field`](super::Document::field) treats a spelling that
/// names no field of the object's type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldLookup {
    /// Unknown spellings are an [`Error::UnknownField`](crate::Error::UnknownField).
    #[default]
    Strict,
    /// Unknown spellings read as unset.
    Lenient,
}
