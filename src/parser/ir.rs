//! Intermediate representation shared by both parsers.
//!
//! Parsers only split the input into objects and fields. Mapping positional
//! fields onto schema keys, canonicalizing values, and resolving names happen
//! when a [`Document`](crate::model::Document) is built from these objects.

/// One object as read from the input, before schema binding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    /// Object type as spelled in the input.
    pub object_type: String,
    /// Name, when the input format carries it outside the field list
    /// (structured format). Text-format names stay in `fields[0]`.
    pub name: Option<String>,
    /// Fields in input order.
    pub fields: Vec<RawField>,
    /// 1-based line where the object starts (text format only).
    pub line: Option<usize>,
}

impl RawObject {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            name: None,
            fields: Vec::new(),
            line: None,
        }
    }

    /// First field with the given key, compared case-insensitively.
    pub fn keyed(&self, key: &str) -> Option<&RawField> {
        self.fields
            .iter()
            .find(|f| f.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key)))
    }
}

/// One field value as read from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Field key for keyed input; `None` for positional (text) input.
    pub key: Option<String>,
    pub value: RawValue,
    /// `!- label` annotation that followed the field, if any.
    pub annotation: Option<String>,
}

impl RawField {
    pub fn positional(text: impl Into<String>) -> Self {
        Self {
            key: None,
            value: RawValue::Text(text.into()),
            annotation: None,
        }
    }

    pub fn keyed(key: impl Into<String>, value: RawValue) -> Self {
        Self {
            key: Some(key.into()),
            value,
            annotation: None,
        }
    }
}

/// An untyped field value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    /// A JSON number written without a fraction or exponent.
    Integer(i64),
}

impl RawValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }

    /// Text form of the value.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Integer(i) => i.to_string(),
        }
    }
}
