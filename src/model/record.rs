use crate::base::{FieldValue, ObjectId};
use indexmap::IndexMap;
use smol_str::SmolStr;

/// One object of a model: a type, an optional name, and its set fields.
///
/// Fields are held under their canonical keys (or verbatim for fields the
/// schema does not know) in insertion order. Unset fields are absent. The
/// name lives outside the field map.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub(crate) id: ObjectId,
    pub(crate) object_type: SmolStr,
    pub(crate) name: Option<String>,
    pub(crate) fields: IndexMap<SmolStr, FieldValue>,
}

impl ObjectRecord {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Canonical type name, or the input spelling for unknown types.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages: the object name, or the id for nameless objects.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// Value stored under an exact canonical key.
    ///
    /// Use [`Document::field`](super::Document::field) to look a field up by
    /// label or any other spelling.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Text of a field, when it holds text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Numeric value of a field, when it holds a number.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_f64)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of set fields, the name excluded.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
