/// Identity of an object record inside one [`Document`](crate::model::Document).
///
/// Ids are allocated from a per-document counter and never reused, so an id
/// stays valid across renames and stops resolving once the record is removed.
/// Ids are only meaningful for the document that issued them (and for its
/// [`copy`](crate::model::Document::copy), which keeps them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    /// Raw index value.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
