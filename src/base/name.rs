//! Name keys and field-name normalization.

use smol_str::SmolStr;

/// Case-insensitive key for object names and reference targets.
///
/// The simulation engine compares object names without regard to case, so
/// `Zone One` and `ZONE ONE` collide and a reference to either resolves to the
/// same object. The original spelling is kept on the record; only indices use
/// the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(SmolStr);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(SmolStr::new(name.trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NameKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize any spelling of a field identifier to the schema's key form.
///
/// `Zone Name`, `zone name`, `ZONE_NAME` and `Zone-Name` all become
/// `zone_name`. Runs of non-alphanumeric characters collapse to a single
/// underscore; leading and trailing separators are dropped.
pub fn normalize_field_name(spelling: &str) -> String {
    let mut out = String::with_capacity(spelling.len());
    let mut pending_sep = false;
    for ch in spelling.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
