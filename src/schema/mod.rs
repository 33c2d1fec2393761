//! Versioned schema definitions.
//!
//! A [`SchemaVersion`] describes every object type of one simulation-engine
//! release: field order, value types, defaults, bounds, enumerations, units,
//! reference declarations, and extensible groups. Schemas are loaded through
//! a [`SchemaStore`], which caches each version for its own lifetime.
//!
//! ```ignore
//! use epmodel::schema::{SchemaStore, Version};
//!
//! let store = SchemaStore::with_dir("/opt/schemas");
//! let schema = store.load(Version::new(24, 1, 0))?;
//! let zone = schema.object_type("zone").unwrap();
//! assert_eq!(zone.name(), "Zone");
//! ```

mod check;
mod loader;
mod store;
mod types;
mod version;

pub use check::{Violation, ViolationKind};
pub use loader::parse_schema;
pub use store::SchemaStore;
#[cfg(test)]
pub(crate) use store::fixture_store;
pub use types::{
    Bound, ExtensibleGroup, FieldKind, FieldSchema, FieldSlot, ObjectTypeSchema, ResolvedField,
    SchemaVersion,
};
pub use version::Version;
