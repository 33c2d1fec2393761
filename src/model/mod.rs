//! In-memory model: documents, collections, records, and references.
//!
//! ## Architecture
//!
//! ```text
//! Document ──► Collection (per type) ──► ObjectRecord (per object)
//!    │               name index             field map
//!    └──► ReferenceGraph
//!           forward:  object → field → target name
//!           backward: target name → {(object, field)}
//! ```
//!
//! Every object type shares the one generic record type; the schema gives
//! fields their meaning when records are built, validated, and written.
//! Names compare without regard to case throughout.

mod collection;
mod document;
mod load;
mod options;
mod record;
mod references;

pub use collection::Collection;
pub use document::Document;
pub use options::{FieldLookup, LoadOptions};
pub use record::ObjectRecord;
pub use references::ReferenceEdge;
