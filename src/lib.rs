//! # epmodel
//!
//! Document engine for building-energy simulation models: parses the text
//! (`.idf`) and JSON (`.epJSON`) input formats into a schema-bound in-memory
//! model, keeps cross-object references consistent under edits, validates
//! against a versioned schema, and writes either format back out.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! format    → file formats, path-based read/write
//!   ↓
//! writer    → text and JSON serialization
//! validate  → schema-driven issue reporting
//!   ↓
//! model     → Document, Collection, ObjectRecord, reference graph
//!   ↓
//! parser    → logos lexer, text and JSON parsers, version detection
//! schema    → versioned schemas, SchemaStore cache
//!   ↓
//! base      → primitives (ObjectId, NameKey, FieldValue)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use epmodel::{Document, LoadOptions, SchemaStore, TextWriteOptions};
//!
//! let store = SchemaStore::with_dir("/opt/schemas");
//! let mut doc = Document::load_text("Version,24.1;\nZone,Office;", &store, &LoadOptions::default())?;
//! let id = doc.get("Zone", "Office").unwrap().id();
//! doc.rename(id, "Open Office")?;
//! for issue in doc.validate() {
//!     println!("{issue}");
//! }
//! print!("{}", doc.to_text(&TextWriteOptions::default()));
//! ```

// ============================================================================
// MODULES (dependency order: base → schema/parser → model → validate/writer → format)
// ============================================================================

/// Foundation types: ObjectId, NameKey, FieldValue, constants
pub mod base;

/// Error types
pub mod error;

/// Versioned schemas and the schema cache
pub mod schema;

/// Text and JSON parsers producing raw objects
pub mod parser;

/// In-memory model with reference tracking
pub mod model;

/// Schema-driven validation
pub mod validate;

/// Text and JSON writers
pub mod writer;

/// File formats and path-based I/O
pub mod format;

// Re-export commonly needed items
pub use base::{FieldValue, NameKey, ObjectId};
pub use error::{Error, ParseError, Result};
pub use format::{EpJson, Idf, ModelFormat, detect_format};
pub use model::{Collection, Document, FieldLookup, LoadOptions, ObjectRecord, ReferenceEdge};
pub use schema::{SchemaStore, SchemaVersion, Version};
pub use validate::{IssueCode, Severity, ValidationIssue, Validator, validate};
pub use writer::{StructuredWriteOptions, TextMode, TextWriteOptions};
