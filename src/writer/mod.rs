//! Serialization of documents to the two model formats.
//!
//! Both writers emit objects grouped by type, with the `Version` object
//! first, then the schema's types in schema order, then types the schema
//! does not know in the order they appeared. Fields follow the schema's
//! canonical order rather than insertion order, and annotations are
//! generated from the schema; nothing from the original input's comments or
//! layout is kept.

mod options;
mod structured;
mod text;

pub use options::{StructuredWriteOptions, TextMode, TextWriteOptions};
pub use structured::{to_structured, to_structured_value};
pub use text::to_text;

use crate::base::constants::VERSION_OBJECT_TYPE;
use crate::model::{Collection, Document};

/// Non-empty collections in output order.
fn output_order(document: &Document) -> Vec<&Collection> {
    let schema = document.schema();
    let mut ordered: Vec<&Collection> = Vec::with_capacity(document.object_types().count());
    if let Some(version) = document.collection(VERSION_OBJECT_TYPE) {
        ordered.push(version);
    }
    for ty in schema.object_types() {
        if ty.name().eq_ignore_ascii_case(VERSION_OBJECT_TYPE) {
            continue;
        }
        if let Some(collection) = document.collection(ty.name()) {
            ordered.push(collection);
        }
    }
    ordered.extend(
        document
            .collections()
            .filter(|c| schema.object_type(c.object_type()).is_none()),
    );
    ordered
}

impl Document {
    /// Serialize to the text format.
    pub fn to_text(&self, options: &TextWriteOptions) -> String {
        to_text(self, options)
    }

    /// Serialize to the structured format.
    pub fn to_structured(&self, options: &StructuredWriteOptions) -> crate::Result<String> {
        to_structured(self, options)
    }
}
