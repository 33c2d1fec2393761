//! Common trait for the model file formats.
//!
//! A [`ModelFormat`] turns bytes into a [`Document`] and back. The two
//! built-in formats are [`Idf`] (`.idf`) and [`EpJson`]
//! (`.epJSON`); [`detect_format`] picks one from a file extension.

use crate::base::constants::{STRUCTURED_EXTENSION, TEXT_EXTENSION};
use crate::error::{Error, Result};
use crate::model::{Document, LoadOptions};
use crate::schema::SchemaStore;
use crate::writer::{StructuredWriteOptions, TextWriteOptions, to_structured, to_text};
use std::path::Path;
use tracing::{debug, info, warn};

/// A file format documents can be read from and written to.
pub trait ModelFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse bytes and bind the result to a schema from `store`.
    fn read(&self, input: &[u8], store: &SchemaStore, options: &LoadOptions) -> Result<Document>;

    /// Serialize a document.
    fn write(&self, document: &Document) -> Result<Vec<u8>>;

    /// Whether `extension` (any case) belongs to this format.
    fn handles_extension(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

// ============================================================================
// TEXT FORMAT
// ============================================================================

/// The comma/semicolon text format.
#[derive(Debug, Clone, Default)]
pub struct Idf {
    pub options: TextWriteOptions,
}

impl ModelFormat for Idf {
    fn name(&self) -> &'static str {
        "IDF"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[TEXT_EXTENSION, "imf"]
    }

    fn read(&self, input: &[u8], store: &SchemaStore, options: &LoadOptions) -> Result<Document> {
        let text = String::from_utf8_lossy(input);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            warn!("text input is not valid UTF-8; invalid bytes were replaced");
        }
        Document::load_text(&text, store, options)
    }

    fn write(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(to_text(document, &self.options).into_bytes())
    }
}

// ============================================================================
// STRUCTURED FORMAT
// ============================================================================

/// The JSON format.
#[derive(Debug, Clone, Default)]
pub struct EpJson {
    pub options: StructuredWriteOptions,
}

impl ModelFormat for EpJson {
    fn name(&self) -> &'static str {
        "epJSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[STRUCTURED_EXTENSION, "json"]
    }

    fn read(&self, input: &[u8], store: &SchemaStore, options: &LoadOptions) -> Result<Document> {
        let text = std::str::from_utf8(input)
            .map_err(|e| Error::json(format!("input is not valid UTF-8: {e}")))?;
        Document::load_structured(text, store, options)
    }

    fn write(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(to_structured(document, &self.options)?.into_bytes())
    }
}

/// Pick the format for a file from its extension.
pub fn detect_format(path: &Path) -> Result<Box<dyn ModelFormat>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let text = Idf::default();
    if text.handles_extension(extension) {
        return Ok(Box::new(text));
    }
    let structured = EpJson::default();
    if structured.handles_extension(extension) {
        return Ok(Box::new(structured));
    }
    Err(Error::UnsupportedFormat(format!(
        "cannot tell the model format of '{}'",
        path.display()
    )))
}

impl Document {
    /// Read a model file, choosing the format from its extension.
    pub fn from_path(
        path: impl AsRef<Path>,
        store: &SchemaStore,
        options: &LoadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format(path)?;
        let bytes = std::fs::read(path)?;
        debug!("reading {} as {}", path.display(), format.name());
        format.read(&bytes, store, options)
    }

    /// Write this document to a file, choosing the format from its extension.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = detect_format(path)?;
        std::fs::write(path, format.write(self)?)?;
        info!("wrote {} objects to {}", self.len(), path.display());
        Ok(())
    }
}
