//! Writer options

/// Layout of text-format output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    /// One field per line, each annotated with its label and units.
    #[default]
    Standard,
    /// One field per line, no annotations.
    NoComment,
    /// One line per object.
    Compressed,
}

/// Options for the text-format writer.
#[derive(Debug, Clone)]
pub struct TextWriteOptions {
    pub mode: TextMode,
    /// Column width of the value cell before an annotation.
    pub field_width: usize,
    /// Emit a generator comment at the top (standard mode only).
    pub header: bool,
}

impl Default for TextWriteOptions {
    fn default() -> Self {
        Self {
            mode: TextMode::Standard,
            field_width: 25,
            header: true,
        }
    }
}

impl TextWriteOptions {
    pub fn with_mode(mode: TextMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Options for the structured-format writer.
#[derive(Debug, Clone)]
pub struct StructuredWriteOptions {
    /// Indent nested mappings.
    pub pretty: bool,
}

impl Default for StructuredWriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}
