//! Parser for the text model format.
//!
//! ```text
//! file   := object*
//! object := type ("," field)* ";"
//! ```
//!
//! Objects may span lines; `!` starts a comment running to the end of the
//! line; a `!- label` comment annotates the field before it. Whitespace
//! around fields is insignificant.

use super::ir::{RawField, RawObject};
use super::lexer::{Lexer, TokenKind};
use crate::error::ParseError;
use tracing::debug;

/// Object being accumulated.
struct Pending {
    object_type: Option<String>,
    line: usize,
    fields: Vec<RawField>,
}

/// Where the next `!- label` annotation belongs.
#[derive(Clone, Copy)]
enum AnnotationTarget {
    None,
    /// Last field of the pending object.
    Pending,
    /// Last field of the most recently finished object.
    Finished,
}

/// Split text-format input into raw objects.
///
/// Fails only when an object is opened but never terminated, or when an
/// object has no type.
pub fn parse_text(input: &str) -> Result<Vec<RawObject>, ParseError> {
    let mut objects: Vec<RawObject> = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut buffer = String::new();
    let mut target = AnnotationTarget::None;

    for token in Lexer::new(input) {
        match token.kind {
            TokenKind::Text => {
                if pending.is_none() {
                    if token.text.trim().is_empty() {
                        continue;
                    }
                    pending = Some(Pending {
                        object_type: None,
                        line: token.line,
                        fields: Vec::new(),
                    });
                }
                buffer.push_str(token.text);
            }
            TokenKind::Newline => {
                if !buffer.trim().is_empty() {
                    buffer.push(' ');
                }
                target = AnnotationTarget::None;
            }
            TokenKind::Comma => {
                let object = pending.get_or_insert_with(|| Pending {
                    object_type: None,
                    line: token.line,
                    fields: Vec::new(),
                });
                let text = std::mem::take(&mut buffer);
                match object.object_type {
                    None => object.object_type = Some(object_type_from(&text, object.line)?),
                    Some(_) => {
                        object.fields.push(RawField::positional(text.trim()));
                        target = AnnotationTarget::Pending;
                    }
                }
            }
            TokenKind::Semicolon => {
                let text = std::mem::take(&mut buffer);
                let object = pending.take().unwrap_or(Pending {
                    object_type: None,
                    line: token.line,
                    fields: Vec::new(),
                });
                let mut raw = match object.object_type {
                    None => RawObject::new(object_type_from(&text, object.line)?),
                    Some(object_type) => {
                        let mut raw = RawObject::new(object_type);
                        raw.fields = object.fields;
                        raw.fields.push(RawField::positional(text.trim()));
                        raw
                    }
                };
                raw.line = Some(object.line);
                target = if raw.fields.is_empty() {
                    AnnotationTarget::None
                } else {
                    AnnotationTarget::Finished
                };
                objects.push(raw);
            }
            TokenKind::Comment => {
                let Some(label) = token.text.strip_prefix("!-") else {
                    continue;
                };
                let label = label.trim();
                let field = match target {
                    AnnotationTarget::None => None,
                    AnnotationTarget::Pending => {
                        pending.as_mut().and_then(|p| p.fields.last_mut())
                    }
                    AnnotationTarget::Finished => {
                        objects.last_mut().and_then(|o| o.fields.last_mut())
                    }
                };
                if let Some(field) = field {
                    field.annotation = Some(label.to_string());
                }
            }
        }
    }

    if let Some(object) = pending {
        let object_type = object
            .object_type
            .unwrap_or_else(|| buffer.trim().to_string());
        return Err(ParseError::new(
            object.line,
            format!(
                "truncated input: object '{}' starting at line {} is not terminated by ';'",
                object_type, object.line
            ),
        )
        .with_object_type(object_type));
    }

    debug!("parsed {} objects from text input", objects.len());
    Ok(objects)
}

fn object_type_from(text: &str, line: usize) -> Result<String, ParseError> {
    let object_type = text.trim();
    if object_type.is_empty() {
        return Err(ParseError::new(line, "object has no type"));
    }
    Ok(object_type.to_string())
}
