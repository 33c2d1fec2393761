//! Text-format writer.

use super::options::{TextMode, TextWriteOptions};
use super::output_order;
use crate::model::{Document, ObjectRecord};
use crate::schema::{FieldSlot, ObjectTypeSchema};
use std::fmt::Write;
use tracing::{debug, warn};

/// Prefix of keys that hold fields by position on unknown object types.
const POSITIONAL_PREFIX: &str = "field_";

/// One output field: its text (empty when unset) and annotation.
struct Cell {
    text: String,
    annotation: String,
}

impl Cell {
    fn new(text: Option<String>, annotation: String) -> Self {
        Self {
            text: text.unwrap_or_default(),
            annotation,
        }
    }
}

/// Serialize a document to the text format.
///
/// Object types the schema knows write their fields in canonical order,
/// with blanks for unset fields before the last set one. Fields a known type
/// does not define have no position in this format and are dropped.
pub fn to_text(document: &Document, options: &TextWriteOptions) -> String {
    let mut out = String::new();
    if options.header && options.mode == TextMode::Standard {
        let _ = writeln!(
            out,
            "!-Generator {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let _ = writeln!(out, "!-Schema {}", document.version());
        out.push('\n');
    }

    let schema = document.schema();
    let mut objects = 0usize;
    for collection in output_order(document) {
        let ty = schema.object_type(collection.object_type());
        for record in collection.iter() {
            let cells = match ty {
                Some(ty) => known_cells(ty, record),
                None => unknown_cells(record),
            };
            write_object(&mut out, record.object_type(), &cells, options);
            objects += 1;
        }
    }
    debug!("wrote {} objects as text ({:?})", objects, options.mode);
    out
}

/// Cells of a schema-defined object in canonical order, trailing blanks cut.
fn known_cells(ty: &ObjectTypeSchema, record: &ObjectRecord) -> Vec<Cell> {
    let mut groups = 0usize;
    for (key, _) in record.fields() {
        match ty.resolve_field(key).map(|resolved| resolved.slot) {
            Some(FieldSlot::Extensible { group, .. }) => groups = groups.max(group),
            Some(_) => {}
            None => warn!(
                "{} '{}': field '{}' is not defined for this type and is not written",
                ty.name(),
                record.display_name(),
                key
            ),
        }
    }

    let mut slots: Vec<FieldSlot> = Vec::with_capacity(ty.base_len());
    if ty.is_named() {
        slots.push(FieldSlot::Name);
    }
    slots.extend((0..ty.fields().len()).map(FieldSlot::Base));
    if let Some(ext) = ty.extensible() {
        for group in 1..=groups {
            slots.extend((0..ext.size).map(|index| FieldSlot::Extensible { group, index }));
        }
    }

    let mut last_set = None;
    let mut cells: Vec<Cell> = Vec::with_capacity(slots.len());
    for (i, slot) in slots.into_iter().enumerate() {
        let text = match slot {
            FieldSlot::Name => record.name().map(str::to_string),
            _ => record.get(&ty.key_of(slot)).map(|value| value.to_string()),
        };
        if text.is_some() {
            last_set = Some(i);
        }
        cells.push(Cell::new(text, annotation(ty, slot)));
    }

    let keep = last_set
        .map_or(0, |i| i + 1)
        .max(usize::from(ty.is_named()));
    cells.truncate(keep);
    cells
}

fn annotation(ty: &ObjectTypeSchema, slot: FieldSlot) -> String {
    let label = ty.label_of(slot);
    match ty.field_at(slot).and_then(|field| field.units.as_deref()) {
        Some(units) => format!("{label} {{{units}}}"),
        None => label,
    }
}

/// Cells of an object whose type the schema does not define.
///
/// `field_N` keys go back to position N; any other key follows them.
fn unknown_cells(record: &ObjectRecord) -> Vec<Cell> {
    let mut positional: Vec<Option<String>> = Vec::new();
    let mut rest: Vec<String> = Vec::new();
    for (key, value) in record.fields() {
        let position = key
            .strip_prefix(POSITIONAL_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n > 0);
        match position {
            Some(n) => {
                if positional.len() < n {
                    positional.resize(n, None);
                }
                positional[n - 1] = Some(value.to_string());
            }
            None => rest.push(value.to_string()),
        }
    }

    let mut cells = Vec::with_capacity(1 + positional.len() + rest.len());
    cells.push(Cell::new(record.name().map(str::to_string), String::new()));
    cells.extend(
        positional
            .into_iter()
            .map(|text| Cell::new(text, String::new())),
    );
    cells.extend(rest.into_iter().map(|text| Cell::new(Some(text), String::new())));

    if cells.len() == 1 && cells[0].text.is_empty() {
        cells.clear();
    }
    cells
}

fn write_object(out: &mut String, object_type: &str, cells: &[Cell], options: &TextWriteOptions) {
    if cells.is_empty() {
        let _ = writeln!(out, "{object_type};");
        if options.mode != TextMode::Compressed {
            out.push('\n');
        }
        return;
    }

    match options.mode {
        TextMode::Compressed => {
            out.push_str(object_type);
            for cell in cells {
                out.push(',');
                out.push_str(&cell.text);
            }
            out.push_str(";\n");
        }
        TextMode::NoComment | TextMode::Standard => {
            let _ = writeln!(out, "{object_type},");
            let last = cells.len() - 1;
            for (i, cell) in cells.iter().enumerate() {
                let separator = if i == last { ';' } else { ',' };
                let value = format!("{}{}", cell.text, separator);
                if options.mode == TextMode::Standard && !cell.annotation.is_empty() {
                    let pad = options.field_width.saturating_sub(value.len()).max(1);
                    let _ = writeln!(
                        out,
                        "    {value}{:pad$}!- {}",
                        "",
                        cell.annotation,
                        pad = pad
                    );
                } else {
                    let _ = writeln!(out, "    {value}");
                }
            }
            out.push('\n');
        }
    }
}
