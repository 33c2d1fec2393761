//! Building a [`Document`] from parsed objects.

use super::document::Document;
use super::options::LoadOptions;
use crate::base::constants::NAME_FIELD;
use crate::base::FieldValue;
use crate::error::{Error, Result};
use crate::parser::{RawField, RawObject, RawValue, detect_version, parse_structured, parse_text};
use crate::schema::{FieldSchema, FieldSlot, ObjectTypeSchema, SchemaStore, SchemaVersion};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a raw field lands on a record.
enum Target<'a> {
    Name,
    Known(SmolStr, &'a FieldSchema),
    Unknown(SmolStr),
}

impl Document {
    /// Parse a text-format model and bind it to its schema.
    pub fn load_text(input: &str, store: &SchemaStore, options: &LoadOptions) -> Result<Self> {
        let objects = parse_text(input)?;
        Self::load_objects(objects, store, options)
    }

    /// Parse a structured-format model and bind it to its schema.
    pub fn load_structured(
        input: &str,
        store: &SchemaStore,
        options: &LoadOptions,
    ) -> Result<Self> {
        let objects = parse_structured(input)?;
        Self::load_objects(objects, store, options)
    }

    /// Bind parsed objects to a schema picked from `store`.
    ///
    /// The version comes from `options.version` when set, else from the
    /// model's `Version` object, else the newest version the store has.
    pub fn load_objects(
        objects: Vec<RawObject>,
        store: &SchemaStore,
        options: &LoadOptions,
    ) -> Result<Self> {
        let schema = match options.version.or_else(|| detect_version(&objects)) {
            Some(version) => store.load(version)?,
            None => store.latest()?,
        };
        Self::from_objects(schema, objects, options.strict)
    }

    /// Bind parsed objects to a given schema.
    ///
    /// Positional fields map onto the type's canonical order; keyed fields
    /// are resolved by name. Blank fields stay unset, and no defaults are
    /// filled in. A second object with the same type and name is an error.
    /// Unknown types and fields are kept verbatim unless `strict`.
    pub fn from_objects(
        schema: Arc<SchemaVersion>,
        objects: Vec<RawObject>,
        strict: bool,
    ) -> Result<Self> {
        let mut document = Document::new(Arc::clone(&schema));
        let total = objects.len();
        for raw in objects {
            match schema.object_type(&raw.object_type) {
                Some(ty) => document.insert_known(ty, raw, strict)?,
                None if strict => return Err(Error::unknown_type(raw.object_type.trim())),
                None => document.insert_unknown(raw)?,
            }
        }
        debug!(
            "loaded {} objects of {} types against schema {} ({} references)",
            total,
            document.object_types().count(),
            schema.version(),
            document.reference_count()
        );
        Ok(document)
    }

    fn insert_known(&mut self, ty: &ObjectTypeSchema, raw: RawObject, strict: bool) -> Result<()> {
        let mut name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        if !ty.is_named() {
            if let Some(given) = name.take() {
                warn!("{}: name '{}' ignored for nameless type", ty.name(), given);
            }
        }

        let mut fields = IndexMap::with_capacity(raw.fields.len());
        let mut position = 0;
        for field in raw.fields {
            let target = match &field.key {
                None => {
                    let p = position;
                    position += 1;
                    positional_target(ty, p, &field)
                }
                Some(key) => keyed_target(ty, key),
            };
            if let (true, Target::Unknown(key)) = (strict, &target) {
                return Err(Error::unknown_field(
                    ty.name(),
                    name.clone().unwrap_or_default(),
                    key.as_str(),
                ));
            }
            if field.value.is_blank() {
                continue;
            }
            match target {
                Target::Name => {
                    if name.is_none() {
                        name = Some(field.value.to_text());
                    }
                }
                Target::Known(key, schema) => {
                    fields.insert(key, schema.canonicalize(raw_value(field.value)));
                }
                Target::Unknown(key) => {
                    fields.insert(key, raw_value(field.value));
                }
            }
        }

        self.insert_record(ty.name(), true, name, fields)?;
        Ok(())
    }

    /// Objects of types the schema does not define keep their fields
    /// verbatim. Positionally, the first field is taken as the name and the
    /// rest become `field_1`, `field_2`, and so on.
    fn insert_unknown(&mut self, raw: RawObject) -> Result<()> {
        let mut name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let mut fields = IndexMap::with_capacity(raw.fields.len());
        for (position, field) in raw.fields.into_iter().enumerate() {
            if field.value.is_blank() {
                continue;
            }
            match field.key {
                None if position == 0 => name = Some(field.value.to_text()),
                None => {
                    fields.insert(
                        SmolStr::new(format!("field_{position}")),
                        raw_value(field.value),
                    );
                }
                Some(key) if key.trim().eq_ignore_ascii_case(NAME_FIELD) && name.is_none() => {
                    name = Some(field.value.to_text());
                }
                Some(key) => {
                    fields.insert(SmolStr::new(key.trim()), raw_value(field.value));
                }
            }
        }
        debug!("kept unknown object type '{}'", raw.object_type.trim());
        self.insert_record(raw.object_type.trim(), false, name, fields)?;
        Ok(())
    }
}

fn positional_target<'a>(ty: &'a ObjectTypeSchema, position: usize, field: &RawField) -> Target<'a> {
    let Some(slot) = ty.slot_at(position) else {
        return Target::Unknown(SmolStr::new(format!("field_{position}")));
    };
    if let Some(annotation) = &field.annotation {
        let label = ty.label_of(slot);
        if !label_matches(annotation, &label) {
            warn!(
                "{}: annotation '{}' does not match field '{}'",
                ty.name(),
                annotation,
                label
            );
        }
    }
    match (slot, ty.field_at(slot)) {
        (FieldSlot::Name, _) => Target::Name,
        (slot, Some(schema)) => Target::Known(ty.key_of(slot), schema),
        (slot, None) => Target::Unknown(ty.key_of(slot)),
    }
}

fn keyed_target<'a>(ty: &'a ObjectTypeSchema, key: &str) -> Target<'a> {
    match ty.resolve_field(key) {
        Some(resolved) => match resolved.schema {
            None => Target::Name,
            Some(schema) => Target::Known(resolved.key, schema),
        },
        None => Target::Unknown(SmolStr::new(key.trim())),
    }
}

/// Compare an annotation with a schema label on letters only.
///
/// Units in braces are ignored, as are digits, so `Vertex 1 X-coordinate {m}`
/// matches `Vertex X-coordinate 1`.
fn label_matches(annotation: &str, label: &str) -> bool {
    let annotation = annotation.split('{').next().unwrap_or_default();
    let letters = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect()
    };
    letters(annotation) == letters(label)
}

fn raw_value(value: RawValue) -> FieldValue {
    match value {
        RawValue::Text(s) => FieldValue::Text(s.trim().to_string()),
        RawValue::Number(n) => FieldValue::Number(n),
        RawValue::Integer(i) => FieldValue::Integer(i),
    }
}
