//! Structured-format (JSON) writer.

use super::options::StructuredWriteOptions;
use super::output_order;
use crate::base::FieldValue;
use crate::base::constants::NAME_FIELD;
use crate::error::{Error, Result};
use crate::model::{Collection, Document, ObjectRecord};
use crate::schema::{FieldSlot, ObjectTypeSchema};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Build the JSON tree of a document.
///
/// Named types map names to field maps; nameless types and types the schema
/// does not define are arrays of field maps, the latter carrying their name
/// under `"name"`. Extensible fields are written as index-suffixed keys.
///
/// Fails when two objects of a named type would share a key (possible only
/// for objects without a name) or a number is not finite.
pub fn to_structured_value(document: &Document) -> Result<Value> {
    let schema = document.schema();
    let mut root = Map::new();
    for collection in output_order(document) {
        let entries = match schema.object_type(collection.object_type()) {
            Some(ty) if ty.is_named() => named_entries(ty, collection)?,
            Some(ty) => Value::Array(
                collection
                    .iter()
                    .map(|record| known_body(ty, record).map(Value::Object))
                    .collect::<Result<_>>()?,
            ),
            None => Value::Array(collection.iter().map(unknown_body).collect::<Result<_>>()?),
        };
        root.insert(collection.object_type().to_string(), entries);
    }
    Ok(Value::Object(root))
}

/// Serialize a document to the structured format.
pub fn to_structured(document: &Document, options: &StructuredWriteOptions) -> Result<String> {
    let value = to_structured_value(document)?;
    let text = if options.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .map_err(|e| Error::json(format!("serialization failed: {e}")))?;
    debug!("wrote {} objects as structured output", document.len());
    Ok(text)
}

fn named_entries(ty: &ObjectTypeSchema, collection: &Collection) -> Result<Value> {
    let mut entries = Map::new();
    for record in collection.iter() {
        let name = record.name().unwrap_or_default();
        if entries.contains_key(name) {
            return Err(Error::json(format!(
                "{} '{}': unnamed objects cannot share a key",
                ty.name(),
                record.display_name()
            )));
        }
        entries.insert(name.to_string(), Value::Object(known_body(ty, record)?));
    }
    Ok(Value::Object(entries))
}

/// Fields of a schema-defined object: known fields in canonical order,
/// then fields the type does not define, as stored.
fn known_body(ty: &ObjectTypeSchema, record: &ObjectRecord) -> Result<Map<String, Value>> {
    let mut ordered: Vec<(usize, &str, &FieldValue)> = Vec::with_capacity(record.len());
    let mut extra: Vec<(&str, &FieldValue)> = Vec::new();
    for (key, value) in record.fields() {
        match ty.resolve_field(key).map(|resolved| resolved.slot) {
            Some(FieldSlot::Name) | None => extra.push((key, value)),
            Some(slot) => ordered.push((ty.position_of(slot), key, value)),
        }
    }
    ordered.sort_by_key(|(position, _, _)| *position);

    let mut body = Map::new();
    let fields = ordered
        .into_iter()
        .map(|(_, key, value)| (key, value))
        .chain(extra);
    for (key, value) in fields {
        body.insert(key.to_string(), json_value(record, key, value)?);
    }
    Ok(body)
}

fn unknown_body(record: &ObjectRecord) -> Result<Value> {
    let mut body = Map::new();
    if let Some(name) = record.name() {
        body.insert(NAME_FIELD.to_string(), Value::String(name.to_string()));
    }
    for (key, value) in record.fields() {
        body.insert(key.to_string(), json_value(record, key, value)?);
    }
    Ok(Value::Object(body))
}

fn json_value(record: &ObjectRecord, key: &str, value: &FieldValue) -> Result<Value> {
    match value {
        FieldValue::Number(n) => Number::from_f64(*n).map(Value::Number).ok_or_else(|| {
            Error::json(format!(
                "{} '{}': field '{}' holds {}, which JSON cannot represent",
                record.object_type(),
                record.display_name(),
                key,
                n
            ))
        }),
        FieldValue::Integer(i) => Ok(Value::from(*i)),
        FieldValue::Text(s) => Ok(Value::String(s.clone())),
    }
}
