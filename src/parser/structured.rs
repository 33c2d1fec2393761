//! Parser for the structured (JSON) model format.
//!
//! ```json
//! {
//!   "Version": [ { "version_identifier": "24.1" } ],
//!   "Zone": { "Z1": { "x_origin": 0.0 } },
//!   "BuildingSurface:Detailed": {
//!     "Wall 1": { "vertex_x_coordinate_1": 0.0, "vertex_y_coordinate_1": 0.0 }
//!   }
//! }
//! ```
//!
//! Named types map object names to field maps; nameless types hold an
//! ordered array of field maps. Extensible groups are index-suffixed keys.
//! Arrays of group objects (`"vertices": [{..}, {..}]`) are accepted too and
//! flattened into the suffixed form. Field keys are not checked here.

use super::ir::{RawField, RawObject, RawValue};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Split structured-format input into raw objects.
pub fn parse_structured(input: &str) -> Result<Vec<RawObject>> {
    let root: Value =
        serde_json::from_str(input).map_err(|e| Error::json(format!("parse error: {e}")))?;
    let Value::Object(root) = root else {
        return Err(Error::json("expected an object mapping object types to objects"));
    };

    let mut objects = Vec::new();
    for (object_type, entries) in root {
        match entries {
            Value::Object(named) => {
                for (name, body) in named {
                    let Value::Object(body) = body else {
                        return Err(Error::json(format!(
                            "{object_type} '{name}': expected a field mapping"
                        )));
                    };
                    let mut raw = RawObject::new(object_type.clone());
                    raw.name = Some(name);
                    raw.fields = flatten_fields(&object_type, body);
                    objects.push(raw);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.into_iter().enumerate() {
                    let Value::Object(body) = item else {
                        return Err(Error::json(format!(
                            "{object_type}[{i}]: expected a field mapping"
                        )));
                    };
                    let mut raw = RawObject::new(object_type.clone());
                    raw.fields = flatten_fields(&object_type, body);
                    objects.push(raw);
                }
            }
            _ => {
                return Err(Error::json(format!(
                    "{object_type}: expected a mapping of names or an array of objects"
                )));
            }
        }
    }

    debug!("parsed {} objects from structured input", objects.len());
    Ok(objects)
}

fn flatten_fields(object_type: &str, body: Map<String, Value>) -> Vec<RawField> {
    let mut fields = Vec::with_capacity(body.len());
    for (key, value) in body {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for (i, item) in items.into_iter().enumerate() {
                    let group = i + 1;
                    match item {
                        Value::Object(group_fields) => {
                            for (sub_key, sub_value) in group_fields {
                                if let Some(value) = scalar(sub_value) {
                                    fields.push(RawField::keyed(format!("{sub_key}_{group}"), value));
                                }
                            }
                        }
                        other => {
                            if let Some(value) = scalar(other) {
                                fields.push(RawField::keyed(format!("{key}_{group}"), value));
                            }
                        }
                    }
                }
            }
            Value::Object(_) => {
                warn!("{}: nested object in field '{}' ignored", object_type, key);
            }
            other => {
                if let Some(value) = scalar(other) {
                    fields.push(RawField::keyed(key, value));
                }
            }
        }
    }
    fields
}

fn scalar(value: Value) -> Option<RawValue> {
    match value {
        Value::String(s) => Some(RawValue::Text(s)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(RawValue::Integer(i)),
            None => n.as_f64().map(RawValue::Number),
        },
        Value::Bool(b) => Some(RawValue::Text(if b { "Yes" } else { "No" }.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
