//! Decoding of schema resources.
//!
//! A resource follows the epJSON schema layout: a top-level `properties`
//! map from object type to a JSON-schema fragment, with the canonical field
//! order and display labels under `legacy_idd`. Only the parts the document
//! engine uses are decoded; everything else is ignored so newer resources
//! keep loading.
//!
//! ```text
//! "Zone": {
//!   "patternProperties": { ".*": { "properties": {..}, "required": [..] } },
//!   "group": "Thermal Zones and Surfaces",
//!   "name": { "is_required": true, "reference": ["ZoneNames"] },
//!   "extensible_size": 3.0,
//!   "legacy_idd": { "fields": [..], "field_info": {..}, "extension": "vertices", "extensibles": [..] }
//! }
//! ```

use super::check::exact_integer;
use super::types::{Bound, FieldKind, FieldSchema, ObjectTypeSchema, SchemaVersion};
use super::Version;
use crate::base::constants::NAME_FIELD;
use crate::base::FieldValue;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// ============================================================================
// RAW RESOURCE SHAPE
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(rename = "epJSON_schema_version")]
    version: Option<String>,
    #[serde(rename = "epJSON_schema_build")]
    build: Option<String>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    properties: IndexMap<String, RawObjectType>,
}

#[derive(Debug, Deserialize)]
struct RawObjectType {
    #[serde(rename = "patternProperties", default)]
    pattern_properties: IndexMap<String, RawObjectBody>,
    group: Option<String>,
    memo: Option<String>,
    name: Option<RawNameField>,
    #[serde(rename = "maxProperties")]
    max_properties: Option<u64>,
    extensible_size: Option<f64>,
    #[serde(default)]
    legacy_idd: RawLegacyIdd,
}

#[derive(Debug, Default, Deserialize)]
struct RawObjectBody {
    #[serde(default)]
    properties: IndexMap<String, RawField>,
    #[serde(default)]
    required: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawNameField {
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    reference: Vec<String>,
}

/// `exclusiveMinimum`/`exclusiveMaximum` appear both as draft-4 flags and
/// as draft-6 values.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawExclusive {
    Flag(bool),
    Value(f64),
}

#[derive(Debug, Default, Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "anyOf", default)]
    any_of: Vec<RawField>,
    #[serde(rename = "enum", default)]
    enum_values: Vec<Value>,
    default: Option<Value>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum")]
    exclusive_minimum: Option<RawExclusive>,
    #[serde(rename = "exclusiveMaximum")]
    exclusive_maximum: Option<RawExclusive>,
    units: Option<String>,
    note: Option<String>,
    #[serde(default)]
    object_list: Vec<String>,
    items: Option<Box<RawObjectBody>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLegacyIdd {
    #[serde(default)]
    field_info: IndexMap<String, RawFieldInfo>,
    #[serde(default)]
    fields: Vec<String>,
    extension: Option<String>,
    #[serde(default)]
    extensibles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFieldInfo {
    field_name: Option<String>,
}

// ============================================================================
// COMPILATION
// ============================================================================

/// Decode a schema resource into an indexed [`SchemaVersion`].
///
/// `expected` is the version the resource was requested as; a mismatching
/// `epJSON_schema_version` is logged but the requested identity wins, since
/// the store addresses resources by location.
pub fn parse_schema(expected: Version, json: &str) -> Result<SchemaVersion> {
    let raw: RawSchema = serde_json::from_str(json).map_err(|e| Error::SchemaLoad {
        version: expected,
        message: e.to_string(),
    })?;

    if let Some(declared) = raw.version.as_deref().and_then(Version::parse) {
        if declared != expected {
            warn!(
                "schema resource for {} declares version {}; using {}",
                expected, declared, expected
            );
        }
    }

    let mut types = IndexMap::with_capacity(raw.properties.len());
    for (type_name, raw_type) in raw.properties {
        let compiled = compile_object_type(&type_name, raw_type);
        types.insert(type_name, compiled);
    }

    let mut schema = SchemaVersion::new(expected, types);
    schema.build = raw.build;
    schema.required_types = raw.required;
    debug!(
        "compiled schema {} with {} object types",
        expected,
        schema.len()
    );
    Ok(schema)
}

fn compile_object_type(type_name: &str, raw: RawObjectType) -> ObjectTypeSchema {
    let RawObjectType {
        mut pattern_properties,
        group,
        memo,
        name,
        max_properties,
        extensible_size,
        legacy_idd,
    } = raw;

    // Every object type has exactly one pattern entry in practice.
    let body = pattern_properties
        .shift_remove(".*")
        .or_else(|| pattern_properties.into_values().next())
        .unwrap_or_default();
    let RawObjectBody {
        mut properties,
        required,
    } = body;

    let label_for = |key: &str| -> String {
        legacy_idd
            .field_info
            .get(key)
            .and_then(|info| info.field_name.clone())
            .unwrap_or_else(|| derive_label(key))
    };

    // Extensible group fields live under the array property named by
    // `legacy_idd.extension`.
    let mut extensible_fields = Vec::new();
    if let Some(extension) = legacy_idd.extension.as_deref() {
        if let Some(array) = properties.shift_remove(extension) {
            let mut item_props = array.items.map(|items| items.properties).unwrap_or_default();
            let order: Vec<String> = if legacy_idd.extensibles.is_empty() {
                item_props.keys().cloned().collect()
            } else {
                legacy_idd.extensibles.clone()
            };
            for key in order {
                let raw_field = item_props.shift_remove(&key).unwrap_or_default();
                extensible_fields.push(compile_field(&key, label_for(&key), raw_field, false));
            }
        } else {
            warn!(
                "{}: extension property '{}' missing from schema",
                type_name, extension
            );
        }
    }

    let is_required = |key: &str| required.iter().any(|r| r == key);

    // Base fields in legacy order, then any properties the legacy order
    // does not mention.
    let mut fields = Vec::new();
    for key in legacy_idd.fields.iter().filter(|k| k.as_str() != NAME_FIELD) {
        let raw_field = properties.shift_remove(key).unwrap_or_default();
        fields.push(compile_field(key, label_for(key), raw_field, is_required(key)));
    }
    for (key, raw_field) in properties {
        let required = is_required(&key);
        fields.push(compile_field(&key, label_for(&key), raw_field, required));
    }

    let size = extensible_size
        .map(|s| s as usize)
        .unwrap_or(extensible_fields.len());
    let named = name.is_some();
    let mut ty = ObjectTypeSchema::build(
        type_name.to_string(),
        named,
        fields,
        extensible_fields,
        size,
    );
    ty.group = group;
    ty.memo = memo;
    ty.unique = max_properties == Some(1);
    if let Some(name) = name {
        ty.name_required = name.is_required;
        ty.references = name.reference;
    }
    ty
}

fn compile_field(key: &str, label: String, raw: RawField, required: bool) -> FieldSchema {
    let mut field = FieldSchema::text(key, &label);
    field.required = required;
    field.units = raw.units.clone();
    field.note = raw.note.clone();
    field.object_list = raw.object_list.clone();

    if raw.any_of.is_empty() {
        field.kind = match raw.kind.as_deref() {
            Some("number") => FieldKind::Number,
            Some("integer") => FieldKind::Integer,
            _ if !raw.enum_values.is_empty() => FieldKind::Enum,
            _ => FieldKind::String,
        };
        if field.kind == FieldKind::Enum {
            field.enum_values = enum_strings(&raw.enum_values);
        }
        apply_bounds(&mut field, &raw);
    } else {
        let numeric = raw
            .any_of
            .iter()
            .find(|b| matches!(b.kind.as_deref(), Some("number") | Some("integer")));
        let textual = raw
            .any_of
            .iter()
            .find(|b| b.kind.as_deref() == Some("string"));
        match numeric {
            Some(numeric) => {
                field.kind = FieldKind::NumberOrSentinel;
                apply_bounds(&mut field, numeric);
                if let Some(textual) = textual {
                    field.sentinels = enum_strings(&textual.enum_values);
                }
            }
            None => {
                field.kind = FieldKind::String;
            }
        }
        // Bounds declared next to `anyOf` apply too.
        apply_bounds(&mut field, &raw);
    }

    field.default = raw.default.as_ref().and_then(|d| default_value(field.kind, d));
    field
}

fn apply_bounds(field: &mut FieldSchema, raw: &RawField) {
    if let Some(min) = raw.minimum {
        let exclusive = matches!(raw.exclusive_minimum, Some(RawExclusive::Flag(true)));
        field.minimum = Some(Bound { value: min, exclusive });
    }
    if let Some(RawExclusive::Value(min)) = raw.exclusive_minimum {
        field.minimum = Some(Bound::exclusive(min));
    }
    if let Some(max) = raw.maximum {
        let exclusive = matches!(raw.exclusive_maximum, Some(RawExclusive::Flag(true)));
        field.maximum = Some(Bound { value: max, exclusive });
    }
    if let Some(RawExclusive::Value(max)) = raw.exclusive_maximum {
        field.maximum = Some(Bound::exclusive(max));
    }
}

fn enum_strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn default_value(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    match value {
        Value::Number(n) if kind == FieldKind::Integer => match n.as_i64() {
            Some(i) => Some(FieldValue::Integer(i)),
            None => n
                .as_f64()
                .map(|f| exact_integer(f).map_or(FieldValue::Number(f), FieldValue::Integer)),
        },
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        _ => None,
    }
}

/// `direction_of_relative_north` → `Direction of Relative North`.
fn derive_label(key: &str) -> String {
    const LOWER: &[&str] = &["a", "and", "for", "of", "or", "per", "to"];
    key.split('_')
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(i, w)| {
            if i > 0 && LOWER.contains(&w) {
                w.to_string()
            } else {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
