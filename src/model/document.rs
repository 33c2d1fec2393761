//! The indexed, schema-bound document.

use super::collection::Collection;
use super::options::FieldLookup;
use super::record::ObjectRecord;
use super::references::{ReferenceEdge, ReferenceGraph, Referrer};
use crate::base::{FieldValue, ObjectId};
use crate::error::{Error, Result};
use crate::schema::{FieldSchema, FieldSlot, ObjectTypeSchema, SchemaVersion, Version};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// A model bound to one schema version.
///
/// Holds one [`Collection`] per object type and the reference graph over
/// all of them. Every mutation updates the collections and the graph in
/// the same call, so the graph always matches the reference fields
/// currently stored.
///
/// Mutation takes `&mut self`. To work on a model from another thread,
/// hand that thread a [`copy`](Self::copy).
#[derive(Debug, Clone)]
pub struct Document {
    schema: Arc<SchemaVersion>,
    /// Lower-cased type name → collection. Collections are never removed,
    /// so indices into this map stay valid.
    collections: IndexMap<String, Collection>,
    /// Object → index of its collection.
    locations: FxHashMap<ObjectId, usize>,
    references: ReferenceGraph,
    next_id: u32,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Document {
    /// An empty document.
    pub fn new(schema: Arc<SchemaVersion>) -> Self {
        Self {
            schema,
            collections: IndexMap::new(),
            locations: FxHashMap::default(),
            references: ReferenceGraph::new(),
            next_id: 0,
        }
    }

    /// A fully independent deep copy sharing only the schema.
    ///
    /// Object ids are preserved.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn schema(&self) -> &Arc<SchemaVersion> {
        &self.schema
    }

    pub fn version(&self) -> Version {
        self.schema.version()
    }

    /// Store a record and index its references.
    ///
    /// `unique_names` is false only for types the schema does not define.
    pub(crate) fn insert_record(
        &mut self,
        object_type: &str,
        unique_names: bool,
        name: Option<String>,
        fields: IndexMap<SmolStr, FieldValue>,
    ) -> Result<ObjectId> {
        let index = self.collection_index(object_type, unique_names);
        let collection = &self.collections[index];
        if let Some(name) = &name {
            if collection.name_taken(name, None).is_some() {
                return Err(Error::duplicate(collection.object_type(), name.as_str()));
            }
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let record = ObjectRecord {
            id,
            object_type: SmolStr::new(collection.object_type()),
            name,
            fields,
        };
        index_record(&mut self.references, &self.schema, &record);
        self.collections[index].insert(record);
        self.locations.insert(id, index);
        Ok(id)
    }

    fn collection_index(&mut self, object_type: &str, unique_names: bool) -> usize {
        let entry = self.collections.entry(object_type.trim().to_lowercase());
        let index = entry.index();
        entry.or_insert_with(|| Collection::new(SmolStr::new(object_type.trim()), unique_names));
        index
    }

    fn record_mut(&mut self, id: ObjectId) -> Option<&mut ObjectRecord> {
        let index = *self.locations.get(&id)?;
        self.collections
            .get_index_mut(index)
            .and_then(|(_, collection)| collection.get_mut(id))
    }

    fn require(&self, id: ObjectId) -> Result<&ObjectRecord> {
        self.object(id).ok_or(Error::ObjectNotFound(id))
    }
}

// ============================================================================
// MUTATION
// ============================================================================

impl Document {
    /// Add a new object.
    ///
    /// Field keys may be given in any spelling [`resolve_field`] accepts; a
    /// `name` key is taken as the object name when `name` is `None`. Unset
    /// base fields receive their schema default.
    ///
    /// With `validate`, an unknown type, an unknown field, a missing required
    /// field, or a value breaking its constraint is an error and nothing is
    /// added. Without it, unknown types and fields are stored verbatim.
    ///
    /// Either way, a name or text value holding `,`, `;`, `!` or a line
    /// break, or a number that is not finite, is rejected.
    ///
    /// [`resolve_field`]: ObjectTypeSchema::resolve_field
    pub fn add<I, K, V>(
        &mut self,
        object_type: &str,
        name: Option<&str>,
        fields: I,
        validate: bool,
    ) -> Result<&ObjectRecord>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let schema = Arc::clone(&self.schema);
        let object_type = object_type.trim();
        let ty = schema.object_type(object_type);
        if ty.is_none() && validate {
            return Err(Error::unknown_type(object_type));
        }

        let mut name = non_blank(name);
        let mut values: IndexMap<SmolStr, FieldValue> = IndexMap::new();
        for (key, value) in fields {
            let key = key.as_ref().trim();
            let value: FieldValue = value.into();
            let Some(ty) = ty else {
                if key.eq_ignore_ascii_case(crate::base::constants::NAME_FIELD) && name.is_none()
                {
                    name = non_blank(Some(&value.to_string()));
                } else if !value.is_blank() {
                    values.insert(SmolStr::new(key), value);
                }
                continue;
            };
            match ty.resolve_field(key) {
                Some(resolved) => match resolved.schema {
                    None => {
                        if name.is_none() {
                            name = non_blank(Some(&value.to_string()));
                        }
                    }
                    Some(field) => {
                        let value = field.canonicalize(value);
                        if !value.is_blank() {
                            values.insert(resolved.key, value);
                        }
                    }
                },
                None if validate => {
                    return Err(Error::unknown_field(
                        ty.name(),
                        name.unwrap_or_default(),
                        key,
                    ));
                }
                None => {
                    if !value.is_blank() {
                        values.insert(SmolStr::new(key), value);
                    }
                }
            }
        }

        let Some(ty) = ty else {
            check_writable_record(object_type, name.as_deref(), &values)?;
            let id = self.insert_record(object_type, false, name, values)?;
            return self.require(id);
        };

        if !ty.is_named() {
            if let Some(given) = name.take() {
                if validate {
                    return Err(Error::unknown_field(ty.name(), given, "name"));
                }
                warn!("{}: name '{}' ignored for nameless type", ty.name(), given);
            }
        }

        for field in ty.fields() {
            if let Some(default) = &field.default {
                if !values.contains_key(&field.key) {
                    values.insert(field.key.clone(), default.clone());
                }
            }
        }

        check_writable_record(ty.name(), name.as_deref(), &values)?;
        if validate {
            check_required(ty, name.as_deref(), &values)?;
            for (key, value) in &values {
                if let Some(field) = ty.resolve_field(key).and_then(|r| r.schema) {
                    check_value(ty, name.as_deref().unwrap_or_default(), key, field, value)?;
                }
            }
        }

        let id = self.insert_record(ty.name(), true, name, values)?;
        debug!("added {} {}", ty.name(), id);
        self.require(id)
    }

    /// Remove an object and the references it holds.
    ///
    /// References *to* the object are left as they are; they dangle until
    /// something with the same name is added again.
    pub fn remove(&mut self, id: ObjectId) -> Result<ObjectRecord> {
        let index = self.locations.remove(&id).ok_or(Error::ObjectNotFound(id))?;
        let record = self
            .collections
            .get_index_mut(index)
            .and_then(|(_, collection)| collection.remove(id))
            .ok_or(Error::ObjectNotFound(id))?;
        self.references.remove_source(id);
        debug!("removed {} '{}'", record.object_type, record.display_name());
        Ok(record)
    }

    /// Rename an object and every reference field that points at it.
    ///
    /// Only references whose object list can hold the object's type are
    /// rewritten; a field naming a same-named object of an unrelated type
    /// keeps its value. The rename either fully applies or, on a name
    /// collision or a name holding `,`, `;`, `!` or a line break, changes
    /// nothing.
    pub fn rename(&mut self, id: ObjectId, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        let record = self.require(id)?;
        let object_type = record.object_type.clone();
        let old_label = record.display_name();
        let schema = Arc::clone(&self.schema);

        if schema
            .object_type(&object_type)
            .is_some_and(|ty| !ty.is_named())
        {
            return Err(Error::invalid_value(
                object_type.as_str(),
                old_label.as_str(),
                "name",
                new_name,
                "object type has no name field",
            ));
        }
        if new_name.is_empty() {
            return Err(Error::invalid_value(
                object_type.as_str(),
                old_label.as_str(),
                "name",
                new_name,
                "name must not be blank",
            ));
        }
        check_writable_name(object_type.as_str(), &old_label, new_name)?;
        let index = *self.locations.get(&id).ok_or(Error::ObjectNotFound(id))?;
        if self.collections[index].name_taken(new_name, Some(id)).is_some() {
            return Err(Error::duplicate(object_type.as_str(), new_name));
        }

        let affected: Vec<Referrer> = match record.name() {
            Some(old) => self
                .references
                .referrers(old)
                .into_iter()
                .filter(|r| self.referrer_accepts(&schema, r, &object_type))
                .collect(),
            None => Vec::new(),
        };

        self.collections[index].rename(id, new_name);
        for referrer in &affected {
            if let Some(source) = self.record_mut(referrer.source) {
                source
                    .fields
                    .insert(referrer.field.clone(), FieldValue::Text(new_name.to_string()));
            }
            self.references.retarget(referrer, new_name);
        }
        debug!(
            "renamed {} '{}' to '{}' ({} references updated)",
            object_type,
            old_label,
            new_name,
            affected.len()
        );
        Ok(())
    }

    /// Whether the field behind `referrer` can point at an object of `target_type`.
    fn referrer_accepts(&self, schema: &SchemaVersion, referrer: &Referrer, target_type: &str) -> bool {
        self.object(referrer.source)
            .and_then(|source| schema.object_type(source.object_type()))
            .and_then(|ty| ty.resolve_field(&referrer.field))
            .and_then(|resolved| resolved.schema)
            .is_some_and(|field| schema.list_accepts(&field.object_list, target_type))
    }

    /// Set one field of an object.
    ///
    /// Setting the name field renames the object. A blank value clears the
    /// field. With `validate`, an unknown field or a value breaking its
    /// constraint is an error and nothing changes.
    pub fn set_field(
        &mut self,
        id: ObjectId,
        field: &str,
        value: impl Into<FieldValue>,
        validate: bool,
    ) -> Result<()> {
        let value: FieldValue = value.into();
        let record = self.require(id)?;
        let label = record.display_name();
        let object_type = record.object_type.clone();
        let schema = Arc::clone(&self.schema);
        let ty = schema.object_type(record.object_type());
        if ty.is_none() && validate {
            return Err(Error::unknown_type(record.object_type()));
        }

        let (key, field_schema) = match ty.map(|ty| (ty, ty.resolve_field(field))) {
            Some((_, Some(resolved))) => match resolved.schema {
                None => return self.rename(id, &value.to_string()),
                Some(field_schema) => (resolved.key, Some(field_schema)),
            },
            Some((ty, None)) if validate => {
                return Err(Error::unknown_field(ty.name(), label, field.trim()));
            }
            _ => (SmolStr::new(field.trim()), None),
        };

        let value = match field_schema {
            Some(field_schema) => field_schema.canonicalize(value),
            None => value,
        };
        if value.is_blank() {
            self.clear_key(id, &key);
            return Ok(());
        }
        check_writable(&object_type, &label, &key, &value)?;
        if let (true, Some(ty), Some(field_schema)) = (validate, ty, field_schema) {
            check_value(ty, &label, &key, field_schema, &value)?;
        }

        let target = value.to_string();
        if let Some(record) = self.record_mut(id) {
            record.fields.insert(key.clone(), value);
        }
        if field_schema.is_some_and(FieldSchema::is_reference) {
            self.references.set_edge(id, &key, &target);
        }
        Ok(())
    }

    /// Unset one field of an object, returning the old value.
    pub fn clear_field(&mut self, id: ObjectId, field: &str) -> Result<Option<FieldValue>> {
        let record = self.require(id)?;
        let resolved = self
            .schema
            .object_type(record.object_type())
            .and_then(|ty| ty.resolve_field(field));
        let key = match resolved {
            Some(resolved) if resolved.slot == FieldSlot::Name => {
                return Err(Error::invalid_value(
                    record.object_type(),
                    record.display_name(),
                    "name",
                    "",
                    "the name cannot be cleared",
                ));
            }
            Some(resolved) => resolved.key,
            None => SmolStr::new(field.trim()),
        };
        Ok(self.clear_key(id, &key))
    }

    fn clear_key(&mut self, id: ObjectId, key: &SmolStr) -> Option<FieldValue> {
        let previous = self.record_mut(id)?.fields.shift_remove(key);
        self.references.remove_edge(id, key);
        previous
    }

    /// Direct access to an object's field map.
    ///
    /// Edits made here bypass the reference graph; call
    /// [`rebuild_references`](Self::rebuild_references) when done.
    pub fn fields_mut(&mut self, id: ObjectId) -> Option<&mut IndexMap<SmolStr, FieldValue>> {
        self.record_mut(id).map(|record| &mut record.fields)
    }

    /// Discard the reference graph and rebuild it from the stored fields.
    pub fn rebuild_references(&mut self) {
        let Self {
            schema,
            collections,
            references,
            ..
        } = self;
        references.clear();
        for record in collections.values().flat_map(Collection::iter) {
            index_record(references, schema, record);
        }
        debug!(
            "rebuilt reference graph: {} edges",
            self.references.edge_count()
        );
    }
}

// ============================================================================
// QUERIES
// ============================================================================

impl Document {
    /// All objects of a type, by type name in any case.
    pub fn collection(&self, object_type: &str) -> Option<&Collection> {
        self.collections
            .get(&object_type.trim().to_lowercase())
            .filter(|c| !c.is_empty())
    }

    /// Look up an object by type and name, both ignoring case.
    pub fn get(&self, object_type: &str, name: &str) -> Option<&ObjectRecord> {
        self.collections
            .get(&object_type.trim().to_lowercase())?
            .get(name)
    }

    /// Look up an object by id.
    pub fn object(&self, id: ObjectId) -> Option<&ObjectRecord> {
        let index = *self.locations.get(&id)?;
        self.collections.get_index(index)?.1.get_by_id(id)
    }

    /// Read a field by any spelling of its name.
    ///
    /// The spelling is resolved against the object's type; the name field
    /// reads as text. Fields stored verbatim are found by their exact key.
    /// A spelling that names nothing is an error under
    /// [`FieldLookup::Strict`] and reads as unset under
    /// [`FieldLookup::Lenient`].
    pub fn field(
        &self,
        id: ObjectId,
        spelling: &str,
        lookup: FieldLookup,
    ) -> Result<Option<FieldValue>> {
        let record = self.require(id)?;
        let resolved = self
            .schema
            .object_type(record.object_type())
            .and_then(|ty| ty.resolve_field(spelling));
        match resolved {
            Some(resolved) if resolved.slot == FieldSlot::Name => {
                Ok(record.name().map(FieldValue::from))
            }
            Some(resolved) => Ok(record.get(&resolved.key).cloned()),
            None => match record.get(spelling.trim()) {
                Some(value) => Ok(Some(value.clone())),
                None if lookup == FieldLookup::Lenient => Ok(None),
                None => Err(Error::unknown_field(
                    record.object_type(),
                    record.display_name(),
                    spelling.trim(),
                )),
            },
        }
    }

    /// Every field that references `name`, ignoring case.
    pub fn referencing(&self, name: &str) -> Vec<ReferenceEdge> {
        self.references
            .referrers(name)
            .into_iter()
            .filter_map(|r| {
                let target = self.references.target_of(r.source, &r.field)?;
                Some(ReferenceEdge {
                    target: target.to_string(),
                    source: r.source,
                    field: r.field,
                })
            })
            .collect()
    }

    /// Objects holding at least one reference to `name`.
    pub fn referrers(&self, name: &str) -> Vec<&ObjectRecord> {
        let mut seen = FxHashSet::default();
        self.references
            .referrers(name)
            .into_iter()
            .filter(|r| seen.insert(r.source))
            .filter_map(|r| self.object(r.source))
            .collect()
    }

    /// References held by one object, in field order.
    pub fn references(&self, id: ObjectId) -> Vec<ReferenceEdge> {
        self.references
            .targets(id)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, target)| ReferenceEdge {
                        source: id,
                        field: field.clone(),
                        target: target.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any field references `name`.
    pub fn is_referenced(&self, name: &str) -> bool {
        self.references.is_referenced(name)
    }

    /// Find the object a reference through `lists` resolves to.
    pub fn resolve_reference(&self, lists: &[String], target: &str) -> Option<&ObjectRecord> {
        lists
            .iter()
            .flat_map(|list| self.schema.types_for_reference_list(list))
            .find_map(|ty| self.get(ty, target))
    }

    /// References whose target does not exist, ordered by source object.
    pub fn dangling_references(&self) -> Vec<ReferenceEdge> {
        let mut dangling: Vec<ReferenceEdge> = self
            .references
            .edges()
            .filter(|edge| {
                let lists = self
                    .object(edge.source)
                    .and_then(|source| self.schema.object_type(source.object_type()))
                    .and_then(|ty| ty.resolve_field(&edge.field))
                    .and_then(|resolved| resolved.schema)
                    .map(|field| field.object_list.as_slice())
                    .unwrap_or_default();
                self.resolve_reference(lists, &edge.target).is_none()
            })
            .collect();
        dangling.sort_by_key(|edge| edge.source);
        dangling
    }

    /// Number of reference edges.
    pub fn reference_count(&self) -> usize {
        self.references.edge_count()
    }

    /// Non-empty collections, in the order their types first appeared.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values().filter(|c| !c.is_empty())
    }

    /// Every object, grouped by collection.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.collections.values().flat_map(Collection::iter)
    }

    /// Type names present in the document.
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.collections().map(Collection::object_type)
    }

    /// Ids of every object, grouped by collection.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.collections.values().flat_map(Collection::ids)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn non_blank(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Add the edges implied by one record's reference fields.
fn index_record(graph: &mut ReferenceGraph, schema: &SchemaVersion, record: &ObjectRecord) {
    let Some(ty) = schema.object_type(record.object_type()) else {
        return;
    };
    for (key, value) in &record.fields {
        let is_reference = ty
            .resolve_field(key)
            .and_then(|resolved| resolved.schema)
            .is_some_and(FieldSchema::is_reference);
        if is_reference {
            graph.set_edge(record.id, key, &value.to_string());
        }
    }
}

/// Characters the text format reads as structure.
const RESERVED_CHARS: &[char] = &[',', ';', '!', '\n', '\r'];

const RESERVED_CONSTRAINT: &str = "must not contain ',', ';', '!' or line breaks";

/// Reject a value that would not survive a write and reparse.
fn check_writable(object_type: &str, name: &str, key: &str, value: &FieldValue) -> Result<()> {
    let constraint = match value {
        FieldValue::Number(n) if !n.is_finite() => "must be a finite number",
        FieldValue::Text(s) if s.contains(RESERVED_CHARS) => RESERVED_CONSTRAINT,
        _ => return Ok(()),
    };
    Err(Error::invalid_value(object_type, name, key, value.to_string(), constraint))
}

fn check_writable_name(object_type: &str, label: &str, name: &str) -> Result<()> {
    if name.contains(RESERVED_CHARS) {
        return Err(Error::invalid_value(
            object_type,
            label,
            "name",
            name,
            RESERVED_CONSTRAINT,
        ));
    }
    Ok(())
}

fn check_writable_record(
    object_type: &str,
    name: Option<&str>,
    values: &IndexMap<SmolStr, FieldValue>,
) -> Result<()> {
    let label = name.unwrap_or_default();
    if let Some(name) = name {
        check_writable_name(object_type, label, name)?;
    }
    values
        .iter()
        .try_for_each(|(key, value)| check_writable(object_type, label, key, value))
}

fn check_required(
    ty: &ObjectTypeSchema,
    name: Option<&str>,
    values: &IndexMap<SmolStr, FieldValue>,
) -> Result<()> {
    let mut missing = Vec::new();
    if ty.is_name_required() && name.is_none() {
        missing.push("name".to_string());
    }
    missing.extend(
        ty.required_fields()
            .filter(|f| !values.contains_key(&f.key))
            .map(|f| f.key.to_string()),
    );
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::RequiredFieldMissing {
        object_type: ty.name().to_string(),
        name: name.unwrap_or_default().to_string(),
        fields: missing,
    })
}

fn check_value(
    ty: &ObjectTypeSchema,
    name: &str,
    key: &str,
    field: &FieldSchema,
    value: &FieldValue,
) -> Result<()> {
    field.check(value).map_err(|violation| {
        Error::invalid_value(ty.name(), name, key, value.to_string(), violation.constraint)
    })
}
