use super::record::ObjectRecord;
use crate::base::{NameKey, ObjectId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// All objects of one type, in insertion order, indexed by name.
#[derive(Debug, Clone)]
pub struct Collection {
    object_type: SmolStr,
    /// Whether names must be unique. False for types the schema does not
    /// know, where the first field only looks like a name.
    unique_names: bool,
    records: IndexMap<ObjectId, ObjectRecord>,
    by_name: FxHashMap<NameKey, ObjectId>,
}

impl Collection {
    pub(crate) fn new(object_type: SmolStr, unique_names: bool) -> Self {
        Self {
            object_type,
            unique_names,
            records: IndexMap::new(),
            by_name: FxHashMap::default(),
        }
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up an object by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ObjectRecord> {
        let id = self.by_name.get(&NameKey::new(name))?;
        self.records.get(id)
    }

    pub fn get_by_id(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.records.get(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(&NameKey::new(name))
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.values()
    }

    /// Names of the named objects, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.values().filter_map(|r| r.name())
    }

    pub fn first(&self) -> Option<&ObjectRecord> {
        self.records.values().next()
    }

    /// Id holding `name`, when it is taken by an object other than `except`.
    pub(crate) fn name_taken(&self, name: &str, except: Option<ObjectId>) -> Option<ObjectId> {
        if !self.unique_names {
            return None;
        }
        self.by_name
            .get(&NameKey::new(name))
            .copied()
            .filter(|&id| Some(id) != except)
    }

    /// Insert a record. The caller has checked the name is free.
    pub(crate) fn insert(&mut self, record: ObjectRecord) {
        if let Some(name) = record.name() {
            let key = NameKey::new(name);
            if !key.is_empty() {
                self.by_name.entry(key).or_insert(record.id);
            }
        }
        self.records.insert(record.id, record);
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        let record = self.records.shift_remove(&id)?;
        if let Some(name) = record.name() {
            self.unindex(NameKey::new(name), id);
        }
        Some(record)
    }

    /// Move a record's index entry to its new name and store the name.
    pub(crate) fn rename(&mut self, id: ObjectId, new_name: &str) {
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };
        if let Some(old) = record.name.replace(new_name.to_string()) {
            self.unindex(NameKey::new(&old), id);
        }
        let key = NameKey::new(new_name);
        if self.unique_names {
            self.by_name.insert(key, id);
        } else {
            self.reindex(key);
        }
    }

    /// Drop `id` from the entry for `key`. Without unique names another
    /// record may share the key; the entry then moves to it.
    fn unindex(&mut self, key: NameKey, id: ObjectId) {
        if self.by_name.get(&key) != Some(&id) {
            return;
        }
        if self.unique_names {
            self.by_name.remove(&key);
        } else {
            self.reindex(key);
        }
    }

    /// Point `key` at the first record, in insertion order, carrying it.
    fn reindex(&mut self, key: NameKey) {
        let first = self
            .records
            .values()
            .find(|record| record.name().is_some_and(|name| NameKey::new(name) == key))
            .map(ObjectRecord::id);
        match first {
            Some(id) => self.by_name.insert(key, id),
            None => self.by_name.remove(&key),
        };
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectRecord> {
        self.records.get_mut(&id)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.records.keys().copied()
    }
}
