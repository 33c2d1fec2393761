//! Runtime schema types.
//!
//! These are the compiled, indexed form of a schema resource. They are
//! immutable once built and shared between documents through `Arc`.

use super::Version;
use crate::base::constants::NAME_FIELD;
use crate::base::{FieldValue, normalize_field_name};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

// ============================================================================
// FIELDS
// ============================================================================

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Real number.
    Number,
    /// Whole number.
    Integer,
    /// Free text.
    String,
    /// Text restricted to [`FieldSchema::enum_values`].
    Enum,
    /// Number, or one of [`FieldSchema::sentinels`] (e.g. `Autosize`).
    NumberOrSentinel,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::Number | FieldKind::Integer | FieldKind::NumberOrSentinel
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::String => "string",
            FieldKind::Enum => "enum",
            FieldKind::NumberOrSentinel => "number-or-sentinel",
        }
    }
}

/// A numeric bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }

    /// Whether `n` satisfies this bound used as a minimum.
    pub fn admits_above(&self, n: f64) -> bool {
        if self.exclusive {
            n > self.value
        } else {
            n >= self.value
        }
    }

    /// Whether `n` satisfies this bound used as a maximum.
    pub fn admits_below(&self, n: f64) -> bool {
        if self.exclusive {
            n < self.value
        } else {
            n <= self.value
        }
    }
}

/// Definition of one field of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Canonical key (`zone_name`). Extensible fields carry the base key
    /// without the group suffix.
    pub key: SmolStr,
    /// Display label used for annotations (`Zone Name`).
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<FieldValue>,
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    /// Allowed values for [`FieldKind::Enum`].
    pub enum_values: Vec<String>,
    /// Accepted non-numeric strings for [`FieldKind::NumberOrSentinel`].
    pub sentinels: Vec<String>,
    pub units: Option<String>,
    pub note: Option<String>,
    /// Reference lists the value must resolve against. Non-empty marks the
    /// field as an object-list reference.
    pub object_list: Vec<String>,
    pub required: bool,
}

impl FieldSchema {
    /// A plain optional text field.
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: SmolStr::new(key),
            label: label.to_string(),
            kind: FieldKind::String,
            default: None,
            minimum: None,
            maximum: None,
            enum_values: Vec::new(),
            sentinels: Vec::new(),
            units: None,
            note: None,
            object_list: Vec::new(),
            required: false,
        }
    }

    pub fn is_reference(&self) -> bool {
        !self.object_list.is_empty()
    }

    /// Case-insensitive enum membership.
    pub fn enum_contains(&self, value: &str) -> bool {
        self.enum_values
            .iter()
            .any(|v| v.eq_ignore_ascii_case(value.trim()))
    }

    /// Case-insensitive sentinel membership.
    pub fn is_sentinel(&self, value: &str) -> bool {
        self.sentinels
            .iter()
            .any(|v| v.eq_ignore_ascii_case(value.trim()))
    }
}

// ============================================================================
// OBJECT TYPES
// ============================================================================

/// The repeating block of an extensible object type.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensibleGroup {
    /// Fields per repetition.
    pub size: usize,
    /// Positional index (counting the name field) of the first group.
    pub start: usize,
    /// Fields of one repetition, in order.
    pub fields: Vec<FieldSchema>,
}

/// Where a resolved field lives in an object type's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSlot {
    /// The name field of a named type.
    Name,
    /// Index into [`ObjectTypeSchema::fields`].
    Base(usize),
    /// Field `index` of extensible repetition `group` (1-based).
    Extensible { group: usize, index: usize },
}

/// A field spelling resolved against an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    /// Canonical key, including the group suffix for extensible fields.
    pub key: SmolStr,
    pub slot: FieldSlot,
    /// Definition; `None` only for the name field.
    pub schema: Option<&'a FieldSchema>,
}

/// Definition of one object type.
#[derive(Debug, Clone)]
pub struct ObjectTypeSchema {
    pub(crate) name: String,
    pub(crate) group: Option<String>,
    pub(crate) memo: Option<String>,
    pub(crate) named: bool,
    pub(crate) name_required: bool,
    pub(crate) unique: bool,
    /// Reference lists this type's names are members of.
    pub(crate) references: Vec<String>,
    pub(crate) fields: Vec<FieldSchema>,
    pub(crate) extensible: Option<ExtensibleGroup>,
    /// Normalized key or label → slot of a base field (or the name).
    pub(crate) base_index: FxHashMap<String, FieldSlot>,
    /// Normalized key or label → index within the extensible group.
    pub(crate) extensible_index: FxHashMap<String, usize>,
}

impl ObjectTypeSchema {
    /// Assemble a type and build its lookup indices.
    pub(crate) fn build(
        name: String,
        named: bool,
        fields: Vec<FieldSchema>,
        extensible_fields: Vec<FieldSchema>,
        extensible_size: usize,
    ) -> Self {
        let offset = usize::from(named);
        let mut base_index = FxHashMap::default();
        if named {
            base_index.insert(NAME_FIELD.to_string(), FieldSlot::Name);
        }
        for (i, field) in fields.iter().enumerate() {
            base_index
                .entry(normalize_field_name(&field.key))
                .or_insert(FieldSlot::Base(i));
            base_index
                .entry(normalize_field_name(&field.label))
                .or_insert(FieldSlot::Base(i));
        }

        let mut extensible_index = FxHashMap::default();
        let extensible = if extensible_fields.is_empty() {
            None
        } else {
            for (i, field) in extensible_fields.iter().enumerate() {
                extensible_index
                    .entry(normalize_field_name(&field.key))
                    .or_insert(i);
                extensible_index
                    .entry(normalize_field_name(&field.label))
                    .or_insert(i);
            }
            Some(ExtensibleGroup {
                size: extensible_size.max(1),
                start: offset + fields.len(),
                fields: extensible_fields,
            })
        };

        Self {
            name,
            group: None,
            memo: None,
            named,
            name_required: named,
            unique: false,
            references: Vec::new(),
            fields,
            extensible,
            base_index,
            extensible_index,
        }
    }

    /// Canonical type name (`BuildingSurface:Detailed`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group label (`Thermal Zones and Surfaces`).
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Whether objects of this type carry a name field.
    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn is_name_required(&self) -> bool {
        self.named && self.name_required
    }

    /// At most one object of this type may exist in a model.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Reference lists that objects of this type can be referenced through.
    pub fn reference_lists(&self) -> &[String] {
        &self.references
    }

    /// Base fields in canonical order (the name field excluded).
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn extensible(&self) -> Option<&ExtensibleGroup> {
        self.extensible.as_ref()
    }

    /// Base fields flagged as required.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Number of positional slots before the extensible groups, name included.
    pub fn base_len(&self) -> usize {
        usize::from(self.named) + self.fields.len()
    }

    /// Map a positional index (0 = first field after the type) to its slot.
    ///
    /// Returns `None` past the last base field of a non-extensible type.
    pub fn slot_at(&self, position: usize) -> Option<FieldSlot> {
        let offset = usize::from(self.named);
        if self.named && position == 0 {
            return Some(FieldSlot::Name);
        }
        if position < self.base_len() {
            return Some(FieldSlot::Base(position - offset));
        }
        let ext = self.extensible.as_ref()?;
        let rel = position - ext.start;
        Some(FieldSlot::Extensible {
            group: rel / ext.size + 1,
            index: rel % ext.size,
        })
    }

    /// Positional index of a slot; inverse of [`slot_at`](Self::slot_at).
    pub fn position_of(&self, slot: FieldSlot) -> usize {
        match slot {
            FieldSlot::Name => 0,
            FieldSlot::Base(i) => usize::from(self.named) + i,
            FieldSlot::Extensible { group, index } => {
                let (start, size) = self
                    .extensible
                    .as_ref()
                    .map(|e| (e.start, e.size))
                    .unwrap_or((self.base_len(), 1));
                start + (group - 1) * size + index
            }
        }
    }

    /// Canonical key of a slot.
    pub fn key_of(&self, slot: FieldSlot) -> SmolStr {
        match slot {
            FieldSlot::Name => SmolStr::new_static(NAME_FIELD),
            FieldSlot::Base(i) => self.fields[i].key.clone(),
            FieldSlot::Extensible { group, index } => match &self.extensible {
                Some(ext) => SmolStr::new(format!("{}_{}", ext.fields[index].key, group)),
                None => SmolStr::new(format!("field_{}", group)),
            },
        }
    }

    /// Definition behind a slot; `None` for the name field.
    pub fn field_at(&self, slot: FieldSlot) -> Option<&FieldSchema> {
        match slot {
            FieldSlot::Name => None,
            FieldSlot::Base(i) => self.fields.get(i),
            FieldSlot::Extensible { index, .. } => {
                self.extensible.as_ref().and_then(|e| e.fields.get(index))
            }
        }
    }

    /// Display label of a slot, with the group number for extensible fields.
    pub fn label_of(&self, slot: FieldSlot) -> String {
        match (slot, self.field_at(slot)) {
            (FieldSlot::Name, _) => "Name".to_string(),
            (FieldSlot::Extensible { group, .. }, Some(field)) => {
                format!("{} {}", field.label, group)
            }
            (_, Some(field)) => field.label.clone(),
            (_, None) => String::new(),
        }
    }

    /// Resolve any supported spelling of a field to its canonical key.
    ///
    /// Accepts canonical keys (`zone_name`), schema labels (`Zone Name`) in
    /// any case, and index-suffixed extensible keys (`vertex_x_coordinate_3`,
    /// `Vertex X-coordinate 3`). Returns `None` for anything else.
    pub fn resolve_field(&self, spelling: &str) -> Option<ResolvedField<'_>> {
        let normalized = normalize_field_name(spelling);
        if let Some(&slot) = self.base_index.get(&normalized) {
            return Some(ResolvedField {
                key: self.key_of(slot),
                slot,
                schema: self.field_at(slot),
            });
        }

        let ext = self.extensible.as_ref()?;
        let (base, suffix) = normalized.rsplit_once('_')?;
        let group: usize = suffix.parse().ok()?;
        if group == 0 {
            return None;
        }
        let index = *self.extensible_index.get(base)?;
        let slot = FieldSlot::Extensible { group, index };
        Some(ResolvedField {
            key: self.key_of(slot),
            slot,
            schema: ext.fields.get(index),
        })
    }
}

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// One immutable, fully indexed schema release.
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    pub(crate) version: Version,
    pub(crate) build: Option<String>,
    pub(crate) types: IndexMap<String, ObjectTypeSchema>,
    /// Lower-cased type name → index into `types`.
    pub(crate) type_index: FxHashMap<String, usize>,
    /// Reference list → names of the types whose objects belong to it.
    pub(crate) reference_lists: FxHashMap<String, Vec<String>>,
    pub(crate) required_types: Vec<String>,
}

impl SchemaVersion {
    pub(crate) fn new(version: Version, types: IndexMap<String, ObjectTypeSchema>) -> Self {
        let mut type_index = FxHashMap::default();
        let mut reference_lists: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (i, (name, ty)) in types.iter().enumerate() {
            type_index.insert(name.to_lowercase(), i);
            for list in &ty.references {
                reference_lists
                    .entry(list.clone())
                    .or_default()
                    .push(name.clone());
            }
        }
        Self {
            version,
            build: None,
            types,
            type_index,
            reference_lists,
            required_types: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Build identifier recorded in the resource, if any.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Look up an object type by name, ignoring case.
    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeSchema> {
        let index = *self.type_index.get(&name.trim().to_lowercase())?;
        self.types.get_index(index).map(|(_, ty)| ty)
    }

    /// All object types in resource order.
    pub fn object_types(&self) -> impl Iterator<Item = &ObjectTypeSchema> {
        self.types.values()
    }

    /// Number of object types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Names of the types whose objects are members of a reference list.
    pub fn types_for_reference_list(&self, list: &str) -> &[String] {
        self.reference_lists
            .get(list)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a reference through any of `lists` can point at an object of
    /// type `object_type`.
    pub fn list_accepts(&self, lists: &[String], object_type: &str) -> bool {
        lists.iter().any(|list| {
            self.types_for_reference_list(list)
                .iter()
                .any(|t| t.eq_ignore_ascii_case(object_type))
        })
    }

    /// Object types a valid model must contain.
    pub fn required_types(&self) -> &[String] {
        &self.required_types
    }
}
