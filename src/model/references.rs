//! Bidirectional index of object-list references.
//!
//! Every non-blank value of a reference-marked field is one edge
//! `(source object, source field) → target name`. Edges are keyed by the
//! target's [`NameKey`], never by object identity, so a reference to an
//! object that does not exist yet (or any more) is an ordinary edge.
//! Enables both:
//! - backward lookups: given a name, find every field that references it
//! - forward lookups: given an object, find every name it references

use crate::base::{NameKey, ObjectId};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::trace;

/// One reference edge as seen from outside the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceEdge {
    /// Object holding the reference field.
    pub source: ObjectId,
    /// Canonical key of the reference field.
    pub field: SmolStr,
    /// Target name exactly as stored in the field.
    pub target: String,
}

/// A referencing field; entry in the backward index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Referrer {
    pub(crate) source: ObjectId,
    pub(crate) field: SmolStr,
}

/// Forward and backward reference maps for one document.
///
/// Only [`Document`](super::Document) mutates the graph, always in the same
/// step as the field change that implies the edge.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceGraph {
    /// source → (field → target as stored)
    forward: FxHashMap<ObjectId, IndexMap<SmolStr, String>>,
    /// target key → referencing fields
    backward: FxHashMap<NameKey, FxHashSet<Referrer>>,
}

impl ReferenceGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that `source.field` now references `target`.
    ///
    /// Replaces any previous edge of the same field. A blank target removes
    /// the edge instead.
    pub(crate) fn set_edge(&mut self, source: ObjectId, field: &SmolStr, target: &str) {
        if target.trim().is_empty() {
            self.remove_edge(source, field);
            return;
        }
        trace!(
            "[REF_GRAPH] set_edge: source={} field='{}' target='{}'",
            source, field, target
        );

        let previous = self
            .forward
            .entry(source)
            .or_default()
            .insert(field.clone(), target.to_string());
        if let Some(previous) = previous {
            self.unlink(&NameKey::new(&previous), source, field);
        }
        self.backward
            .entry(NameKey::new(target))
            .or_default()
            .insert(Referrer {
                source,
                field: field.clone(),
            });
    }

    /// Drop the edge of one field, if it has one.
    pub(crate) fn remove_edge(&mut self, source: ObjectId, field: &SmolStr) {
        let Some(fields) = self.forward.get_mut(&source) else {
            return;
        };
        let Some(target) = fields.shift_remove(field) else {
            return;
        };
        trace!(
            "[REF_GRAPH] remove_edge: source={} field='{}' target='{}'",
            source, field, target
        );
        if fields.is_empty() {
            self.forward.remove(&source);
        }
        self.unlink(&NameKey::new(&target), source, field);
    }

    /// Drop every edge whose source is `source`.
    ///
    /// Edges pointing *at* the object are untouched; they dangle.
    pub(crate) fn remove_source(&mut self, source: ObjectId) {
        let Some(fields) = self.forward.remove(&source) else {
            return;
        };
        trace!(
            "[REF_GRAPH] remove_source: source={} edges={}",
            source,
            fields.len()
        );
        for (field, target) in fields {
            self.unlink(&NameKey::new(&target), source, &field);
        }
    }

    /// Point an existing referrer at a new target name.
    pub(crate) fn retarget(&mut self, referrer: &Referrer, new_target: &str) {
        self.set_edge(referrer.source, &referrer.field, new_target);
    }

    fn unlink(&mut self, key: &NameKey, source: ObjectId, field: &SmolStr) {
        if let Some(referrers) = self.backward.get_mut(key) {
            referrers.remove(&Referrer {
                source,
                field: field.clone(),
            });
            if referrers.is_empty() {
                self.backward.remove(key);
            }
        }
    }

    /// Fields referencing `target`, in stable (id, field) order.
    pub(crate) fn referrers(&self, target: &str) -> Vec<Referrer> {
        let mut referrers: Vec<Referrer> = self
            .backward
            .get(&NameKey::new(target))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        referrers.sort();
        referrers
    }

    /// Reference fields of `source` with their stored targets.
    pub(crate) fn targets(&self, source: ObjectId) -> Option<&IndexMap<SmolStr, String>> {
        self.forward.get(&source)
    }

    pub(crate) fn target_of(&self, source: ObjectId, field: &str) -> Option<&str> {
        self.forward
            .get(&source)
            .and_then(|fields| fields.get(field))
            .map(|t| t.as_str())
    }

    /// Whether any field references `target`.
    pub(crate) fn is_referenced(&self, target: &str) -> bool {
        self.backward.contains_key(&NameKey::new(target))
    }

    /// Every edge, grouped by source.
    pub(crate) fn edges(&self) -> impl Iterator<Item = ReferenceEdge> + '_ {
        self.forward.iter().flat_map(|(&source, fields)| {
            fields.iter().map(move |(field, target)| ReferenceEdge {
                source,
                field: field.clone(),
                target: target.clone(),
            })
        })
    }

    /// Total number of edges.
    pub(crate) fn edge_count(&self) -> usize {
        self.forward.values().map(|fields| fields.len()).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}
