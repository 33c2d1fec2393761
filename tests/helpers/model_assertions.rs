//! Assertions over whole documents.

use epmodel::{Document, FieldValue, ObjectRecord};

fn sorted_fields(record: &ObjectRecord) -> Vec<(String, FieldValue)> {
    let mut fields: Vec<_> = record
        .fields()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
}

/// Assert two documents hold the same objects: same types, names, and field
/// values, in the same order within each type.
pub fn assert_same_objects(expected: &Document, actual: &Document) {
    assert_eq!(expected.len(), actual.len(), "object count differs");
    for collection in expected.collections() {
        let other = actual
            .collection(collection.object_type())
            .unwrap_or_else(|| panic!("missing collection {}", collection.object_type()));
        assert_eq!(collection.len(), other.len(), "{}", collection.object_type());
        for (left, right) in collection.iter().zip(other.iter()) {
            assert_eq!(left.object_type(), right.object_type());
            assert_eq!(left.name(), right.name(), "{}", left.object_type());
            assert_eq!(
                sorted_fields(left),
                sorted_fields(right),
                "{} '{}'",
                left.object_type(),
                left.display_name()
            );
        }
    }
}

/// Names of the objects of one type, in collection order.
pub fn names(document: &Document, object_type: &str) -> Vec<String> {
    document
        .collection(object_type)
        .map(|c| c.names().map(str::to_string).collect())
        .unwrap_or_default()
}
