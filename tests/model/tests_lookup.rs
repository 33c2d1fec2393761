//! Loading fixtures and looking objects up.

use crate::helpers::model_assertions::names;
use crate::helpers::{STORE, all_fixtures, load_fixture, load_text};
use epmodel::{Document, FieldLookup, FieldValue, LoadOptions};
use std::time::{Duration, Instant};

#[test]
fn test_every_fixture_loads() {
    for path in all_fixtures() {
        let doc = Document::from_path(&path, &STORE, &LoadOptions::default())
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert!(!doc.is_empty(), "{}", path.display());
        assert_eq!(doc.version().to_string(), "24.1.0");
    }
}

#[test]
fn test_small_office_contents() {
    let doc = load_fixture("small_office.idf");
    assert_eq!(doc.len(), 24);
    assert_eq!(
        names(&doc, "BuildingSurface:Detailed"),
        ["Office Wall South", "Office Roof", "Office Floor"]
    );

    let wall = doc.get("buildingsurface:detailed", "OFFICE WALL SOUTH").unwrap();
    assert_eq!(wall.get_f64("vertex_z_coordinate_1"), Some(3.0));
    assert_eq!(wall.get_f64("vertex_x_coordinate_4"), Some(10.0));
    assert!(!wall.contains("space_name"));

    let building = doc.collection("Building").unwrap().first().unwrap();
    assert_eq!(building.get("maximum_number_of_warmup_days"), Some(&FieldValue::Integer(25)));

    let compact = doc.get("Schedule:Compact", "Office Occupancy").unwrap();
    assert_eq!(compact.get_str("field_1"), Some("Through: 12/31"));
    assert_eq!(compact.get_str("field_4"), Some("0.8"));
}

#[test]
fn test_field_spellings_resolve_to_the_same_value() {
    let doc = load_fixture("small_office.idf");
    let id = doc.get("Zone", "Office").unwrap().id();
    for spelling in ["ceiling_height", "Ceiling Height", "CEILING HEIGHT"] {
        assert_eq!(
            doc.field(id, spelling, FieldLookup::Strict).unwrap(),
            Some(FieldValue::Text("Autocalculate".into())),
            "{spelling}"
        );
    }
    assert!(doc.field(id, "wingspan", FieldLookup::Strict).is_err());
    assert_eq!(doc.field(id, "wingspan", FieldLookup::Lenient).unwrap(), None);
}

#[test]
fn test_mixed_case_fixture_uses_canonical_type_names() {
    let doc = load_fixture("mixed_case.idf");
    let types: Vec<_> = doc.object_types().collect();
    assert_eq!(
        types,
        ["Version", "Zone", "Schedule:Constant", "Lights", "Output:Meter"]
    );
    assert!(doc.get("ZONE", "core zone").is_some());
    assert_eq!(names(&doc, "zone"), ["Core Zone", "Perimeter Zone"]);
    assert_eq!(
        doc.get("Zone", "Perimeter Zone").unwrap().get_f64("x_origin"),
        Some(5.0)
    );
}

#[test]
fn test_structured_fixture_contents() {
    let doc = load_fixture("shoebox.epJSON");
    let zone = doc.get("Zone", "Box").unwrap();
    assert_eq!(zone.get("multiplier"), Some(&FieldValue::Integer(2)));
    let wall = doc.get("BuildingSurface:Detailed", "Box North Wall").unwrap();
    assert_eq!(wall.get_f64("vertex_y_coordinate_3"), Some(5.0));
    assert_eq!(doc.referencing("Box").len(), 1);
}

fn zones_text(count: usize) -> String {
    let mut text = String::from("Version,24.1;\n");
    for i in 0..count {
        text.push_str(&format!("Zone,Zone {i};\n"));
    }
    text
}

/// Best of several runs of `samples` lookups spread over the document.
fn lookup_time(doc: &Document, count: usize, samples: usize) -> Duration {
    let names: Vec<String> = (0..samples)
        .map(|i| format!("ZONE {}", i * count / samples))
        .collect();
    (0..5)
        .map(|_| {
            let start = Instant::now();
            for name in &names {
                assert!(doc.get("Zone", name).is_some());
            }
            start.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[test]
fn test_lookup_time_does_not_grow_with_collection_size() {
    let small = load_text(&zones_text(1_000));
    let large = load_text(&zones_text(100_000));
    assert_eq!(large.collection("Zone").unwrap().len(), 100_000);

    let small_time = lookup_time(&small, 1_000, 1_000);
    let large_time = lookup_time(&large, 100_000, 1_000);
    // A linear scan would be about 100 times slower.
    assert!(
        large_time <= small_time * 20 + Duration::from_millis(5),
        "small: {small_time:?}, large: {large_time:?}"
    );
}
