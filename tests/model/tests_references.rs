//! Reference tracking on whole models.

use crate::helpers::model_assertions::assert_same_objects;
use crate::helpers::{load_fixture, load_text};
use epmodel::{Error, FieldValue};
use rstest::rstest;

#[test]
fn test_fixture_has_no_dangling_references() {
    let doc = load_fixture("small_office.idf");
    assert!(doc.dangling_references().is_empty());
    assert_eq!(doc.referencing("Office").len(), 5);
}

#[rstest]
#[case("Zone", "Office", "Open Office", 5)]
#[case("Material:NoMass", "Insulation R2", "R2 Batt", 2)]
#[case("Schedule:Compact", "Office Occupancy", "Weekday Occupancy", 2)]
#[case("ScheduleTypeLimits", "Fraction", "Unit Interval", 2)]
#[case("ZoneList", "All Zones", "Everywhere", 1)]
fn test_rename_cascades_through_fixture(
    #[case] object_type: &str,
    #[case] old: &str,
    #[case] new: &str,
    #[case] expected: usize,
) {
    let mut doc = load_fixture("small_office.idf");
    let id = doc.get(object_type, old).unwrap().id();
    doc.rename(id, new).unwrap();

    assert!(doc.get(object_type, old).is_none());
    assert_eq!(doc.get(object_type, new).unwrap().id(), id);
    let edges = doc.referencing(new);
    assert_eq!(edges.len(), expected);
    for edge in &edges {
        let source = doc.object(edge.source).unwrap();
        assert_eq!(source.get_str(&edge.field), Some(new));
    }
    assert!(doc.referencing(old).is_empty());
    assert!(doc.dangling_references().is_empty());
}

#[test]
fn test_rename_matches_references_ignoring_case() {
    let mut doc = load_fixture("mixed_case.idf");
    let id = doc.get("Zone", "Core Zone").unwrap().id();
    doc.rename(id, "Atrium").unwrap();
    let lights = doc.get("Lights", "Core Lights").unwrap();
    assert_eq!(
        lights.get("zone_or_zonelist_or_space_or_spacelist_name"),
        Some(&FieldValue::Text("Atrium".into()))
    );
    // the schedule reference was spelled differently and is untouched
    assert_eq!(lights.get_str("schedule_name"), Some("ON"));
}

#[test]
fn test_rename_collision_leaves_model_unchanged() {
    let mut doc = load_fixture("small_office.idf");
    let before = doc.copy();
    let id = doc.get("Construction", "Roof Deck").unwrap().id();
    let err = doc.rename(id, "exterior wall").unwrap_err();
    assert!(matches!(err, Error::DuplicateObject { .. }));
    assert_same_objects(&before, &doc);
}

#[test]
fn test_removing_a_zone_leaves_its_references_dangling() {
    let mut doc = load_fixture("small_office.idf");
    let id = doc.get("Zone", "Office").unwrap().id();
    doc.remove(id).unwrap();

    let dangling = doc.dangling_references();
    assert_eq!(dangling.len(), 5);
    assert!(dangling.iter().all(|edge| edge.target == "Office"));

    // adding the zone back resolves them again
    doc.add("Zone", Some("Office"), Vec::<(&str, f64)>::new(), true)
        .unwrap();
    assert!(doc.dangling_references().is_empty());
}

#[test]
fn test_copies_do_not_share_references() {
    let original = load_text("Version,24.1;\nZone,Z1;\nLights,L1,Z1,,LightingLevel,5;");
    let mut copy = original.copy();
    let id = copy.get("Zone", "Z1").unwrap().id();
    copy.rename(id, "Z2").unwrap();

    assert_eq!(original.referencing("Z1").len(), 1);
    assert!(original.referencing("Z2").is_empty());
    assert_eq!(copy.referencing("Z2").len(), 1);
}
