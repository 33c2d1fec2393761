//! Parsing the fixture models without binding them to a schema.

use crate::helpers::{fixture, fixtures_with_extension};
use epmodel::Version;
use epmodel::parser::{RawValue, detect_version, parse_structured, parse_text};
use std::fs;

#[test]
fn test_every_text_fixture_parses_and_declares_a_version() {
    let paths = fixtures_with_extension("idf");
    assert!(paths.len() >= 3, "fixtures missing: {paths:?}");
    for path in paths {
        let input = fs::read_to_string(&path).unwrap();
        let objects = parse_text(&input).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert!(!objects.is_empty(), "{}", path.display());
        assert_eq!(
            detect_version(&objects),
            Some(Version::new(24, 1, 0)),
            "{}",
            path.display()
        );
    }
}

#[test]
fn test_small_office_objects_and_lines() {
    let input = fs::read_to_string(fixture("small_office.idf")).unwrap();
    let objects = parse_text(&input).unwrap();
    assert_eq!(objects.len(), 24);

    let building = objects.iter().find(|o| o.object_type == "Building").unwrap();
    assert_eq!(building.line, Some(9));
    assert_eq!(building.fields.len(), 8);
    assert_eq!(building.fields[0].annotation.as_deref(), Some("Name"));
    assert_eq!(
        building.fields[1].annotation.as_deref(),
        Some("North Axis {deg}")
    );

    let wall = objects
        .iter()
        .find(|o| o.fields.first().is_some_and(|f| f.value.to_text() == "Office Wall South"))
        .unwrap();
    // name + 10 base fields + 4 vertices of 3 coordinates
    assert_eq!(wall.fields.len(), 23);
    assert!(wall.fields[4].value.is_blank());
}

#[test]
fn test_crlf_input_keeps_line_numbers() {
    let input = fs::read_to_string(fixture("mixed_case.idf")).unwrap();
    let objects = parse_text(&input).unwrap();
    let lines: Vec<_> = objects.iter().map(|o| o.line.unwrap()).collect();
    assert_eq!(lines, [1, 3, 4, 5, 6, 7]);
    assert_eq!(objects[2].fields[1].value, RawValue::Text("0".into()));
}

#[test]
fn test_structured_fixture_flattens_vertices() {
    let input = fs::read_to_string(fixture("shoebox.epJSON")).unwrap();
    let objects = parse_structured(&input).unwrap();
    assert_eq!(detect_version(&objects), Some(Version::new(24, 1, 0)));

    let wall = objects
        .iter()
        .find(|o| o.object_type == "BuildingSurface:Detailed")
        .unwrap();
    assert_eq!(wall.name.as_deref(), Some("Box North Wall"));
    assert_eq!(
        wall.keyed("vertex_z_coordinate_4").unwrap().value,
        RawValue::Number(3.0)
    );
}

#[test]
fn test_truncated_fixture_reports_object_start() {
    let input = fs::read_to_string(fixture("small_office.idf")).unwrap();
    let cut = input.find("Zone,Office").unwrap() + "Zone,Office,0,0".len();
    let err = parse_text(&input[..cut]).unwrap_err();
    assert_eq!(err.object_type.as_deref(), Some("Zone"));
    let expected_line = input[..cut].lines().count();
    assert_eq!(err.line, expected_line);
}
