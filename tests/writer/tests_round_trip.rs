//! Writing fixtures back out and reading them again.

use crate::helpers::model_assertions::assert_same_objects;
use crate::helpers::{STORE, all_fixtures, load_fixture};
use epmodel::{
    Document, Error, LoadOptions, StructuredWriteOptions, TextMode, TextWriteOptions,
};
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
#[case(TextMode::Standard)]
#[case(TextMode::NoComment)]
#[case(TextMode::Compressed)]
fn test_text_round_trip_of_every_fixture(#[case] mode: TextMode) {
    for path in all_fixtures() {
        let doc = Document::from_path(&path, &STORE, &LoadOptions::default()).unwrap();
        let text = doc.to_text(&TextWriteOptions::with_mode(mode));
        let reparsed = Document::load_text(&text, &STORE, &LoadOptions::default())
            .unwrap_or_else(|e| panic!("{}: {e}\n{text}", path.display()));
        assert_same_objects(&doc, &reparsed);
    }
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_structured_round_trip_of_every_fixture(#[case] pretty: bool) {
    for path in all_fixtures() {
        let doc = Document::from_path(&path, &STORE, &LoadOptions::default()).unwrap();
        let json = doc.to_structured(&StructuredWriteOptions { pretty }).unwrap();
        let reparsed = Document::load_structured(&json, &STORE, &LoadOptions::default())
            .unwrap_or_else(|e| panic!("{}: {e}\n{json}", path.display()));
        assert_same_objects(&doc, &reparsed);
    }
}

#[test]
fn test_edits_survive_a_round_trip() {
    let mut doc = load_fixture("small_office.idf");
    let zone = doc.get("Zone", "Office").unwrap().id();
    doc.rename(zone, "Open Office").unwrap();
    let wall = doc.get("BuildingSurface:Detailed", "Office Wall South").unwrap().id();
    doc.set_field(wall, "View Factor to Ground", 0.25, true).unwrap();
    doc.set_field(wall, "vertex_z_coordinate_5", 1.5, true).unwrap();

    let reparsed = Document::load_text(
        &doc.to_text(&TextWriteOptions::default()),
        &STORE,
        &LoadOptions::default(),
    )
    .unwrap();
    assert_same_objects(&doc, &reparsed);
    let wall = reparsed.get("BuildingSurface:Detailed", "Office Wall South").unwrap();
    assert_eq!(wall.get_str("zone_name"), Some("Open Office"));
    assert_eq!(wall.get_f64("view_factor_to_ground"), Some(0.25));
    assert_eq!(wall.get_f64("vertex_z_coordinate_5"), Some(1.5));
    assert!(!wall.contains("vertex_x_coordinate_5"));
}

#[test]
fn test_converting_between_formats_through_files() {
    let dir = TempDir::new().unwrap();
    let doc = load_fixture("small_office.idf");

    let json_path = dir.path().join("small_office.epJSON");
    doc.write_path(&json_path).unwrap();
    let from_json = Document::from_path(&json_path, &STORE, &LoadOptions::default()).unwrap();
    assert_same_objects(&doc, &from_json);

    let idf_path = dir.path().join("converted.idf");
    from_json.write_path(&idf_path).unwrap();
    let from_idf = Document::from_path(&idf_path, &STORE, &LoadOptions::default()).unwrap();
    assert_same_objects(&doc, &from_idf);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let doc = load_fixture("small_office.idf");
    let err = doc.write_path(dir.path().join("model.xml")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert!(!dir.path().join("model.xml").exists());
}

#[test]
fn test_writes_are_deterministic() {
    let doc = load_fixture("small_office.idf");
    let options = TextWriteOptions::default();
    assert_eq!(doc.to_text(&options), doc.copy().to_text(&options));
    let json = StructuredWriteOptions::default();
    assert_eq!(doc.to_structured(&json).unwrap(), doc.copy().to_structured(&json).unwrap());
}
