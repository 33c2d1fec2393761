//! Validating the fixture models.

use crate::helpers::{fixture, load_fixture};
use epmodel::{IssueCode, Severity, Validator};

#[test]
fn test_clean_fixtures_have_no_issues() {
    for name in ["small_office.idf", "shoebox.epJSON"] {
        let doc = load_fixture(name);
        let issues = doc.validate();
        assert!(issues.is_empty(), "{}: {issues:#?}", fixture(name).display());
    }
}

#[test]
fn test_broken_fixture_issues() {
    let doc = load_fixture("warehouse_broken.idf");
    let issues = doc.validate();
    let found: Vec<_> = issues
        .iter()
        .map(|i| (i.code, i.object_type.as_str(), i.field.as_deref()))
        .collect();
    assert_eq!(
        found,
        [
            (
                IssueCode::DanglingReference,
                "Lights",
                Some("zone_or_zonelist_or_space_or_spacelist_name")
            ),
            (IssueCode::DanglingReference, "Lights", Some("schedule_name")),
            (IssueCode::RequiredFieldMissing, "Material", Some("conductivity")),
            (IssueCode::OutOfRange, "Timestep", Some("number_of_timesteps_per_hour")),
        ]
    );
    assert!(issues.iter().all(|i| i.severity == Severity::Error));
    assert!(issues[0].message.contains("Loading Dock"));
    assert_eq!(issues[3].object_name, None);
}

#[test]
fn test_mixed_case_fixture_is_a_fragment() {
    let doc = load_fixture("mixed_case.idf");

    let codes: Vec<_> = doc.validate().iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        [
            IssueCode::RequiredObjectMissing,
            IssueCode::RequiredObjectMissing,
            IssueCode::UnknownObjectType
        ]
    );

    let fragment = Validator::new(&doc).without_required_objects().check_all();
    assert_eq!(fragment.len(), 1);
    assert_eq!(fragment[0].severity, Severity::Warning);
}

#[test]
fn test_issues_render_with_location() {
    let doc = load_fixture("warehouse_broken.idf");
    let rendered: Vec<String> = doc.validate().iter().map(ToString::to_string).collect();
    assert!(rendered.contains(
        &"error[E0001] Material 'Slab', field 'conductivity': required field is not set"
            .to_string()
    ));
}
