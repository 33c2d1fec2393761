//! Models built through the mutation API, written out and read back.

use crate::helpers::STORE;
use crate::helpers::model_assertions::{assert_same_objects, names};
use epmodel::{
    Document, Error, FieldValue, IssueCode, LoadOptions, StructuredWriteOptions, TextMode,
    TextWriteOptions, Version, validate,
};
use rstest::rstest;

#[derive(Debug, Clone, Copy)]
enum Output {
    Text(TextMode),
    Structured { pretty: bool },
}

fn write_and_read(doc: &Document, output: Output) -> epmodel::Result<Document> {
    match output {
        Output::Text(mode) => {
            let text = doc.to_text(&TextWriteOptions::with_mode(mode));
            Document::load_text(&text, &STORE, &LoadOptions::default())
        }
        Output::Structured { pretty } => {
            let json = doc.to_structured(&StructuredWriteOptions { pretty })?;
            Document::load_structured(&json, &STORE, &LoadOptions::default())
        }
    }
}

fn built_model() -> Document {
    let schema = STORE.load(Version::new(24, 1, 0)).unwrap();
    let mut doc = Document::new(schema);
    doc.add("Version", None, [("version_identifier", "24.1")], true)
        .unwrap();
    doc.add(
        "Zone",
        Some("Perimeter"),
        [
            ("x_origin", FieldValue::from(1.5)),
            ("Multiplier", FieldValue::from(2)),
        ],
        true,
    )
    .unwrap();
    doc.add("Schedule:Constant", Some("Always On"), [("hourly_value", 1.0)], true)
        .unwrap();
    doc.add(
        "People",
        Some("Occupants"),
        [
            ("Zone or ZoneList or Space or SpaceList Name", "Perimeter"),
            ("number_of_people_schedule_name", "Always On"),
            ("activity_level_schedule_name", "Always On"),
        ],
        true,
    )
    .unwrap();
    doc.add(
        "Output:Meter",
        Some("Electricity:Facility"),
        [("field_2", "Hourly")],
        false,
    )
    .unwrap();

    let zone = doc.get("Zone", "Perimeter").unwrap().id();
    doc.rename(zone, "Perimeter East").unwrap();
    let people = doc.get("People", "Occupants").unwrap().id();
    doc.set_field(people, "number_of_people_calculation_method", "People", true)
        .unwrap();
    doc.set_field(people, "Number of People", 2.5, true).unwrap();
    doc
}

#[rstest]
fn test_built_model_round_trips(
    #[values(
        Output::Text(TextMode::Standard),
        Output::Text(TextMode::NoComment),
        Output::Text(TextMode::Compressed),
        Output::Structured { pretty: true },
        Output::Structured { pretty: false }
    )]
    output: Output,
) {
    let doc = built_model();
    let reparsed = write_and_read(&doc, output).unwrap();
    assert_same_objects(&doc, &reparsed);

    let people = reparsed.get("People", "Occupants").unwrap();
    assert_eq!(people.get_f64("number_of_people"), Some(2.5));
    let referrers: Vec<_> = reparsed
        .referrers("Perimeter East")
        .into_iter()
        .filter_map(|record| record.name())
        .collect();
    assert_eq!(referrers, ["Occupants"]);
    assert!(reparsed.referencing("Perimeter").is_empty());
}

#[rstest]
#[case("North, East", "hourly_value", FieldValue::Number(1.0))]
#[case("On!Off", "hourly_value", FieldValue::Number(1.0))]
#[case("Semi;Colon", "hourly_value", FieldValue::Number(1.0))]
#[case("Two\nLines", "hourly_value", FieldValue::Number(1.0))]
#[case("Half", "schedule_type_limits_name", FieldValue::from("Any, Number"))]
#[case("Half", "schedule_type_limits_name", FieldValue::from("Any!"))]
#[case("Half", "hourly_value", FieldValue::Number(f64::NAN))]
#[case("Half", "hourly_value", FieldValue::Number(f64::INFINITY))]
#[case("Half", "hourly_value", FieldValue::Number(f64::NEG_INFINITY))]
fn test_unwritable_values_are_rejected_before_writing(
    #[case] name: &str,
    #[case] field: &str,
    #[case] value: FieldValue,
) {
    let mut doc = built_model();
    let before = doc.len();
    for validate in [true, false] {
        let err = doc
            .add("Schedule:Constant", Some(name), [(field, value.clone())], validate)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFieldValue { .. }), "{err:?}");
    }

    let schedule = doc.get("Schedule:Constant", "Always On").unwrap().id();
    let result = if name.contains([',', ';', '!', '\n']) {
        doc.rename(schedule, name)
    } else {
        doc.set_field(schedule, field, value, false)
    };
    assert!(matches!(result, Err(Error::InvalidFieldValue { .. })), "{result:?}");
    assert_eq!(doc.len(), before);
    assert_eq!(
        doc.object(schedule).unwrap().get("hourly_value"),
        Some(&FieldValue::Number(1.0))
    );

    for output in [
        Output::Text(TextMode::Compressed),
        Output::Structured { pretty: false },
    ] {
        assert_same_objects(&doc, &write_and_read(&doc, output).unwrap());
    }
}

#[test]
fn test_unnamed_objects_of_a_named_type() {
    let mut doc = built_model();
    doc.add("Zone", None, [("x_origin", 3.0)], false).unwrap();
    let json = write_and_read(&doc, Output::Structured { pretty: false }).unwrap();
    assert_same_objects(&doc, &json);

    doc.add("Zone", None, [("x_origin", 4.0)], false).unwrap();
    let text = write_and_read(&doc, Output::Text(TextMode::Compressed)).unwrap();
    assert_same_objects(&doc, &text);
    assert_eq!(text.collection("Zone").unwrap().len(), 3);
    assert_eq!(names(&text, "Zone"), ["Perimeter East"]);

    let err = doc
        .to_structured(&StructuredWriteOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)), "{err:?}");
}

#[rstest]
#[case(FieldValue::Integer(i64::MAX), false)]
#[case(FieldValue::Integer(-9_007_199_254_740_993), false)]
#[case(FieldValue::from("1e30"), true)]
#[case(FieldValue::from("99999999999999999999"), true)]
#[case(FieldValue::Number(-1e19), true)]
fn test_large_integers_survive_both_writers(
    #[case] multiplier: FieldValue,
    #[case] out_of_range: bool,
) {
    let mut doc = built_model();
    let zone = doc.get("Zone", "Perimeter East").unwrap().id();
    doc.set_field(zone, "multiplier", multiplier, false).unwrap();
    let stored = doc.object(zone).unwrap().get("multiplier").cloned().unwrap();
    assert_eq!(matches!(stored, FieldValue::Number(_)), out_of_range);

    for output in [
        Output::Text(TextMode::Compressed),
        Output::Text(TextMode::Standard),
        Output::Structured { pretty: false },
    ] {
        let reparsed = write_and_read(&doc, output).unwrap();
        assert_same_objects(&doc, &reparsed);
        let flagged = validate(&reparsed).into_iter().any(|issue| {
            issue.code == IssueCode::InvalidType && issue.field.as_deref() == Some("multiplier")
        });
        assert_eq!(flagged, out_of_range, "{output:?}");
    }
}
