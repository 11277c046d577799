use gss_model::{ColumnLayout, FieldDescriptor, FieldType, LayoutError};

fn year_age_layout() -> ColumnLayout {
    ColumnLayout::new(vec![
        FieldDescriptor::new("year", 0, Some(4), FieldType::Integer)
            .with_format("%8.0g")
            .with_description("gss year for this respondent"),
        FieldDescriptor::new("age", 4, Some(6), FieldType::Integer),
        FieldDescriptor::new("wtssall", 6, None, FieldType::Real),
    ])
    .expect("valid layout")
}

#[test]
fn layout_lookup_is_case_insensitive() {
    let layout = year_age_layout();
    assert_eq!(layout.len(), 3);
    assert_eq!(layout.position("AGE"), Some(1));
    assert_eq!(layout.field("Year").map(|f| f.start), Some(0));
    assert!(layout.field("sex").is_none());
    assert_eq!(layout.names().collect::<Vec<_>>(), vec!["year", "age", "wtssall"]);
}

#[test]
fn max_end_ignores_open_ended_fields() {
    let layout = year_age_layout();
    assert_eq!(layout.max_end(), Some(6));
    assert_eq!(layout.record_length(), None);
    let layout = layout.with_record_length(Some(12));
    assert_eq!(layout.record_length(), Some(12));
}

#[test]
fn duplicate_names_are_rejected() {
    let err = ColumnLayout::new(vec![
        FieldDescriptor::new("age", 0, Some(2), FieldType::Integer),
        FieldDescriptor::new("age", 2, Some(4), FieldType::Integer),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        LayoutError::DuplicateField {
            name: "age".to_string()
        }
    );
}

#[test]
fn empty_spans_are_rejected() {
    let err = ColumnLayout::new(vec![FieldDescriptor::new(
        "age",
        4,
        Some(4),
        FieldType::Integer,
    )])
    .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidSpan { start: 4, end: 4, .. }));
}

#[test]
fn layout_serializes_with_lowercase_types() {
    let layout = year_age_layout();
    let json = serde_json::to_value(&layout).expect("serialize layout");
    assert_eq!(json["fields"][0]["field_type"], "integer");
    assert_eq!(json["fields"][2]["end"], serde_json::Value::Null);
    let round: ColumnLayout = serde_json::from_value(json).expect("deserialize layout");
    assert_eq!(round, layout);
}

#[test]
fn names_differing_only_in_case_collide() {
    let err = ColumnLayout::new(vec![
        FieldDescriptor::new("AGE", 0, Some(2), FieldType::Integer),
        FieldDescriptor::new("age", 2, Some(4), FieldType::Integer),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        LayoutError::DuplicateField {
            name: "age".to_string()
        }
    );
}

#[test]
fn names_are_stored_lower_cased() {
    let layout = ColumnLayout::new(vec![
        FieldDescriptor::new("Year", 0, Some(4), FieldType::Integer),
        FieldDescriptor::new("REALINC", 4, None, FieldType::Real),
    ])
    .expect("valid layout");
    assert_eq!(layout.names().collect::<Vec<_>>(), vec!["year", "realinc"]);
    assert_eq!(layout.field("RealInc").map(|f| f.start), Some(4));
}

#[test]
fn deserializing_validates_the_layout() {
    let duplicate = serde_json::json!({
        "fields": [
            {"name": "age", "start": 0, "end": 2, "field_type": "integer",
             "format": "", "description": ""},
            {"name": "AGE", "start": 2, "end": 4, "field_type": "integer",
             "format": "", "description": ""}
        ],
        "record_length": null
    });
    assert!(serde_json::from_value::<ColumnLayout>(duplicate).is_err());

    let empty_span = serde_json::json!({
        "fields": [
            {"name": "age", "start": 4, "end": 4, "field_type": "integer",
             "format": "", "description": ""}
        ]
    });
    assert!(serde_json::from_value::<ColumnLayout>(empty_span).is_err());

    let lrecl = serde_json::json!({
        "fields": [
            {"name": "Year", "start": 0, "end": 4, "field_type": "integer",
             "format": "%8.0g", "description": ""}
        ],
        "record_length": 12
    });
    let layout: ColumnLayout = serde_json::from_value(lrecl).expect("valid layout");
    assert_eq!(layout.record_length(), Some(12));
    assert_eq!(layout.names().collect::<Vec<_>>(), vec!["year"]);
}
