use std::fs;

use gss_dct::{DctError, parse_dictionary_lines, parse_dictionary_str, read_dictionary};
use gss_model::{FieldType, LayoutError};

const GSS_DCT: &str = r#"infile dictionary {
* GSS extract, generated by the GSS Data Explorer
  _column(1)    int       year     %8.0g  "GSS year for this respondent"
  _column(5)    int       ID_      %8.0g  "Respondent id number"

  _column(9)    byte      age      %8.0g  "Age of respondent"
  _column(11)   double    wtssall  %12.0g "Weight variable"
}
"#;

#[test]
fn derives_end_offsets_from_next_start() {
    let layout = parse_dictionary_str(GSS_DCT).expect("parse dictionary");
    assert_eq!(layout.len(), 4);

    let spans: Vec<(&str, usize, Option<usize>)> = layout
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.start, f.end))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("year", 0, Some(4)),
            ("id_", 4, Some(8)),
            ("age", 8, Some(10)),
            ("wtssall", 10, None),
        ]
    );

    for pair in layout.fields().windows(2) {
        assert_eq!(pair[0].end, Some(pair[1].start));
    }
}

#[test]
fn stored_start_is_declared_start_minus_one() {
    let declared = [1usize, 3, 10, 42];
    let lines: Vec<String> = declared
        .iter()
        .enumerate()
        .map(|(i, start)| format!("_column({start}) long var{i} %8.0g \"v{i}\""))
        .collect();
    let layout = parse_dictionary_lines(&lines).expect("parse");
    for (field, start) in layout.fields().iter().zip(declared) {
        assert_eq!(field.start, start - 1);
    }
}

#[test]
fn keeps_format_and_description() {
    let layout = parse_dictionary_str(GSS_DCT).expect("parse dictionary");
    let year = layout.field("year").expect("year field");
    assert_eq!(year.field_type, FieldType::Integer);
    assert_eq!(year.format, "%8.0g");
    assert_eq!(year.description, "GSS year for this respondent");
    let weight = layout.field("wtssall").expect("weight field");
    assert_eq!(weight.field_type, FieldType::Real);
}

#[test]
fn lrecl_bounds_the_last_field() {
    let text = "dictionary {\n _lrecl(14)\n _column(1) int year %8.0g\n _column(5) str10 region %10s \"Region\"\n}\n";
    let layout = parse_dictionary_str(text).expect("parse dictionary");
    assert_eq!(layout.record_length(), Some(14));
    let region = layout.field("region").expect("region");
    assert_eq!(region.field_type, FieldType::Text);
    assert_eq!((region.start, region.end), (4, Some(14)));
}

#[test]
fn maps_every_declared_type() {
    let tokens = [
        ("byte", FieldType::Integer),
        ("int", FieldType::Integer),
        ("long", FieldType::Integer),
        ("float", FieldType::Real),
        ("double", FieldType::Real),
        ("numeric", FieldType::Real),
        ("str", FieldType::Text),
        ("str80", FieldType::Text),
    ];
    let lines: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(i, (token, _))| format!("_column({}) {token} v{i} %9s", i * 2 + 1))
        .collect();
    let layout = parse_dictionary_lines(&lines).expect("parse");
    for (field, (_, expected)) in layout.fields().iter().zip(tokens) {
        assert_eq!(field.field_type, expected, "field {}", field.name);
    }
}

#[test]
fn unknown_type_is_fatal() {
    let text = "_column(1) int year %8.0g\n_column(5) date when %td \"Interview date\"\n";
    let err = parse_dictionary_str(text).unwrap_err();
    match err {
        DctError::UnknownType { line, token } => {
            assert_eq!(line, 2);
            assert_eq!(token, "date");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_column_marker_is_fatal() {
    let text = "_column(1) int year %8.0g\n_column(x5) int age %8.0g\n";
    let err = parse_dictionary_str(text).unwrap_err();
    assert!(matches!(
        err,
        DctError::MalformedColumnMarker { line: 2, ref content } if content == "x5"
    ));
}

#[test]
fn short_column_lines_are_skipped() {
    let text = "_column(1) int year %8.0g\n_column(5) int\n_column(9) byte age %8.0g\n";
    let layout = parse_dictionary_str(text).expect("parse");
    assert_eq!(layout.names().collect::<Vec<_>>(), vec!["year", "age"]);
    assert_eq!(layout.fields()[0].end, Some(8));
}

#[test]
fn descending_columns_are_rejected() {
    let text = "_column(9) int year %8.0g\n_column(1) byte age %8.0g\n";
    let err = parse_dictionary_str(text).unwrap_err();
    assert!(matches!(
        err,
        DctError::Layout(LayoutError::InvalidSpan { start: 8, end: 0, .. })
    ));
}

#[test]
fn duplicate_names_differing_in_case_are_rejected() {
    let text = "_column(1) int AGE %8.0g\n_column(5) int age %8.0g\n";
    let err = parse_dictionary_str(text).unwrap_err();
    assert!(matches!(
        err,
        DctError::Layout(LayoutError::DuplicateField { .. })
    ));
}

#[test]
fn reads_dictionary_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("GSS.dct");
    fs::write(&path, GSS_DCT).expect("write dictionary");
    let layout = read_dictionary(&path).expect("read dictionary");
    assert_eq!(layout.len(), 4);

    let missing = dir.path().join("absent.dct");
    assert!(matches!(
        read_dictionary(&missing).unwrap_err(),
        DctError::FileNotFound { .. }
    ));
}

#[test]
fn latin1_descriptions_are_decoded_lossily() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("latin1.dct");
    let mut bytes = b"dictionary {\n".to_vec();
    bytes.extend_from_slice(b"  _column(1) int year %8.0g \"Ann\xe9e GSS\"\r\n");
    bytes.extend_from_slice(b"  _column(5) byte age %8.0g \"Age\"\n}\n");
    fs::write(&path, &bytes).expect("write dictionary");
    let layout = read_dictionary(&path).expect("read dictionary");
    assert_eq!(layout.names().collect::<Vec<_>>(), vec!["year", "age"]);
    let description = &layout.fields()[0].description;
    assert!(description.starts_with("Ann"));
    assert!(description.ends_with("e GSS"));
}
