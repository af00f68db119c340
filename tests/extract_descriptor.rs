use oncodash::dataset::{extract, format_of, DEFAULT_TARGET};

#[test]
fn header_and_rows_shape() {
    let descriptor = extract("a,b,target\n1,2,0\n3,4,1\n");
    assert_eq!(descriptor.row_count, 2);
    assert_eq!(descriptor.column_count, 3);
    assert_eq!(descriptor.feature_names, vec!["a", "b"]);
    assert_eq!(descriptor.target_name, "target");
}

#[test]
fn empty_input_yields_silent_empty_descriptor() {
    for raw in ["", "   \n\t\n  "] {
        let descriptor = extract(raw);
        assert_eq!(descriptor.row_count, 0, "input {raw:?}");
        assert_eq!(descriptor.column_count, 0);
        assert!(descriptor.feature_names.is_empty());
        assert_eq!(descriptor.target_name, "");
    }
}

#[test]
fn header_only_clamps_row_count_to_zero() {
    let descriptor = extract("x,y,label\n");
    assert_eq!(descriptor.row_count, 0);
    assert_eq!(descriptor.column_count, 3);
    assert_eq!(descriptor.target_name, "label");
}

#[test]
fn blank_lines_are_not_rows() {
    let descriptor = extract("a,b,c\n\n1,2,3\n   \n4,5,6\n");
    assert_eq!(descriptor.row_count, 2);
    assert_eq!(descriptor.column_count, 3);
}

#[test]
fn feature_names_have_one_fewer_entry_than_columns() {
    let descriptor = extract("f1,f2,f3,f4,outcome\n0,0,0,0,1\n");
    assert_eq!(descriptor.column_count, 5);
    assert_eq!(descriptor.feature_names.len(), descriptor.column_count - 1);
    assert_eq!(descriptor.target_name, "outcome");
}

#[test]
fn single_field_header_falls_back_to_sentinel_target() {
    let descriptor = extract("outcome\n1\n0\n");
    assert_eq!(descriptor.column_count, 1);
    assert!(descriptor.feature_names.is_empty());
    assert_eq!(descriptor.target_name, DEFAULT_TARGET);
}

#[test]
fn empty_trailing_header_field_falls_back_to_sentinel_target() {
    let descriptor = extract("a,b,\n1,2,3\n");
    assert_eq!(descriptor.column_count, 3);
    assert_eq!(descriptor.target_name, DEFAULT_TARGET);
}

#[test]
fn quoted_fields_are_split_naively() {
    // Comma splitting is deliberate: quoted fields are not recognised.
    let descriptor = extract("a,\"b,c\",target\n1,2,3,4\n");
    assert_eq!(descriptor.column_count, 4);
    assert_eq!(descriptor.feature_names, vec!["a", "\"b", "c\""]);
    assert_eq!(descriptor.target_name, "target");
}

#[test]
fn format_prefers_mime_then_extension() {
    assert_eq!(format_of("tumours.csv", Some("text/csv")), "text/csv");
    assert_eq!(format_of("tumours.csv", None), "CSV");
    assert_eq!(format_of("tumours.arff", Some("")), "ARFF");
    assert_eq!(format_of("dataset", None), "DATASET");
}
