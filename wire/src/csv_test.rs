use super::*;

#[test]
fn single_row_file() {
    let rows = parse_csv("pincode,disease,cases,date,advice\n110001,Dengue,12,2024-01-01,Stay hydrated\n");
    assert_eq!(
        rows,
        vec![CsvRow {
            pincode: Some("110001".into()),
            disease_name: Some("Dengue".into()),
            cases: Some(12),
            date: Some("2024-01-01".into()),
            advice: Some("Stay hydrated".into()),
        }]
    );
}

#[test]
fn header_is_dropped_even_when_it_looks_like_data() {
    let rows = parse_csv("110001,Dengue,1,2024-01-01,a\n110002,Malaria,2,2024-01-02,b");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].pincode.as_deref(), Some("110002"));
}

#[test]
fn blank_lines_and_crlf_are_handled() {
    let text = "h\r\n\r\n 110001 , Dengue , 3 , 2024-01-01 , Boil water \r\n   \n";
    let rows = parse_csv(text);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].disease_name.as_deref(), Some("Dengue"));
    assert_eq!(rows[0].cases, Some(3));
    assert_eq!(rows[0].advice.as_deref(), Some("Boil water"));
}

#[test]
fn non_numeric_cases_row_is_kept() {
    let rows = parse_csv("h\n110001,Dengue,abc,2024-01-01,advice\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cases, None);
    let json = serde_json::to_value(&rows[0]).unwrap();
    assert!(json["cases"].is_null());
}

#[test]
fn short_rows_omit_missing_fields() {
    let row = parse_row("110001,Dengue");
    assert_eq!(row.pincode.as_deref(), Some("110001"));
    assert_eq!(row.date, None);
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json, serde_json::json!({ "pincode": "110001", "disease_name": "Dengue", "cases": null }));
}

#[test]
fn embedded_commas_shift_fields() {
    let row = parse_row("110001,Dengue,5,2024-01-01,Rest, drink fluids");
    assert_eq!(row.advice.as_deref(), Some("Rest"));
}

#[test]
fn header_only_file_yields_nothing() {
    assert!(parse_csv(CSV_HEADER).is_empty());
    assert!(parse_csv("").is_empty());
}

#[test]
fn leading_int_follows_prefix_rules() {
    assert_eq!(parse_leading_int("12"), Some(12));
    assert_eq!(parse_leading_int("  7"), Some(7));
    assert_eq!(parse_leading_int("12abc"), Some(12));
    assert_eq!(parse_leading_int("3.9"), Some(3));
    assert_eq!(parse_leading_int("+4"), Some(4));
    assert_eq!(parse_leading_int("-5"), Some(-5));
    assert_eq!(parse_leading_int("abc"), None);
    assert_eq!(parse_leading_int(""), None);
    assert_eq!(parse_leading_int("-"), None);
    assert_eq!(parse_leading_int("99999999999999999999"), None);
}

#[test]
fn upload_request_wraps_rows_in_data() {
    let rows = vec![parse_row("110001,Dengue,1,2024-01-01,a")];
    let json = serde_json::to_value(UploadRequest { data: &rows }).unwrap();
    assert_eq!(json["data"][0]["pincode"], "110001");
    assert_eq!(json["data"][0]["cases"], 1);
}
