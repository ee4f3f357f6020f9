use dmsfile::{
    format::{
        ddl::DdlDefaults,
        endian::ByteOrder,
        file::SerializeOptions,
        line::LineEncoder,
        record::RecordMetadata,
    },
    types::{error::DmsError, table::CompareResult},
    utils::mock::{HexLineEncoder, sample_file, sample_table},
};

fn section_bounds(lines: &[String], start: usize) -> usize {
    lines[start..]
        .iter()
        .position(|l| l == "/")
        .map(|offset| start + offset)
        .unwrap()
}

#[test]
fn test_serialize_document_order() {
    let table = sample_table("EMPLOYEES", &[&["E1", "Ann", "2020-01-01", "100"]]).unwrap();
    let file = sample_file(vec![table]);
    let encoder = HexLineEncoder::default();

    let lines = file.serialize(&SerializeOptions::default(), &encoder).unwrap();

    assert_eq!(lines[0], "SET VERSION_DAM  8.5:2:0");
    assert_eq!(lines[2], "SET ENDIAN LE");
    assert_eq!(lines[6], "EXPORT  RECORD/SPACE.x");
    assert_eq!(lines[7], "HR");
    assert_eq!(lines[8], "/");

    // DDL defaults block decodes back to the same defaults
    let ddl_end = section_bounds(&lines, 9);
    let ddl_bytes = encoder.decode_lines_to_bytes(&lines[9..ddl_end]).unwrap();
    assert_eq!(
        DdlDefaults::decode(&ddl_bytes, ByteOrder::Little).unwrap(),
        file.ddl_defaults
    );

    assert_eq!(lines[ddl_end + 1], "EXPORT  EMPLOYEES.*");

    let metadata_start = ddl_end + 2;
    let metadata_end = section_bounds(&lines, metadata_start);
    let metadata_bytes = encoder
        .decode_lines_to_bytes(&lines[metadata_start..metadata_end])
        .unwrap();
    assert_eq!(
        RecordMetadata::decode(&metadata_bytes, ByteOrder::Little).unwrap(),
        file.tables[0].metadata
    );

    let row_end = lines.iter().position(|l| l == "//").unwrap();
    assert!(row_end > metadata_end);
    assert_eq!(lines[row_end + 1], "/");
    assert_eq!(lines.last().unwrap(), "REM Ended: 2024-03-01-10.05.00");
}

#[test]
fn test_selected_tables_only() {
    let employees = sample_table("EMPLOYEES", &[&["E1", "Ann", "2020-01-01", "100"]]).unwrap();
    let jobs = sample_table("JOBS", &[&["J1", "Clerk", "2021-06-01", "5"]]).unwrap();
    let file = sample_file(vec![employees, jobs]);

    let lines = file
        .serialize(&SerializeOptions::selected(["JOBS"]), &HexLineEncoder::default())
        .unwrap();

    assert!(lines.iter().any(|l| l == "EXPORT  JOBS.*"));
    assert!(!lines.iter().any(|l| l == "EXPORT  EMPLOYEES.*"));
}

#[test]
fn test_diff_only_skips_unchanged_tables_and_rows() {
    let mut changed = sample_table(
        "EMPLOYEES",
        &[
            &["E1", "Ann", "2020-01-01", "100"],
            &["E2", "Bob", "2020-02-01", "200"],
        ],
    )
    .unwrap();
    changed.compare_result = CompareResult::Differs;
    changed.rows[0].compare_result = CompareResult::Same;
    changed.rows[1].compare_result = CompareResult::Differs;

    let mut unchanged = sample_table("JOBS", &[&["J1", "Clerk", "2021-06-01", "5"]]).unwrap();
    unchanged.compare_result = CompareResult::Same;

    let file = sample_file(vec![changed, unchanged]);
    let lines = file
        .serialize(&SerializeOptions::diff_only(), &HexLineEncoder::default())
        .unwrap();

    assert!(lines.iter().any(|l| l == "EXPORT  EMPLOYEES.*"));
    assert!(!lines.iter().any(|l| l == "EXPORT  JOBS.*"));
    assert_eq!(lines.iter().filter(|l| *l == "//").count(), 1);
}

#[test]
fn test_table_lookup() {
    let file = sample_file(vec![sample_table("EMPLOYEES", &[]).unwrap()]);
    assert!(file.table("EMPLOYEES").is_ok());
    assert!(matches!(
        file.table("MISSING"),
        Err(DmsError::TableNotFound { .. })
    ));
}

#[test]
fn test_hex_encoder_wraps_lines() {
    let encoder = HexLineEncoder { width: 4 };
    let lines = encoder.encode_bytes_to_lines(&[0xAB, 0xCD, 0xEF]);
    assert_eq!(lines, vec!["ABCD".to_string(), "EF".to_string()]);
    assert_eq!(
        encoder.decode_lines_to_bytes(&lines).unwrap(),
        vec![0xAB, 0xCD, 0xEF]
    );
}
