use dmsfile::{
    config::DecodeOptions,
    format::{
        endian::{ByteOrder, EndianWriter},
        record::{
            FieldMetadata, GroupParam, IndexField, IndexMetadata, NewColumn, ParamGroup,
            RecordMetadata, TablespaceMetadata,
        },
    },
    types::{
        FIELD_METADATA_SIZE, INDEX_FIELD_SIZE, INDEX_HEADER_SIZE, PARAM_GROUP_HEADER_SIZE,
        RECORD_HEADER_SIZE, TABLESPACE_RECORD_SIZE, DDL_PARAM_SIZE,
        error::DmsError,
        field::{FieldFormat, FieldType, GuiControl, IndexType, UseEditFlags},
    },
    utils::mock::sample_record_metadata,
};

#[test]
fn test_empty_record_is_header_only() {
    let metadata = RecordMetadata::new("JOB", "PS_JOB");
    let bytes = metadata.encode().unwrap();
    assert_eq!(bytes.len(), RECORD_HEADER_SIZE);

    let decoded = RecordMetadata::decode(&bytes, ByteOrder::Little).unwrap();
    assert_eq!(decoded, metadata);
    assert_eq!(decoded.record_name, "JOB");
    assert_eq!(decoded.record_db_name, "PS_JOB");
}

#[test]
fn test_sample_record_layout_size() {
    let metadata = sample_record_metadata("EMPLOYEES");
    let expected = RECORD_HEADER_SIZE
        + 4 * FIELD_METADATA_SIZE
        + INDEX_HEADER_SIZE
        + INDEX_FIELD_SIZE
        + PARAM_GROUP_HEADER_SIZE
        + DDL_PARAM_SIZE
        + PARAM_GROUP_HEADER_SIZE
        + 2 * DDL_PARAM_SIZE
        + TABLESPACE_RECORD_SIZE;

    assert_eq!(metadata.encode().unwrap().len(), expected);
}

#[test]
fn test_decode_restores_every_section() {
    let metadata = sample_record_metadata("EMPLOYEES");
    let decoded = RecordMetadata::decode(&metadata.encode().unwrap(), ByteOrder::Little).unwrap();

    assert_eq!(decoded, metadata);
    assert_eq!(
        decoded.column_names(),
        vec!["EMPLID", "NAME", "HIRE_DT", "SALARY"]
    );
    assert_eq!(
        decoded.field_types(),
        vec![
            FieldType::Char,
            FieldType::Char,
            FieldType::Date,
            FieldType::Number
        ]
    );
    assert_eq!(decoded.key_columns(), vec![0]);
    assert_eq!(decoded.indexes[0].index_type, IndexType::Key);
    assert_eq!(decoded.indexes[0].fields[0].field_name, "EMPLID");
    assert_eq!(decoded.indexes[0].parameter_groups[0].parameters[0].value, "10");
    assert_eq!(decoded.parameter_groups[0].parameters[1].name, "NEXT");
    assert_eq!(decoded.tablespaces[0].tablespace_name, "HRAPP");
    assert!(decoded.trailing_bytes.is_empty());
}

#[test]
fn test_sections_concatenate_to_encode() {
    let metadata = sample_record_metadata("EMPLOYEES");
    let sections = metadata.encode_sections().unwrap();

    assert_eq!(sections[0].len(), RECORD_HEADER_SIZE);
    assert_eq!(sections[1].len(), 4 * FIELD_METADATA_SIZE);
    assert_eq!(sections[2].len(), INDEX_HEADER_SIZE);
    assert_eq!(sections.concat(), metadata.encode().unwrap());
}

#[test]
fn test_counts_come_from_collections() {
    let mut metadata = sample_record_metadata("EMPLOYEES");
    metadata.fields.pop();
    metadata.parameter_groups.push(ParamGroup {
        database_type: 1,
        sizing_set: 0,
        reserved: 0,
        parameters: vec![GroupParam::new("BUFFERPOOL", "BP1")],
    });

    let decoded = RecordMetadata::decode(&metadata.encode().unwrap(), ByteOrder::Little).unwrap();
    assert_eq!(decoded.fields.len(), 3);
    assert_eq!(decoded.parameter_groups.len(), 2);
    assert_eq!(decoded.parameter_groups[1].parameters[0].value, "BP1");
}

#[test]
fn test_short_trailing_segment_is_kept_not_decoded() {
    let metadata = sample_record_metadata("EMPLOYEES");
    let mut bytes = metadata.encode().unwrap();
    bytes.extend_from_slice(&[7u8; TABLESPACE_RECORD_SIZE - 1]);

    let decoded = RecordMetadata::decode(&bytes, ByteOrder::Little).unwrap();
    assert_eq!(decoded.tablespaces.len(), 1);
    assert_eq!(decoded.trailing_bytes.len(), TABLESPACE_RECORD_SIZE - 1);
    assert_eq!(decoded.encode().unwrap(), bytes);
}

#[test]
fn test_multiple_tablespaces() {
    let mut metadata = sample_record_metadata("EMPLOYEES");
    metadata.tablespaces.push(TablespaceMetadata {
        database_type: "1".to_string(),
        tablespace_name: "HRLARGE".to_string(),
        database_name: "HRDB2".to_string(),
    });

    let decoded = RecordMetadata::decode(&metadata.encode().unwrap(), ByteOrder::Little).unwrap();
    assert_eq!(decoded.tablespaces.len(), 2);
    assert_eq!(decoded.tablespaces[1].database_name, "HRDB2");
}

#[test]
fn test_truncated_field_section_is_out_of_data() {
    let bytes = sample_record_metadata("EMPLOYEES").encode().unwrap();
    let cut = RECORD_HEADER_SIZE + FIELD_METADATA_SIZE + 10;
    assert!(matches!(
        RecordMetadata::decode(&bytes[..cut], ByteOrder::Little),
        Err(DmsError::OutOfData { .. })
    ));
}

#[test]
fn test_big_endian_header_counts() {
    // Header with zero collections, written big-endian by hand.
    let mut writer = EndianWriter::new(ByteOrder::Big);
    writer.write_fixed_text("ENG", 8);
    writer.write_fixed_text("", 10);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("ACCT", 32);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("PS_ACCT", 38);
    writer.write_fixed_text("", 38);
    writer.write_fixed_text("", 38);
    writer.write_fixed_text("", 4);
    writer.write_bytes(&[0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
    writer.write_i32(3); // version
    writer.write_i32(0); // fields
    writer.write_i32(9); // build sequence
    writer.write_i32(0); // indexes
    writer.write_i32(0); // groups
    writer.write_i32(3); // version 2
    writer.write_bytes(&[0u8; 22]);
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), RECORD_HEADER_SIZE);

    let decoded = RecordMetadata::decode(&bytes, ByteOrder::Big).unwrap();
    assert_eq!(decoded.record_name, "ACCT");
    assert_eq!(decoded.record_db_name, "PS_ACCT");
    assert_eq!(decoded.version_number, 3);
    assert_eq!(decoded.build_sequence, 9);

    // Re-encoding always produces little-endian.
    let reencoded = decoded.encode().unwrap();
    assert_eq!(&reencoded[274..278], &[3, 0, 0, 0]);
    assert_eq!(
        RecordMetadata::decode(&reencoded, ByteOrder::Little).unwrap(),
        decoded
    );
}

fn record_with_reserved_field_set() -> Vec<u8> {
    let mut metadata = sample_record_metadata("EMPLOYEES");
    metadata.fields[1].reserved_c = 42;
    metadata.encode().unwrap()
}

#[test]
fn test_reserved_field_warns_by_default() {
    let decoded =
        RecordMetadata::decode(&record_with_reserved_field_set(), ByteOrder::Little).unwrap();
    assert_eq!(decoded.fields[1].reserved_c, 42);
}

#[test]
fn test_reserved_field_rejected_when_strict() {
    let result = RecordMetadata::decode_with(
        &record_with_reserved_field_set(),
        ByteOrder::Little,
        &DecodeOptions::strict(),
    );
    assert!(matches!(result, Err(DmsError::Consistency { .. })));
}

#[test]
fn test_unknown_tags_survive_reencode() {
    let mut metadata = sample_record_metadata("EMPLOYEES");
    metadata.fields[0].field_type = FieldType::Unknown(77);
    metadata.fields[0].use_edit = UseEditFlags(UseEditFlags::KEY | (1 << 16));

    let decoded = RecordMetadata::decode(&metadata.encode().unwrap(), ByteOrder::Little).unwrap();
    assert_eq!(decoded.fields[0].field_type, FieldType::Unknown(77));
    assert!(decoded.fields[0].is_key());
    assert!(decoded.fields[0].use_edit.contains(1 << 16));
}

#[test]
fn test_index_field_count_over_16_bits_is_rejected() {
    let mut metadata = sample_record_metadata("EMPLOYEES");
    let field = IndexField::new("EMPLID", 1, true);
    metadata.indexes[0].fields = vec![field; i16::MAX as usize + 1];

    assert!(matches!(
        metadata.encode(),
        Err(DmsError::Consistency { .. })
    ));
    assert!(matches!(
        metadata.encode_sections(),
        Err(DmsError::Consistency { .. })
    ));
}

// Expected model of the hand-written big-endian buffer below.
fn account_metadata() -> RecordMetadata {
    let mut metadata = RecordMetadata::new("ACCT", "PS_ACCT");
    metadata.fields.push(FieldMetadata::from_new_column(
        &NewColumn::new("ACCOUNT", FieldType::Char, 10).key(),
        "ACCT",
    ));

    let mut index = IndexMetadata::new("_", IndexType::Key);
    index.unique = 1;
    index.fields.push(IndexField::new("ACCOUNT", 1, true));
    index.parameter_groups.push(ParamGroup {
        database_type: 2,
        sizing_set: 0,
        reserved: 0,
        parameters: vec![GroupParam::new("PCTFREE", "10")],
    });
    metadata.indexes.push(index);

    metadata.parameter_groups.push(ParamGroup {
        database_type: 2,
        sizing_set: 1,
        reserved: 0,
        parameters: vec![GroupParam::new("INIT", "40"), GroupParam::new("NEXT", "80")],
    });
    metadata.tablespaces.push(TablespaceMetadata {
        database_type: "2".to_string(),
        tablespace_name: "ACCTSPC".to_string(),
        database_name: "ACCTDB".to_string(),
    });
    metadata
}

fn write_group_header(writer: &mut EndianWriter, database_type: i32, sizing_set: i32, count: i32) {
    writer.write_i32(database_type);
    writer.write_i32(sizing_set);
    writer.write_i32(count);
    writer.write_i32(0);
}

fn write_group_param(writer: &mut EndianWriter, name: &str, value: &str) {
    writer.write_fixed_text(name, 18);
    writer.write_fixed_text(value, 258);
}

fn account_metadata_big_endian() -> Vec<u8> {
    let mut writer = EndianWriter::new(ByteOrder::Big);

    // header
    writer.write_fixed_text("ENG", 8);
    writer.write_fixed_text("", 10);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("ACCT", 32);
    writer.write_fixed_text("", 32);
    writer.write_fixed_text("PS_ACCT", 38);
    writer.write_fixed_text("", 38);
    writer.write_fixed_text("", 38);
    writer.write_fixed_text("", 4);
    writer.write_bytes(&[0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
    writer.write_i32(1); // version
    writer.write_i32(1); // fields
    writer.write_i32(0); // build sequence
    writer.write_i32(1); // indexes
    writer.write_i32(1); // table groups
    writer.write_i32(1); // version 2
    writer.write_bytes(&[0u8; 22]);

    // field
    writer.write_fixed_text("ACCOUNT", 38);
    writer.write_fixed_text("ACCT", 32);
    writer.write_i32(0);
    writer.write_i32(1); // version
    writer.write_i32(0); // decimals
    writer.write_u32(UseEditFlags::KEY);
    writer.write_i16(0);
    writer.write_i16(FieldType::Char.as_i16());
    writer.write_i16(FieldFormat::UpperOrDefault.as_i16());
    writer.write_i32(10); // length
    writer.write_i32(GuiControl::Default.as_i32());
    writer.write_i32(0);
    writer.write_i16(0);

    // index header
    writer.write_fixed_text("_", 2);
    writer.write_i16(1); // fields
    writer.write_i16(0);
    writer.write_i16(1); // groups
    writer.write_i16(0);
    writer.write_i16(IndexType::Key.as_i16());
    writer.write_i16(1); // unique
    writer.write_i16(0); // cluster
    writer.write_i16(1); // active
    for _ in 0..9 {
        writer.write_i16(1);
    }
    writer.write_i32(0);

    // index payload: fields, group headers, group params
    writer.write_fixed_text("ACCOUNT", 38);
    writer.write_i32(1);
    writer.write_i32(1);
    writer.write_i16(0);
    write_group_header(&mut writer, 2, 0, 1);
    write_group_param(&mut writer, "PCTFREE", "10");

    // table groups
    write_group_header(&mut writer, 2, 1, 2);
    write_group_param(&mut writer, "INIT", "40");
    write_group_param(&mut writer, "NEXT", "80");

    // tablespace
    writer.write_fixed_text("2", 2);
    writer.write_fixed_text("ACCTSPC", 62);
    writer.write_fixed_text("ACCTDB", 18);

    writer.into_bytes()
}

#[test]
fn test_big_endian_index_and_group_payloads() {
    let bytes = account_metadata_big_endian();
    let expected = account_metadata();
    assert_eq!(bytes.len(), expected.encode().unwrap().len());

    let decoded = RecordMetadata::decode(&bytes, ByteOrder::Big).unwrap();
    assert_eq!(decoded, expected);
    assert_eq!(decoded.fields[0].field_length, 10);
    assert_eq!(decoded.indexes[0].fields[0].key_position, 1);
    assert_eq!(decoded.indexes[0].parameter_groups[0].parameters[0].name, "PCTFREE");
    assert_eq!(decoded.parameter_groups[0].sizing_set, 1);
    assert_eq!(decoded.parameter_groups[0].parameters[1].value, "80");

    // re-encoded as little-endian, byte-identical to the model's own encoding
    assert_eq!(decoded.encode().unwrap(), expected.encode().unwrap());
    assert_ne!(decoded.encode().unwrap(), bytes);
}
