use dmsfile::{
    format::endian::{ByteOrder, EndianReader, EndianWriter},
    types::error::DmsError,
};

#[test]
fn test_read_i32_honours_byte_order() {
    let bytes = [1u8, 0, 0, 0];

    let mut le = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(le.read_i32().unwrap(), 1);

    let mut be = EndianReader::new(&bytes, ByteOrder::Big);
    assert_eq!(be.read_i32().unwrap(), 16_777_216);
}

#[test]
fn test_read_all_widths_little_endian() {
    let mut writer = EndianWriter::new(ByteOrder::Little);
    writer.write_i16(-2);
    writer.write_u16(0xBEEF);
    writer.write_i32(-70_000);
    writer.write_u32(0xDEAD_BEEF);
    writer.write_i64(i64::MIN + 1);
    writer.write_u64(u64::MAX - 1);
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 2 + 2 + 4 + 4 + 8 + 8);

    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(reader.read_i16().unwrap(), -2);
    assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
    assert_eq!(reader.read_i32().unwrap(), -70_000);
    assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(reader.read_i64().unwrap(), i64::MIN + 1);
    assert_eq!(reader.read_u64().unwrap(), u64::MAX - 1);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_big_endian_writer_layout() {
    let mut writer = EndianWriter::new(ByteOrder::Big);
    writer.write_i32(1);
    writer.write_u16(0x0102);
    assert_eq!(writer.into_bytes(), vec![0, 0, 0, 1, 1, 2]);
}

#[test]
fn test_read_past_end_is_out_of_data() {
    let bytes = [1u8, 2, 3];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);

    match reader.read_i32() {
        Err(DmsError::OutOfData { needed, available }) => {
            assert_eq!(needed, 4);
            assert_eq!(available, 3);
        }
        other => panic!("expected OutOfData, got {:?}", other),
    }
}

#[test]
fn test_fixed_text_stops_at_first_nul() {
    // "AB" then NUL then garbage that must be ignored
    let bytes = [0x41, 0, 0x42, 0, 0, 0, 0x43, 0];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(reader.read_fixed_text(8).unwrap(), "AB");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_fixed_text_big_endian() {
    let bytes = [0, 0x48, 0, 0x49];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Big);
    assert_eq!(reader.read_fixed_text(4).unwrap(), "HI");
}

#[test]
fn test_fixed_text_odd_width_is_format_error() {
    let bytes = [0u8; 8];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert!(matches!(
        reader.read_fixed_text(7),
        Err(DmsError::Format { .. })
    ));
}

#[test]
fn test_fixed_text_pads_and_truncates() {
    let mut writer = EndianWriter::new(ByteOrder::Little);
    writer.write_fixed_text("A", 6);
    writer.write_fixed_text("TOOLONG", 4);
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 10);
    assert_eq!(&bytes[..6], &[0x41, 0, 0, 0, 0, 0]);

    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(reader.read_fixed_text(6).unwrap(), "A");
    assert_eq!(reader.read_fixed_text(4).unwrap(), "TO");
}

#[test]
fn test_prefixed_text_length_includes_terminator() {
    let mut writer = EndianWriter::new(ByteOrder::Little);
    writer.write_prefixed_text("SQL");
    let bytes = writer.into_bytes();

    // 3 units * 2 + 2 byte terminator
    assert_eq!(&bytes[..4], &[8, 0, 0, 0]);
    assert_eq!(bytes.len(), 4 + 8);
    assert_eq!(&bytes[10..], &[0, 0]);

    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(reader.read_prefixed_text().unwrap(), "SQL");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_prefixed_text_negative_length() {
    let bytes = (-4i32).to_le_bytes();
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert!(matches!(
        reader.read_prefixed_text(),
        Err(DmsError::Format { .. })
    ));
}

#[test]
fn test_sub_reader_advances_parent() {
    let bytes = [1u8, 0, 2, 0, 3, 0];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);

    let mut first = reader.sub_reader(4).unwrap();
    assert_eq!(first.read_i16().unwrap(), 1);
    assert_eq!(first.remaining(), 2);

    assert_eq!(reader.position(), 4);
    assert_eq!(reader.read_i16().unwrap(), 3);
}

#[test]
fn test_byte_order_text_form() {
    assert_eq!(ByteOrder::Little.to_string(), "LE");
    assert_eq!(ByteOrder::Big.to_string(), "BE");
    assert_eq!("BE".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
    assert!("XE".parse::<ByteOrder>().is_err());
}

#[test]
fn test_fixed_text_unpaired_surrogate_is_format_error() {
    let bytes = [0x00, 0xD8, 0x41, 0x00];
    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert!(matches!(
        reader.read_fixed_text(4),
        Err(DmsError::Format { .. })
    ));
}

#[test]
fn test_fixed_text_surrogate_pair_decodes() {
    let mut writer = EndianWriter::new(ByteOrder::Little);
    writer.write_fixed_text("𝄞", 8);
    let bytes = writer.into_bytes();

    let mut reader = EndianReader::new(&bytes, ByteOrder::Little);
    assert_eq!(reader.read_fixed_text(8).unwrap(), "𝄞");
}
