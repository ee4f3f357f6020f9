use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::DecodeOptions,
    format::{
        ddl::read_count,
        endian::{ByteOrder, EndianReader, EndianWriter},
    },
    types::{
        ColumnId, DDL_PARAM_NAME_WIDTH, DDL_PARAM_SIZE, DDL_PARAM_VALUE_WIDTH,
        FIELD_METADATA_SIZE, FIELD_NAME_WIDTH, INDEX_FIELD_SIZE, INDEX_HEADER_SIZE,
        INDEX_ID_WIDTH, OPTIMIZATION_TRIGGERS_WIDTH, OWNER_ID_WIDTH, PARAM_GROUP_HEADER_SIZE,
        RECORD_HEADER_SIZE, RECORD_LANGUAGE_WIDTH, RECORD_NAME_WIDTH, RECORD_RESERVED_A_SIZE,
        RECORD_RESERVED_B_SIZE, TABLESPACE_DB_NAME_WIDTH, TABLESPACE_DB_TYPE_WIDTH,
        TABLESPACE_NAME_WIDTH, TABLESPACE_RECORD_SIZE,
        error::{DmsError, Result},
        field::{FieldFormat, FieldType, GuiControl, IndexType, UseEditFlags},
    },
};

/*
 * Record Metadata Layout
 * ┌─────────────────────────────────────────────────────────────────┐
 * │ HEADER (320 bytes)                                              │
 * │  language(8) | owner(10) | analytic_delete(32) | parent(32) |   │
 * │  record(32) | related_language(32) | db_name(38) |               │
 * │  timestamp_field(38) | system_id_field(38) | opt_triggers(4) |  │
 * │  reserved_a(10) | version(4) | field_count(4) | build_seq(4) |  │
 * │  index_count(4) | param_group_count(4) | version_2(4) |         │
 * │  reserved_b(22)                                                 │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ FIELDS        [106 bytes] * field_count                         │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ INDEX HEADERS [40 bytes] * index_count                          │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ PER INDEX (in header order):                                    │
 * │  index fields [48] * n | group headers [16] * g |               │
 * │  group params [276] * count, group by group                     │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ TABLE GROUP HEADERS [16] * param_group_count                    │
 * │ TABLE GROUP PARAMS  [276] * count, group by group               │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ TABLESPACES [82] * until fewer than 82 bytes remain             │
 * └─────────────────────────────────────────────────────────────────┘
 */

const DEFAULT_RESERVED_A: [u8; RECORD_RESERVED_A_SIZE] = [0, 0, 1, 0, 0, 0, 0, 0, 0, 0];

/// Describes a column to be added to an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewColumn {
    pub field_name: String,
    pub field_type: FieldType,
    pub field_format: FieldFormat,
    pub field_length: i32,
    pub decimal_positions: i32,
    pub use_edit: UseEditFlags,
    pub default_gui_control: GuiControl,
    pub version_number: i32,
}

impl NewColumn {
    pub fn new(field_name: impl Into<String>, field_type: FieldType, field_length: i32) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            field_format: FieldFormat::UpperOrDefault,
            field_length,
            decimal_positions: 0,
            use_edit: UseEditFlags::default(),
            default_gui_control: GuiControl::Default,
            version_number: 1,
        }
    }

    pub fn key(mut self) -> Self {
        self.use_edit = self.use_edit.with(UseEditFlags::KEY);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub field_name: String,
    pub record_name: String,
    pub reserved_a: i32,
    pub version_number: i32,
    pub decimal_positions: i32,
    pub use_edit: UseEditFlags,
    pub reserved_b: i16,
    pub field_type: FieldType,
    pub field_format: FieldFormat,
    pub field_length: i32,
    pub default_gui_control: GuiControl,
    pub reserved_c: i32,
    pub reserved_d: i16,
}

impl FieldMetadata {
    pub fn from_new_column(column: &NewColumn, record_name: &str) -> Self {
        Self {
            field_name: column.field_name.clone(),
            record_name: record_name.to_string(),
            reserved_a: 0,
            version_number: column.version_number,
            decimal_positions: column.decimal_positions,
            use_edit: column.use_edit,
            reserved_b: 0,
            field_type: column.field_type,
            field_format: column.field_format,
            field_length: column.field_length,
            default_gui_control: column.default_gui_control,
            reserved_c: 0,
            reserved_d: 0,
        }
    }

    fn read(reader: &mut EndianReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let field_name = reader.read_fixed_text(FIELD_NAME_WIDTH)?;
        let record_name = reader.read_fixed_text(RECORD_NAME_WIDTH)?;
        let reserved_a = reader.read_i32()?;
        options.check_reserved("field.reserved_a", reserved_a as i64)?;
        let version_number = reader.read_i32()?;
        let decimal_positions = reader.read_i32()?;
        let use_edit = UseEditFlags(reader.read_u32()?);
        let reserved_b = reader.read_i16()?;
        options.check_reserved("field.reserved_b", reserved_b as i64)?;
        let field_type = FieldType::from_i16(reader.read_i16()?);
        let field_format = FieldFormat::from_i16(reader.read_i16()?);
        let field_length = reader.read_i32()?;
        let default_gui_control = GuiControl::from_i32(reader.read_i32()?);
        let reserved_c = reader.read_i32()?;
        let reserved_d = reader.read_i16()?;
        options.check_reserved("field.reserved_c", reserved_c as i64)?;
        options.check_reserved("field.reserved_d", reserved_d as i64)?;

        Ok(Self {
            field_name,
            record_name,
            reserved_a,
            version_number,
            decimal_positions,
            use_edit,
            reserved_b,
            field_type,
            field_format,
            field_length,
            default_gui_control,
            reserved_c,
            reserved_d,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_fixed_text(&self.field_name, FIELD_NAME_WIDTH);
        writer.write_fixed_text(&self.record_name, RECORD_NAME_WIDTH);
        writer.write_i32(self.reserved_a);
        writer.write_i32(self.version_number);
        writer.write_i32(self.decimal_positions);
        writer.write_u32(self.use_edit.0);
        writer.write_i16(self.reserved_b);
        writer.write_i16(self.field_type.as_i16());
        writer.write_i16(self.field_format.as_i16());
        writer.write_i32(self.field_length);
        writer.write_i32(self.default_gui_control.as_i32());
        writer.write_i32(self.reserved_c);
        writer.write_i16(self.reserved_d);
    }

    pub fn is_key(&self) -> bool {
        self.use_edit.is_key()
    }
}

/// A 276-byte fixed-width name/value pair inside a parameter group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupParam {
    pub name: String,
    pub value: String,
}

impl GroupParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn read(reader: &mut EndianReader<'_>) -> Result<Self> {
        Ok(Self {
            name: reader.read_fixed_text(DDL_PARAM_NAME_WIDTH)?,
            value: reader.read_fixed_text(DDL_PARAM_VALUE_WIDTH)?,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_fixed_text(&self.name, DDL_PARAM_NAME_WIDTH);
        writer.write_fixed_text(&self.value, DDL_PARAM_VALUE_WIDTH);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamGroup {
    pub database_type: i32,
    pub sizing_set: i32,
    pub reserved: i32,
    pub parameters: Vec<GroupParam>,
}

impl ParamGroup {
    fn read_header(reader: &mut EndianReader<'_>, options: &DecodeOptions) -> Result<(Self, usize)> {
        let database_type = reader.read_i32()?;
        let sizing_set = reader.read_i32()?;
        let count = read_count(reader, "parameter group entry")?;
        let reserved = reader.read_i32()?;
        options.check_reserved("param_group.reserved", reserved as i64)?;

        let group = Self {
            database_type,
            sizing_set,
            reserved,
            parameters: Vec::new(),
        };
        Ok((group, count))
    }

    fn write_header(&self, writer: &mut EndianWriter) {
        writer.write_i32(self.database_type);
        writer.write_i32(self.sizing_set);
        writer.write_i32(self.parameters.len() as i32);
        writer.write_i32(self.reserved);
    }

    fn write_parameters(&self, writer: &mut EndianWriter) {
        for param in &self.parameters {
            param.write(writer);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexField {
    pub field_name: String,
    pub key_position: i32,
    pub ascending: i32,
    pub reserved: i16,
}

impl IndexField {
    pub fn new(field_name: impl Into<String>, key_position: i32, ascending: bool) -> Self {
        Self {
            field_name: field_name.into(),
            key_position,
            ascending: ascending as i32,
            reserved: 0,
        }
    }

    fn read(reader: &mut EndianReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let field_name = reader.read_fixed_text(FIELD_NAME_WIDTH)?;
        let key_position = reader.read_i32()?;
        let ascending = reader.read_i32()?;
        let reserved = reader.read_i16()?;
        options.check_reserved("index_field.reserved", reserved as i64)?;

        Ok(Self {
            field_name,
            key_position,
            ascending,
            reserved,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_fixed_text(&self.field_name, FIELD_NAME_WIDTH);
        writer.write_i32(self.key_position);
        writer.write_i32(self.ascending);
        writer.write_i16(self.reserved);
    }
}

/// Per-platform index enablement, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformFlags {
    pub sbs: i16,
    pub db2: i16,
    pub ora: i16,
    pub inf: i16,
    pub dbx: i16,
    pub alb: i16,
    pub syb: i16,
    pub mss: i16,
    pub db4: i16,
}

impl PlatformFlags {
    pub fn all(enabled: bool) -> Self {
        let flag = enabled as i16;
        Self {
            sbs: flag,
            db2: flag,
            ora: flag,
            inf: flag,
            dbx: flag,
            alb: flag,
            syb: flag,
            mss: flag,
            db4: flag,
        }
    }

    fn read(reader: &mut EndianReader<'_>) -> Result<Self> {
        Ok(Self {
            sbs: reader.read_i16()?,
            db2: reader.read_i16()?,
            ora: reader.read_i16()?,
            inf: reader.read_i16()?,
            dbx: reader.read_i16()?,
            alb: reader.read_i16()?,
            syb: reader.read_i16()?,
            mss: reader.read_i16()?,
            db4: reader.read_i16()?,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        for flag in [
            self.sbs, self.db2, self.ora, self.inf, self.dbx, self.alb, self.syb, self.mss,
            self.db4,
        ] {
            writer.write_i16(flag);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub index_id: String,
    pub index_type: IndexType,
    pub unique: i16,
    pub cluster: i16,
    pub active: i16,
    pub platforms: PlatformFlags,
    pub reserved_a: i16,
    pub reserved_b: i16,
    pub reserved_c: i32,
    pub fields: Vec<IndexField>,
    pub parameter_groups: Vec<ParamGroup>,
}

impl IndexMetadata {
    pub fn new(index_id: impl Into<String>, index_type: IndexType) -> Self {
        Self {
            index_id: index_id.into(),
            index_type,
            unique: 0,
            cluster: 0,
            active: 1,
            platforms: PlatformFlags::all(true),
            reserved_a: 0,
            reserved_b: 0,
            reserved_c: 0,
            fields: Vec::new(),
            parameter_groups: Vec::new(),
        }
    }

    // Returns the header plus the declared field and group counts for the payload pass.
    fn read_header(
        reader: &mut EndianReader<'_>,
        options: &DecodeOptions,
    ) -> Result<(Self, usize, usize)> {
        let index_id = reader.read_fixed_text(INDEX_ID_WIDTH)?;
        let field_count = reader.read_i16()?;
        let reserved_a = reader.read_i16()?;
        let group_count = reader.read_i16()?;
        let reserved_b = reader.read_i16()?;
        let index_type = IndexType::from_i16(reader.read_i16()?);
        let unique = reader.read_i16()?;
        let cluster = reader.read_i16()?;
        let active = reader.read_i16()?;
        let platforms = PlatformFlags::read(reader)?;
        let reserved_c = reader.read_i32()?;
        options.check_reserved("index.reserved_c", reserved_c as i64)?;

        if field_count < 0 || group_count < 0 {
            return Err(DmsError::format(format!(
                "negative counts in index '{}' header (fields {}, groups {})",
                index_id, field_count, group_count
            )));
        }

        let index = Self {
            index_id,
            index_type,
            unique,
            cluster,
            active,
            platforms,
            reserved_a,
            reserved_b,
            reserved_c,
            fields: Vec::new(),
            parameter_groups: Vec::new(),
        };
        Ok((index, field_count as usize, group_count as usize))
    }

    fn write_header(&self, writer: &mut EndianWriter) -> Result<()> {
        let field_count = index_count_i16(&self.index_id, "fields", self.fields.len())?;
        let group_count = index_count_i16(
            &self.index_id,
            "parameter groups",
            self.parameter_groups.len(),
        )?;

        writer.write_fixed_text(&self.index_id, INDEX_ID_WIDTH);
        writer.write_i16(field_count);
        writer.write_i16(self.reserved_a);
        writer.write_i16(group_count);
        writer.write_i16(self.reserved_b);
        writer.write_i16(self.index_type.as_i16());
        writer.write_i16(self.unique);
        writer.write_i16(self.cluster);
        writer.write_i16(self.active);
        self.platforms.write(writer);
        writer.write_i32(self.reserved_c);
        Ok(())
    }

    fn write_fields(&self, writer: &mut EndianWriter) {
        for field in &self.fields {
            field.write(writer);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablespaceMetadata {
    pub database_type: String,
    pub tablespace_name: String,
    pub database_name: String,
}

impl TablespaceMetadata {
    fn read(reader: &mut EndianReader<'_>) -> Result<Self> {
        Ok(Self {
            database_type: reader.read_fixed_text(TABLESPACE_DB_TYPE_WIDTH)?,
            tablespace_name: reader.read_fixed_text(TABLESPACE_NAME_WIDTH)?,
            database_name: reader.read_fixed_text(TABLESPACE_DB_NAME_WIDTH)?,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_fixed_text(&self.database_type, TABLESPACE_DB_TYPE_WIDTH);
        writer.write_fixed_text(&self.tablespace_name, TABLESPACE_NAME_WIDTH);
        writer.write_fixed_text(&self.database_name, TABLESPACE_DB_NAME_WIDTH);
    }
}

/// Structural descriptor of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub record_language: String,
    pub owner_id: String,
    pub analytic_delete_record: String,
    pub parent_record: String,
    pub record_name: String,
    pub related_language_record: String,
    pub record_db_name: String,
    pub timestamp_field: String,
    pub system_id_field: String,
    pub optimization_triggers: String,
    pub reserved_a: [u8; RECORD_RESERVED_A_SIZE],
    pub version_number: i32,
    pub build_sequence: i32,
    pub version_number_2: i32,
    pub reserved_b: [u8; RECORD_RESERVED_B_SIZE],
    pub fields: Vec<FieldMetadata>,
    pub indexes: Vec<IndexMetadata>,
    pub parameter_groups: Vec<ParamGroup>,
    pub tablespaces: Vec<TablespaceMetadata>,
    /// Bytes after the last whole tablespace record, echoed on encode.
    pub trailing_bytes: Vec<u8>,
}

impl RecordMetadata {
    pub fn new(record_name: impl Into<String>, record_db_name: impl Into<String>) -> Self {
        Self {
            record_language: "ENG".to_string(),
            owner_id: String::new(),
            analytic_delete_record: String::new(),
            parent_record: String::new(),
            record_name: record_name.into(),
            related_language_record: String::new(),
            record_db_name: record_db_name.into(),
            timestamp_field: String::new(),
            system_id_field: String::new(),
            optimization_triggers: String::new(),
            reserved_a: DEFAULT_RESERVED_A,
            version_number: 1,
            build_sequence: 0,
            version_number_2: 1,
            reserved_b: [0; RECORD_RESERVED_B_SIZE],
            fields: Vec::new(),
            indexes: Vec::new(),
            parameter_groups: Vec::new(),
            tablespaces: Vec::new(),
            trailing_bytes: Vec::new(),
        }
    }

    pub fn decode(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        Self::decode_with(bytes, order, &DecodeOptions::default())
    }

    pub fn decode_with(bytes: &[u8], order: ByteOrder, options: &DecodeOptions) -> Result<Self> {
        let mut reader = EndianReader::new(bytes, order);

        let record_language = reader.read_fixed_text(RECORD_LANGUAGE_WIDTH)?;
        let owner_id = reader.read_fixed_text(OWNER_ID_WIDTH)?;
        let analytic_delete_record = reader.read_fixed_text(RECORD_NAME_WIDTH)?;
        let parent_record = reader.read_fixed_text(RECORD_NAME_WIDTH)?;
        let record_name = reader.read_fixed_text(RECORD_NAME_WIDTH)?;
        let related_language_record = reader.read_fixed_text(RECORD_NAME_WIDTH)?;
        let record_db_name = reader.read_fixed_text(FIELD_NAME_WIDTH)?;
        let timestamp_field = reader.read_fixed_text(FIELD_NAME_WIDTH)?;
        let system_id_field = reader.read_fixed_text(FIELD_NAME_WIDTH)?;
        let optimization_triggers = reader.read_fixed_text(OPTIMIZATION_TRIGGERS_WIDTH)?;

        let mut reserved_a = [0u8; RECORD_RESERVED_A_SIZE];
        reserved_a.copy_from_slice(reader.read_bytes(RECORD_RESERVED_A_SIZE)?);

        let version_number = reader.read_i32()?;
        let field_count = read_count(&mut reader, "field")?;
        let build_sequence = reader.read_i32()?;
        let index_count = read_count(&mut reader, "index")?;
        let group_count = read_count(&mut reader, "parameter group")?;
        let version_number_2 = reader.read_i32()?;

        let mut reserved_b = [0u8; RECORD_RESERVED_B_SIZE];
        reserved_b.copy_from_slice(reader.read_bytes(RECORD_RESERVED_B_SIZE)?);

        let mut fields = Vec::with_capacity(field_count.min(reader.remaining() / FIELD_METADATA_SIZE));
        for _ in 0..field_count {
            let mut record = reader.sub_reader(FIELD_METADATA_SIZE)?;
            fields.push(FieldMetadata::read(&mut record, options)?);
        }

        // Pass one: every index header. Pass two: each index's payload, in header order.
        let mut headers = Vec::with_capacity(index_count.min(reader.remaining() / INDEX_HEADER_SIZE));
        for _ in 0..index_count {
            let mut record = reader.sub_reader(INDEX_HEADER_SIZE)?;
            headers.push(IndexMetadata::read_header(&mut record, options)?);
        }

        let mut indexes = Vec::with_capacity(headers.len());
        for (mut index, index_field_count, index_group_count) in headers {
            for _ in 0..index_field_count {
                let mut record = reader.sub_reader(INDEX_FIELD_SIZE)?;
                index.fields.push(IndexField::read(&mut record, options)?);
            }
            index.parameter_groups = read_param_groups(&mut reader, index_group_count, options)?;
            indexes.push(index);
        }

        let parameter_groups = read_param_groups(&mut reader, group_count, options)?;

        let mut tablespaces = Vec::new();
        while reader.remaining() > TABLESPACE_RECORD_SIZE - 1 {
            let mut record = reader.sub_reader(TABLESPACE_RECORD_SIZE)?;
            tablespaces.push(TablespaceMetadata::read(&mut record)?);
        }
        let trailing_bytes = reader.read_bytes(reader.remaining())?.to_vec();

        debug!(
            record = %record_name,
            fields = fields.len(),
            indexes = indexes.len(),
            parameter_groups = parameter_groups.len(),
            tablespaces = tablespaces.len(),
            trailing = trailing_bytes.len(),
            "decoded record metadata"
        );

        Ok(Self {
            record_language,
            owner_id,
            analytic_delete_record,
            parent_record,
            record_name,
            related_language_record,
            record_db_name,
            timestamp_field,
            system_id_field,
            optimization_triggers,
            reserved_a,
            version_number,
            build_sequence,
            version_number_2,
            reserved_b,
            fields,
            indexes,
            parameter_groups,
            tablespaces,
            trailing_bytes,
        })
    }

    /// The whole metadata buffer, little-endian, with every count taken from the live collections.
    ///
    /// Fails with `Consistency` when an index holds more fields or parameter
    /// groups than its 16-bit counts can store.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(self.encode_sections()?.concat())
    }

    /// Metadata split into the sections the container writes one after another.
    pub fn encode_sections(&self) -> Result<Vec<Vec<u8>>> {
        let mut sections = Vec::new();
        sections.push(self.encode_header());

        let mut writer = new_writer(self.fields.len() * FIELD_METADATA_SIZE);
        for field in &self.fields {
            field.write(&mut writer);
        }
        sections.push(writer.into_bytes());

        let mut writer = new_writer(self.indexes.len() * INDEX_HEADER_SIZE);
        for index in &self.indexes {
            index.write_header(&mut writer)?;
        }
        sections.push(writer.into_bytes());

        for index in &self.indexes {
            let mut writer = new_writer(index.fields.len() * INDEX_FIELD_SIZE);
            index.write_fields(&mut writer);
            sections.push(writer.into_bytes());
            push_param_group_sections(&mut sections, &index.parameter_groups);
        }

        push_param_group_sections(&mut sections, &self.parameter_groups);

        let mut writer = new_writer(self.tablespaces.len() * TABLESPACE_RECORD_SIZE);
        for tablespace in &self.tablespaces {
            tablespace.write(&mut writer);
        }
        writer.write_bytes(&self.trailing_bytes);
        sections.push(writer.into_bytes());

        Ok(sections)
    }

    fn encode_header(&self) -> Vec<u8> {
        let mut writer = new_writer(RECORD_HEADER_SIZE);

        writer.write_fixed_text(&self.record_language, RECORD_LANGUAGE_WIDTH);
        writer.write_fixed_text(&self.owner_id, OWNER_ID_WIDTH);
        writer.write_fixed_text(&self.analytic_delete_record, RECORD_NAME_WIDTH);
        writer.write_fixed_text(&self.parent_record, RECORD_NAME_WIDTH);
        writer.write_fixed_text(&self.record_name, RECORD_NAME_WIDTH);
        writer.write_fixed_text(&self.related_language_record, RECORD_NAME_WIDTH);
        writer.write_fixed_text(&self.record_db_name, FIELD_NAME_WIDTH);
        writer.write_fixed_text(&self.timestamp_field, FIELD_NAME_WIDTH);
        writer.write_fixed_text(&self.system_id_field, FIELD_NAME_WIDTH);
        writer.write_fixed_text(&self.optimization_triggers, OPTIMIZATION_TRIGGERS_WIDTH);
        writer.write_bytes(&self.reserved_a);

        writer.write_i32(self.version_number);
        writer.write_i32(self.fields.len() as i32);
        writer.write_i32(self.build_sequence);
        writer.write_i32(self.indexes.len() as i32);
        writer.write_i32(self.parameter_groups.len() as i32);
        writer.write_i32(self.version_number_2);
        writer.write_bytes(&self.reserved_b);

        writer.into_bytes()
    }

    pub fn field_types(&self) -> Vec<FieldType> {
        self.fields.iter().map(|f| f.field_type).collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.field_name.clone()).collect()
    }

    /// Positions of the fields flagged as keys.
    pub fn key_columns(&self) -> Vec<ColumnId> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_key())
            .map(|(position, _)| position)
            .collect()
    }
}

fn index_count_i16(index_id: &str, what: &str, count: usize) -> Result<i16> {
    i16::try_from(count).map_err(|_| {
        DmsError::consistency(format!(
            "index '{}' has {} {}, more than a 16-bit count can hold",
            index_id, count, what
        ))
    })
}

fn new_writer(capacity: usize) -> EndianWriter {
    EndianWriter::with_capacity(ByteOrder::Little, capacity)
}

// Headers for all groups first, then each group's parameters.
fn read_param_groups(
    reader: &mut EndianReader<'_>,
    count: usize,
    options: &DecodeOptions,
) -> Result<Vec<ParamGroup>> {
    let mut headers = Vec::with_capacity(count.min(reader.remaining() / PARAM_GROUP_HEADER_SIZE));
    for _ in 0..count {
        let mut record = reader.sub_reader(PARAM_GROUP_HEADER_SIZE)?;
        headers.push(ParamGroup::read_header(&mut record, options)?);
    }

    let mut groups = Vec::with_capacity(headers.len());
    for (mut group, parameter_count) in headers {
        for _ in 0..parameter_count {
            let mut record = reader.sub_reader(DDL_PARAM_SIZE)?;
            group.parameters.push(GroupParam::read(&mut record)?);
        }
        groups.push(group);
    }
    Ok(groups)
}

fn push_param_group_sections(sections: &mut Vec<Vec<u8>>, groups: &[ParamGroup]) {
    if !groups.is_empty() {
        let mut writer = new_writer(groups.len() * PARAM_GROUP_HEADER_SIZE);
        for group in groups {
            group.write_header(&mut writer);
        }
        sections.push(writer.into_bytes());
    }

    for group in groups {
        let mut writer = new_writer(group.parameters.len() * DDL_PARAM_SIZE);
        group.write_parameters(&mut writer);
        sections.push(writer.into_bytes());
    }
}
