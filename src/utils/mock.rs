use std::path::PathBuf;

use tempfile::TempDir;

use crate::{
    format::{
        ddl::{DdlDefaults, DdlModel, DdlParam, TablespaceParamOverride},
        file::DmsFile,
        header::FileHeader,
        line::LineEncoder,
        record::{
            FieldMetadata, GroupParam, IndexField, IndexMetadata, NewColumn, ParamGroup,
            RecordMetadata, TablespaceMetadata,
        },
    },
    types::{
        error::{DmsError, Result},
        field::{FieldType, IndexType},
        row::Row,
        table::Table,
    },
};

pub const DEFAULT_LINE_WIDTH: usize = 72;

/// Line encoder that writes uppercase hex, wrapped at a fixed width.
///
/// Stands in for the container's real text transport in tests and benches.
pub struct HexLineEncoder {
    pub width: usize,
}

impl Default for HexLineEncoder {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl HexLineEncoder {
    fn wrap(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.width.max(1))
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

impl LineEncoder for HexLineEncoder {
    fn encode_bytes_to_lines(&self, bytes: &[u8]) -> Vec<String> {
        self.wrap(&hex::encode_upper(bytes))
    }

    fn decode_lines_to_bytes(&self, lines: &[String]) -> Result<Vec<u8>> {
        hex::decode(lines.concat()).map_err(|e| DmsError::format(format!("bad hex line: {}", e)))
    }

    fn encode_field(&self, bytes: &[u8]) -> String {
        hex::encode_upper(bytes)
    }

    fn format_encoded(&self, encoded: &str) -> Vec<String> {
        self.wrap(encoded)
    }
}

/// Four-column record: EMPLID (key), NAME, HIRE_DT, SALARY.
pub fn sample_record_metadata(record_name: &str) -> RecordMetadata {
    let mut metadata = RecordMetadata::new(record_name, format!("PS_{}", record_name));
    metadata.timestamp_field = "LASTUPDDTTM".to_string();

    for column in [
        NewColumn::new("EMPLID", FieldType::Char, 11).key(),
        NewColumn::new("NAME", FieldType::Char, 50),
        NewColumn::new("HIRE_DT", FieldType::Date, 10),
        NewColumn::new("SALARY", FieldType::Number, 12),
    ] {
        metadata
            .fields
            .push(FieldMetadata::from_new_column(&column, record_name));
    }

    let mut index = IndexMetadata::new("_", IndexType::Key);
    index.unique = 1;
    index.fields.push(IndexField::new("EMPLID", 1, true));
    index.parameter_groups.push(ParamGroup {
        database_type: 2,
        sizing_set: 0,
        reserved: 0,
        parameters: vec![GroupParam::new("PCTFREE", "10")],
    });
    metadata.indexes.push(index);

    metadata.parameter_groups.push(ParamGroup {
        database_type: 2,
        sizing_set: 0,
        reserved: 0,
        parameters: vec![
            GroupParam::new("INIT", "40"),
            GroupParam::new("NEXT", "100"),
        ],
    });

    metadata.tablespaces.push(TablespaceMetadata {
        database_type: "2".to_string(),
        tablespace_name: "HRAPP".to_string(),
        database_name: "HRDB".to_string(),
    });

    metadata
}

/// Builds a sample table holding the given text-form rows.
pub fn sample_table(name: &str, rows: &[&[&str]]) -> Result<Table> {
    let mut table = Table::new(name, sample_record_metadata(name));
    for &fields in rows {
        table.add_row(Row::from_strings(fields)?)?;
    }
    Ok(table)
}

pub fn sample_ddl_defaults() -> DdlDefaults {
    DdlDefaults {
        models: vec![
            DdlModel {
                sql: "CREATE TABLESPACE **TSNAME** DATAFILE '**DBNAME**'".to_string(),
                statement_type: 1,
                platform_id: 2,
                reserved_a: 0,
                reserved_b: 0,
                parameters: vec![
                    DdlParam {
                        name: "INIT".to_string(),
                        value: "64".to_string(),
                        statement_type: 1,
                        platform_id: 2,
                        reserved_a: 0,
                        reserved_b: 0,
                    },
                    DdlParam {
                        name: "NEXT".to_string(),
                        value: "128".to_string(),
                        statement_type: 1,
                        platform_id: 2,
                        reserved_a: 0,
                        reserved_b: 0,
                    },
                ],
            },
            DdlModel {
                sql: "CREATE INDEX [IDXNAME] ON [TBNAME]".to_string(),
                statement_type: 2,
                platform_id: 2,
                reserved_a: 0,
                reserved_b: 1,
                parameters: vec![DdlParam {
                    name: "PCTFREE".to_string(),
                    value: "10".to_string(),
                    statement_type: 2,
                    platform_id: 2,
                    reserved_a: 0,
                    reserved_b: 0,
                }],
            },
        ],
        overrides: vec![TablespaceParamOverride {
            sizing_set: 0,
            platform_id: 2,
            name: "INIT".to_string(),
            value: "256".to_string(),
            database_name: "HRDB".to_string(),
            tablespace_name: "HRAPP".to_string(),
            reserved: 0,
        }],
        reserved: 0,
    }
}

pub fn sample_file(tables: Vec<Table>) -> DmsFile {
    let header = FileHeader {
        database: "HRDEV".to_string(),
        started: "2024-03-01-10.00.00".to_string(),
        ended: "2024-03-01-10.05.00".to_string(),
        ..FileHeader::default()
    };
    let mut file = DmsFile::new(header, sample_ddl_defaults());
    file.namespaces.push("HR".to_string());
    file.tables = tables;
    file
}

/// Temporary directory holding one output path; removed on drop.
pub struct TempDmsPath {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempDmsPath {
    pub fn new(file_name: &str) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(file_name);
        Ok(Self { dir, path })
    }
}
