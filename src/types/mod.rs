pub mod error;
pub mod field;
pub mod row;
pub mod table;
pub mod value;

// Common type aliases
pub type ColumnId = usize;
pub type ContentHash = u32;

// Fixed-width UTF-16 slot widths (bytes) of the record header identity fields
pub const RECORD_LANGUAGE_WIDTH: usize = 8;
pub const OWNER_ID_WIDTH: usize = 10;
pub const RECORD_NAME_WIDTH: usize = 32; // analytic delete, parent, record, related language
pub const FIELD_NAME_WIDTH: usize = 38; // db name, timestamp field, system id field, field names
pub const OPTIMIZATION_TRIGGERS_WIDTH: usize = 4;

// Opaque blocks inside the record header
pub const RECORD_RESERVED_A_SIZE: usize = 10;
pub const RECORD_RESERVED_B_SIZE: usize = 22;
pub const RECORD_HEADER_SIZE: usize = 320;

// Fixed record sizes inside the metadata buffer
pub const FIELD_METADATA_SIZE: usize = 106;
pub const INDEX_HEADER_SIZE: usize = 40;
pub const INDEX_FIELD_SIZE: usize = 48;
pub const PARAM_GROUP_HEADER_SIZE: usize = 16;
pub const DDL_PARAM_NAME_WIDTH: usize = 18;
pub const DDL_PARAM_VALUE_WIDTH: usize = 258;
pub const DDL_PARAM_SIZE: usize = DDL_PARAM_NAME_WIDTH + DDL_PARAM_VALUE_WIDTH; // 276

// Trailing tablespace records: database type(2) | tablespace name(62) | database name(18)
pub const TABLESPACE_DB_TYPE_WIDTH: usize = 2;
pub const TABLESPACE_NAME_WIDTH: usize = 62;
pub const TABLESPACE_DB_NAME_WIDTH: usize = 18;
pub const TABLESPACE_RECORD_SIZE: usize =
    TABLESPACE_DB_TYPE_WIDTH + TABLESPACE_NAME_WIDTH + TABLESPACE_DB_NAME_WIDTH; // 82

pub const INDEX_ID_WIDTH: usize = 2;
