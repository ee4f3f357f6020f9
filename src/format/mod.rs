pub mod ddl;
pub mod endian;
pub mod file;
pub mod header;
pub mod line;
pub mod record;

// Container section markers
pub const SECTION_END: &str = "/";
pub const ROW_END: &str = "//";
pub const NAMESPACE_EXPORT: &str = "EXPORT  RECORD/SPACE.x";
pub const TABLE_EXPORT_PREFIX: &str = "EXPORT  ";
