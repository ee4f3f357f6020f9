pub mod ddl;
pub mod error;
