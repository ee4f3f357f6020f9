pub mod config;
pub mod executor;
pub mod format;
pub mod sql;
pub mod types;
pub mod utils;
