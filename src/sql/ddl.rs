use std::collections::HashSet;

use sqlparser::{ast::Statement, dialect::SQLiteDialect, parser::Parser};

use crate::{
    format::{file::DmsFile, record::FieldMetadata},
    sql::error::SqlError,
    types::{field::FieldType, table::Table},
};

pub const ROW_HASH_COLUMN: &str = "__rowHash";

/// Relational column type for a field.
pub fn sql_type(field: &FieldMetadata) -> Result<&'static str, SqlError> {
    match field.field_type {
        FieldType::Char | FieldType::LongChar => Ok("TEXT"),
        FieldType::Number | FieldType::SignedNumber => {
            if field.decimal_positions > 0 {
                Ok("REAL")
            } else {
                Ok("INTEGER")
            }
        }
        FieldType::Date | FieldType::Time | FieldType::DateTime => Ok("TEXT"),
        FieldType::ImgOrAttach | FieldType::ImageRef => Ok("BLOB"),
        other => Err(SqlError::UnsupportedDataType(format!(
            "{} (field {})",
            other, field.field_name
        ))),
    }
}

/// `CREATE TABLE` statement for a table, keyed on its KEY fields, with a trailing row-hash column.
pub fn table_ddl(table: &Table) -> Result<String, SqlError> {
    let fields = &table.metadata.fields;
    if fields.is_empty() {
        return Err(SqlError::EmptyTable(table.name.clone()));
    }

    let mut columns = Vec::with_capacity(fields.len() + 1);
    for field in fields {
        columns.push(format!("{} {}", field.field_name, sql_type(field)?));
    }
    columns.push(format!("{} NUMBER", ROW_HASH_COLUMN));

    let keys: Vec<&str> = fields
        .iter()
        .filter(|f| f.is_key())
        .map(|f| f.field_name.as_str())
        .collect();

    let mut sql = format!("CREATE TABLE {}({}", table.db_name, columns.join(","));
    if !keys.is_empty() {
        sql.push_str(&format!(", PRIMARY KEY ({})", keys.join(",")));
    }
    sql.push_str(");");
    Ok(sql)
}

/// Parses generated DDL and returns the declared column names.
pub fn validate_ddl(sql: &str) -> Result<Vec<String>, SqlError> {
    let dialect = SQLiteDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    match statements.as_slice() {
        [Statement::CreateTable(create)] => {
            Ok(create.columns.iter().map(|c| c.name.value.clone()).collect())
        }
        other => Err(SqlError::UnsupportedStatement(format!("{:?}", other))),
    }
}

/// One table per database name, first occurrence wins.
pub fn distinct_tables(file: &DmsFile) -> Vec<&Table> {
    let mut seen = HashSet::new();
    file.tables
        .iter()
        .filter(|t| seen.insert(t.db_name.as_str()))
        .collect()
}
