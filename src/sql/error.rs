#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    #[error("SQL parsing error: {0}")]
    SqlParser(#[from] sqlparser::parser::ParserError),
    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),
}
