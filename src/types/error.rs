use thiserror::Error;

#[derive(Error, Debug)]
pub enum DmsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {details}")]
    Format { details: String },

    #[error("Out of data: needed {needed} bytes, {available} available")]
    OutOfData { needed: usize, available: usize },

    #[error("Cannot parse '{value}' as {expected}")]
    Parse { value: String, expected: String },

    #[error("Consistency error: {details}")]
    Consistency { details: String },

    #[error("Column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },
}

impl DmsError {
    pub fn format(details: impl Into<String>) -> Self {
        DmsError::Format {
            details: details.into(),
        }
    }

    pub fn consistency(details: impl Into<String>) -> Self {
        DmsError::Consistency {
            details: details.into(),
        }
    }

    pub fn parse(value: impl Into<String>, expected: impl Into<String>) -> Self {
        DmsError::Parse {
            value: value.into(),
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DmsError>;
