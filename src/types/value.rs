use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d-%H.%M.%S%.f";
pub const TIME_FORMAT: &str = "%H.%M.%S%.f";

/// A row value interpreted through its column's field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value in the container's text grammar.
    pub fn to_field_text(&self) -> String {
        match self {
            Value::Null => "\0".to_string(),
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d-%H.%M.%S.%6f").to_string(),
            Value::Time(t) => t.format("%H.%M.%S.%6f").to_string(),
            Value::Binary(b) => format!("B{{{}}}", hex::encode_upper(b)),
        }
    }
}
