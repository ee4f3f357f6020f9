use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    format::line::LineEncoder,
    types::{
        ColumnId,
        error::{DmsError, Result},
        field::FieldType,
        table::{CompareResult, Table},
        value::{DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT, Value},
    },
    utils::hash::{RowHash, hash_row},
};

/// Decodes a field's text form into raw bytes.
///
/// `B{<hex>}` carries arbitrary binary content; anything else is UTF-8 text.
pub fn decode_text(field_value: &str) -> Result<Vec<u8>> {
    match binary_payload(field_value) {
        Some(hex_digits) => {
            if hex_digits.len() % 2 != 0 {
                return Err(DmsError::format(format!(
                    "odd number of hex digits in binary value '{}'",
                    field_value
                )));
            }
            hex::decode(hex_digits).map_err(|e| {
                DmsError::format(format!("invalid binary value '{}': {}", field_value, e))
            })
        }
        None => Ok(field_value.as_bytes().to_vec()),
    }
}

/// Encodes raw field bytes into their text form.
///
/// Only byte sequences that survive a strict UTF-8 decode are emitted as text,
/// everything else becomes uppercase `B{<hex>}`. Text that itself reads as
/// `B{..}` is escaped too, so `decode_text(&encode_text(b)) == b` for any `b`.
pub fn encode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if binary_payload(text).is_none() => text.to_string(),
        _ => format!("B{{{}}}", hex::encode_upper(bytes)),
    }
}

fn binary_payload(field_value: &str) -> Option<&str> {
    field_value
        .strip_prefix("B{")
        .and_then(|rest| rest.strip_suffix('}'))
}

fn is_null_placeholder(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '\0')
}

/// One table row: a packed value buffer plus `field_count + 1` offsets into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<u8>,
    pub indexes: Vec<usize>,
    pub types: Arc<[FieldType]>,
    pub compare_result: CompareResult,
}

impl Row {
    pub fn new(values: Vec<u8>, indexes: Vec<usize>) -> Result<Self> {
        if indexes.is_empty() {
            return Err(DmsError::consistency("row offset index is empty"));
        }
        if indexes.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(DmsError::consistency("row offsets are not monotonic"));
        }
        if let Some(&last) = indexes.last() {
            if last > values.len() {
                return Err(DmsError::OutOfData {
                    needed: last,
                    available: values.len(),
                });
            }
        }

        Ok(Self {
            values,
            indexes,
            types: Arc::from(Vec::new()),
            compare_result: CompareResult::None,
        })
    }

    /// Packs already-decoded field bytes into a row.
    pub fn from_fields<I, B>(fields: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut values = Vec::new();
        let mut indexes = vec![0];
        for field in fields {
            values.extend_from_slice(field.as_ref());
            indexes.push(values.len());
        }

        Self {
            values,
            indexes,
            types: Arc::from(Vec::new()),
            compare_result: CompareResult::None,
        }
    }

    /// Builds a row from text-form values (`B{..}` for binary).
    pub fn from_strings<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let decoded = fields
            .iter()
            .map(|field| decode_text(field.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_fields(decoded))
    }

    pub fn field_count(&self) -> usize {
        self.indexes.len().saturating_sub(1)
    }

    pub fn field_bytes(&self, index: ColumnId) -> Result<&[u8]> {
        if index >= self.field_count() {
            return Err(DmsError::ColumnIndexOutOfBounds { index });
        }
        let start = self.indexes[index];
        let end = self.indexes[index + 1];
        self.values.get(start..end).ok_or(DmsError::OutOfData {
            needed: end,
            available: self.values.len(),
        })
    }

    pub fn string_value(&self, index: ColumnId) -> Result<String> {
        Ok(encode_text(self.field_bytes(index)?))
    }

    pub fn values_as_strings(&self) -> Result<Vec<String>> {
        (0..self.field_count())
            .map(|index| self.string_value(index))
            .collect()
    }

    /// Binds column types taken from the owning table's metadata.
    pub fn bind_types(&mut self, types: Arc<[FieldType]>) {
        self.types = types;
    }

    pub fn decode_fields(&mut self, table: &Table) {
        self.bind_types(table.field_types());
    }

    /// Interprets one field through its bound column type.
    pub fn typed_value(&self, index: ColumnId) -> Result<Value> {
        let field_type = *self.types.get(index).ok_or_else(|| {
            DmsError::consistency(format!("no field type bound for column {}", index))
        })?;

        match field_type {
            FieldType::Char | FieldType::LongChar => {
                let bytes = self.field_bytes(index)?;
                let text = match std::str::from_utf8(bytes) {
                    Ok(text) => text.to_string(),
                    Err(_) => encode_text(bytes),
                };
                Ok(Value::Text(text))
            }
            FieldType::Number | FieldType::SignedNumber => {
                let text = self.string_value(index)?;
                text.trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| DmsError::parse(text, "integer"))
            }
            FieldType::Date => {
                let text = self.string_value(index)?;
                if is_null_placeholder(&text) {
                    return Ok(Value::Null);
                }
                NaiveDate::parse_from_str(&text, DATE_FORMAT)
                    .map(Value::Date)
                    .map_err(|_| DmsError::parse(text, "date (yyyy-MM-dd)"))
            }
            FieldType::DateTime => {
                let text = self.string_value(index)?;
                if is_null_placeholder(&text) {
                    return Ok(Value::Null);
                }
                NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
                    .map(Value::DateTime)
                    .map_err(|_| DmsError::parse(text, "datetime (yyyy-MM-dd-HH.mm.ss.ffffff)"))
            }
            FieldType::Time => {
                let text = self.string_value(index)?;
                if is_null_placeholder(&text) {
                    return Ok(Value::Null);
                }
                NaiveTime::parse_from_str(&text, TIME_FORMAT)
                    .map(Value::Time)
                    .map_err(|_| DmsError::parse(text, "time (HH.mm.ss.ffffff)"))
            }
            FieldType::ImgOrAttach => Ok(Value::Binary(self.field_bytes(index)?.to_vec())),
            other => Err(DmsError::consistency(format!(
                "field type {} has no value interpretation (column {})",
                other, index
            ))),
        }
    }

    /// Per-value results; a bad value does not hide its neighbours.
    pub fn typed_values(&self) -> Vec<Result<Value>> {
        (0..self.field_count())
            .map(|index| self.typed_value(index))
            .collect()
    }

    pub fn insert_value(&mut self, index: ColumnId, value: &str) -> Result<()> {
        let mut current = self.values_as_strings()?;
        if index > current.len() {
            return Err(DmsError::ColumnIndexOutOfBounds { index });
        }
        current.insert(index, value.to_string());
        self.collapse_values(&current)
    }

    pub fn delete_value(&mut self, index: ColumnId) -> Result<()> {
        let mut current = self.values_as_strings()?;
        if index >= current.len() {
            return Err(DmsError::ColumnIndexOutOfBounds { index });
        }
        current.remove(index);
        self.collapse_values(&current)
    }

    pub fn change_value(&mut self, index: ColumnId, value: &str) -> Result<()> {
        let mut current = self.values_as_strings()?;
        if index >= current.len() {
            return Err(DmsError::ColumnIndexOutOfBounds { index });
        }
        current[index] = value.to_string();
        self.collapse_values(&current)
    }

    // Rebuilds the packed buffer and every offset; offsets after a mutation all shift.
    fn collapse_values(&mut self, fields: &[String]) -> Result<()> {
        let rebuilt = Self::from_strings(fields)?;
        self.values = rebuilt.values;
        self.indexes = rebuilt.indexes;
        Ok(())
    }

    /// Text lines for this row, wrapped by the line encoder. The `//` row terminator is not included.
    pub fn encode_to_text(&self, encoder: &dyn LineEncoder) -> Result<Vec<String>> {
        let mut joined = String::new();
        for index in 0..self.field_count() {
            joined.push_str(&encoder.encode_field(self.field_bytes(index)?));
            joined.push(',');
        }
        Ok(encoder.format_encoded(&joined))
    }

    pub fn content_hash(&self, key_columns: &[ColumnId]) -> Result<RowHash> {
        hash_row(self, key_columns)
    }
}
