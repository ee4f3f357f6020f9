use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    format::{
        ROW_END, SECTION_END, TABLE_EXPORT_PREFIX,
        line::LineEncoder,
        record::{FieldMetadata, NewColumn, RecordMetadata},
    },
    types::{
        ColumnId,
        error::{DmsError, Result},
        field::FieldType,
        row::{Row, decode_text},
    },
    utils::hash::RowHash,
};

/// Outcome of comparing a table or row against another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompareResult {
    #[default]
    None,
    Same,
    Differs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub db_name: String,
    pub columns: Vec<Column>,
    pub metadata: RecordMetadata,
    pub rows: Vec<Row>,
    pub compare_result: CompareResult,
}

impl Table {
    pub fn new(name: impl Into<String>, metadata: RecordMetadata) -> Self {
        let mut table = Self {
            name: name.into(),
            db_name: metadata.record_db_name.clone(),
            columns: Vec::new(),
            metadata,
            rows: Vec::new(),
            compare_result: CompareResult::None,
        };
        table.refresh_columns();
        table
    }

    fn refresh_columns(&mut self) {
        self.columns = self
            .metadata
            .fields
            .iter()
            .map(|field| Column {
                name: field.field_name.clone(),
                field_type: field.field_type,
            })
            .collect();
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn field_types(&self) -> Arc<[FieldType]> {
        Arc::from(self.metadata.field_types())
    }

    pub fn key_columns(&self) -> Vec<ColumnId> {
        self.metadata.key_columns()
    }

    /// Binds every row to this table's column types.
    pub fn decode_fields(&mut self) {
        let types = self.field_types();
        for row in &mut self.rows {
            row.bind_types(Arc::clone(&types));
        }
    }

    pub fn add_row(&mut self, mut row: Row) -> Result<()> {
        if row.field_count() != self.columns.len() {
            return Err(DmsError::consistency(format!(
                "row has {} fields but table '{}' has {} columns",
                row.field_count(),
                self.name,
                self.columns.len()
            )));
        }
        row.bind_types(self.field_types());
        self.rows.push(row);
        Ok(())
    }

    /// Adds a column at `position`, filling every existing row with `default_value`.
    pub fn add_column(&mut self, position: ColumnId, column: &NewColumn, default_value: &str) -> Result<()> {
        if position > self.metadata.fields.len() {
            return Err(DmsError::ColumnIndexOutOfBounds { index: position });
        }
        decode_text(default_value)?;
        self.rows = self.rebuilt_rows(|row| row.insert_value(position, default_value))?;
        let field = FieldMetadata::from_new_column(column, &self.metadata.record_name);
        self.metadata.fields.insert(position, field);
        self.refresh_columns();
        self.decode_fields();
        Ok(())
    }

    pub fn remove_column(&mut self, position: ColumnId) -> Result<()> {
        if position >= self.metadata.fields.len() {
            return Err(DmsError::ColumnIndexOutOfBounds { index: position });
        }
        self.rows = self.rebuilt_rows(|row| row.delete_value(position))?;
        self.metadata.fields.remove(position);
        self.refresh_columns();
        self.decode_fields();
        Ok(())
    }

    // Applies `mutate` to a copy of every row; the table is untouched unless all succeed.
    fn rebuilt_rows<F>(&self, mut mutate: F) -> Result<Vec<Row>>
    where
        F: FnMut(&mut Row) -> Result<()>,
    {
        let mut rebuilt = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut row = row.clone();
            mutate(&mut row)?;
            rebuilt.push(row);
        }
        Ok(rebuilt)
    }

    pub fn row_hashes(&self) -> Result<Vec<RowHash>> {
        let keys = self.key_columns();
        self.rows.iter().map(|row| row.content_hash(&keys)).collect()
    }

    /// Container lines for this table: export line, metadata, then rows.
    pub fn encode_to_lines(&self, encoder: &dyn LineEncoder, diff_only: bool) -> Result<Vec<String>> {
        let mut lines = vec![format!("{}{}.*", TABLE_EXPORT_PREFIX, self.name)];

        for section in self.metadata.encode_sections()? {
            lines.extend(encoder.encode_bytes_to_lines(&section));
        }
        lines.push(SECTION_END.to_string());

        for row in &self.rows {
            if diff_only && row.compare_result == CompareResult::Same {
                continue;
            }
            lines.extend(row.encode_to_text(encoder)?);
            lines.push(ROW_END.to_string());
        }
        lines.push(SECTION_END.to_string());

        Ok(lines)
    }
}
