use crc32fast::Hasher;

use crate::types::{ColumnId, ContentHash, error::Result, row::Row};

/// Content identity of a row: key columns and the full column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHash {
    pub key: ContentHash,
    pub value: ContentHash,
}

fn update_field(hasher: &mut Hasher, bytes: &[u8]) {
    // length first so ("ab","c") and ("a","bc") differ
    hasher.update(&(bytes.len() as u32).to_le_bytes());
    hasher.update(bytes);
}

pub fn hash_columns(row: &Row, columns: &[ColumnId]) -> Result<ContentHash> {
    let mut hasher = Hasher::new();
    hasher.update(&(columns.len() as u32).to_le_bytes());
    for &column in columns {
        update_field(&mut hasher, row.field_bytes(column)?);
    }
    Ok(hasher.finalize())
}

pub fn hash_all_columns(row: &Row) -> Result<ContentHash> {
    let all: Vec<ColumnId> = (0..row.field_count()).collect();
    hash_columns(row, &all)
}

pub fn hash_row(row: &Row, key_columns: &[ColumnId]) -> Result<RowHash> {
    Ok(RowHash {
        key: hash_columns(row, key_columns)?,
        value: hash_all_columns(row)?,
    })
}
