use std::collections::HashSet;

use tracing::debug;

use crate::{
    format::file::DmsFile,
    types::{error::Result, table::CompareResult},
    utils::hash::RowHash,
};

/// Tags every table and row of `left` against the same-named table in `right`.
///
/// A row is `Same` when `right` holds a row with equal key and value hashes. A
/// table is `Same` only when its metadata matches and every row is `Same` with
/// no rows missing; tables absent from `right` are `Differs` throughout.
pub fn compare_files(left: &mut DmsFile, right: &DmsFile) -> Result<()> {
    for table in &mut left.tables {
        let Some(other) = right.tables_named(&table.name).next() else {
            table.compare_result = CompareResult::Differs;
            for row in &mut table.rows {
                row.compare_result = CompareResult::Differs;
            }
            continue;
        };

        let known: HashSet<RowHash> = other.row_hashes()?.into_iter().collect();
        let hashes = table.row_hashes()?;
        let mut same_rows = 0;
        for (row, hash) in table.rows.iter_mut().zip(hashes) {
            row.compare_result = if known.contains(&hash) {
                same_rows += 1;
                CompareResult::Same
            } else {
                CompareResult::Differs
            };
        }

        let unchanged = table.metadata == other.metadata
            && same_rows == table.rows.len()
            && table.rows.len() == other.rows.len();
        table.compare_result = if unchanged {
            CompareResult::Same
        } else {
            CompareResult::Differs
        };
        debug!(table = %table.name, same_rows, result = ?table.compare_result, "compared table");
    }
    Ok(())
}
