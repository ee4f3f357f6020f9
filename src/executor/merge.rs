use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    format::file::DmsFile,
    types::{error::Result, table::Table},
    utils::hash::RowHash,
};

/// Classification of one incoming table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Appended to the target with at least one row.
    SuccessfulMerge,
    /// Every row already present; nothing appended.
    NoOpMerge,
    /// Column layout does not match the existing table of the same name.
    FailedMerge,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    pub successful_merges: Vec<String>,
    pub no_op_merges: Vec<String>,
    pub failed_merges: Vec<String>,
    /// One entry per incoming table, in incoming order. Names may repeat.
    pub outcomes: Vec<(String, MergeOutcome)>,
    pub success: bool,
}

impl MergeResult {
    fn record(&mut self, table: &str, outcome: MergeOutcome) {
        debug!(table, ?outcome, "merge classification");
        self.outcomes.push((table.to_string(), outcome));
        match outcome {
            MergeOutcome::SuccessfulMerge => self.successful_merges.push(table.to_string()),
            MergeOutcome::NoOpMerge => self.no_op_merges.push(table.to_string()),
            MergeOutcome::FailedMerge => self.failed_merges.push(table.to_string()),
        }
    }

    /// Outcome of the first incoming table with this name.
    pub fn outcome_of(&self, table: &str) -> Option<MergeOutcome> {
        self.outcomes_of(table).next()
    }

    /// Outcomes of every incoming table with this name, in incoming order.
    pub fn outcomes_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = MergeOutcome> + 'a {
        self.outcomes
            .iter()
            .filter(move |(name, _)| name == table)
            .map(|(_, outcome)| *outcome)
    }
}

/// Trait for combining another file's tables into a target file
pub trait Merger {
    /// Merge every table of `incoming`; never stops early on a single table's failure
    fn merge(&mut self, incoming: DmsFile) -> MergeResult;
}

/// Merges into a borrowed target file, optionally dropping rows the target already holds
pub struct FileMerger<'a> {
    target: &'a mut DmsFile,
    dedup: bool,
}

impl<'a> FileMerger<'a> {
    pub fn new(target: &'a mut DmsFile, dedup: bool) -> Self {
        Self { target, dedup }
    }

    fn merge_table(&mut self, mut incoming: Table) -> MergeOutcome {
        let name = incoming.name.clone();
        let incoming_columns = incoming.column_names();
        let existing: Vec<&Table> = self.target.tables_named(&name).collect();

        if existing
            .iter()
            .any(|table| table.column_names() != incoming_columns)
        {
            warn!(table = %name, "column layout differs from existing table");
            return MergeOutcome::FailedMerge;
        }

        if self.dedup && !existing.is_empty() {
            match existing_hashes(&existing).and_then(|known| remove_known_rows(&mut incoming, &known)) {
                Ok(removed) => debug!(table = %name, removed, "deduplicated rows"),
                Err(e) => {
                    warn!(table = %name, error = %e, "could not hash rows");
                    return MergeOutcome::FailedMerge;
                }
            }
        }

        if incoming.rows.is_empty() {
            return MergeOutcome::NoOpMerge;
        }

        incoming.decode_fields();
        self.target.tables.push(incoming);
        MergeOutcome::SuccessfulMerge
    }
}

impl Merger for FileMerger<'_> {
    fn merge(&mut self, incoming: DmsFile) -> MergeResult {
        let mut result = MergeResult::default();

        if *self.target == incoming {
            warn!("refusing to merge a file model into itself");
            for table in &incoming.tables {
                result.record(&table.name, MergeOutcome::FailedMerge);
            }
            return result;
        }

        for table in incoming.tables {
            let name = table.name.clone();
            let outcome = self.merge_table(table);
            result.record(&name, outcome);
        }

        result.success = result.failed_merges.is_empty();
        result
    }
}

// Key and value hashes of every row already in the target's same-named tables.
fn existing_hashes(existing: &[&Table]) -> Result<HashSet<RowHash>> {
    let mut known = HashSet::new();
    for table in existing {
        known.extend(table.row_hashes()?);
    }
    Ok(known)
}

fn remove_known_rows(incoming: &mut Table, known: &HashSet<RowHash>) -> Result<usize> {
    let hashes = incoming.row_hashes()?;
    let before = incoming.rows.len();
    let mut hashes = hashes.into_iter();
    incoming
        .rows
        .retain(|_| hashes.next().is_none_or(|hash| !known.contains(&hash)));
    Ok(before - incoming.rows.len())
}
