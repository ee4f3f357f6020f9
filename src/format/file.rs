use std::collections::HashSet;

use tracing::debug;

use crate::{
    executor::merge::{FileMerger, MergeResult, Merger},
    format::{
        NAMESPACE_EXPORT, SECTION_END, ddl::DdlDefaults, header::FileHeader, line::LineEncoder,
    },
    types::{
        error::{DmsError, Result},
        table::{CompareResult, Table},
    },
};

/// Which tables a serialization pass writes.
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    /// Skip tables (and rows) whose comparison tag says nothing changed.
    pub diff_only: bool,
    /// Restrict output to these table names.
    pub selected_tables: Option<HashSet<String>>,
}

impl SerializeOptions {
    pub fn diff_only() -> Self {
        Self {
            diff_only: true,
            selected_tables: None,
        }
    }

    pub fn selected<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            diff_only: false,
            selected_tables: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    fn includes(&self, table: &Table) -> bool {
        if self.diff_only
            && matches!(table.compare_result, CompareResult::None | CompareResult::Same)
        {
            return false;
        }
        match &self.selected_tables {
            Some(names) => names.contains(&table.name),
            None => true,
        }
    }
}

/// In-memory model of one container file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmsFile {
    pub header: FileHeader,
    pub namespaces: Vec<String>,
    pub ddl_defaults: DdlDefaults,
    pub tables: Vec<Table>,
}

impl DmsFile {
    pub fn new(header: FileHeader, ddl_defaults: DdlDefaults) -> Self {
        Self {
            header,
            namespaces: Vec::new(),
            ddl_defaults,
            tables: Vec::new(),
        }
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DmsError::TableNotFound {
                name: name.to_string(),
            })
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| DmsError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// All tables with this name; merges can leave more than one.
    pub fn tables_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.iter().filter(move |t| t.name == name)
    }

    pub fn merge_from(&mut self, other: DmsFile, dedup: bool) -> MergeResult {
        FileMerger::new(self, dedup).merge(other)
    }

    /// Renders the whole document as container lines.
    pub fn serialize(&self, options: &SerializeOptions, encoder: &dyn LineEncoder) -> Result<Vec<String>> {
        let mut lines = self.header.to_lines();

        lines.push(NAMESPACE_EXPORT.to_string());
        lines.extend(self.namespaces.iter().cloned());
        lines.push(SECTION_END.to_string());

        lines.extend(encoder.encode_bytes_to_lines(&self.ddl_defaults.encode()));
        lines.push(SECTION_END.to_string());

        let mut written = 0;
        for table in self.tables.iter().filter(|t| options.includes(t)) {
            lines.extend(table.encode_to_lines(encoder, options.diff_only)?);
            written += 1;
        }
        debug!(
            written,
            total = self.tables.len(),
            diff_only = options.diff_only,
            "serialized tables"
        );

        lines.push(self.header.ended_line());
        Ok(lines)
    }
}
