use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    format::{
        file::{DmsFile, SerializeOptions},
        line::LineEncoder,
    },
    types::error::Result,
};

pub struct DmsWriter;

impl DmsWriter {
    /// Serializes `file` to `path`, replacing whatever was there.
    pub fn write<P: AsRef<Path>>(
        path: P,
        file: &DmsFile,
        options: &SerializeOptions,
        encoder: &dyn LineEncoder,
    ) -> Result<()> {
        let path = path.as_ref();
        let lines = file.serialize(options, encoder)?;

        if path.exists() {
            fs::remove_file(path)?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;

        debug!(path = %path.display(), lines = lines.len(), "wrote container file");
        Ok(())
    }
}
