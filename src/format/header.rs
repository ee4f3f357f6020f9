use serde::{Deserialize, Serialize};

use crate::{
    format::endian::ByteOrder,
    types::error::{DmsError, Result},
};

const VERSION_DIRECTIVE: &str = "SET VERSION_DAM";
const ENDIAN_DIRECTIVE: &str = "SET ENDIAN";
const BASE_LANGUAGE_DIRECTIVE: &str = "SET BASE_LANGUAGE";
const DATABASE_REMARK: &str = "REM Database:";
const STARTED_REMARK: &str = "REM Started:";
pub const ENDED_REMARK: &str = "REM Ended:";

/// Header directives at the top of a container file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHeader {
    pub version: String,
    pub blank_line: String,
    /// Byte order the file was read with. Writing always emits little-endian.
    pub endian: ByteOrder,
    pub base_language: String,
    pub database: String,
    pub started: String,
    pub ended: String,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            version: "8.5:2:0".to_string(),
            blank_line: String::new(),
            endian: ByteOrder::Little,
            base_language: "ENG".to_string(),
            database: String::new(),
            started: String::new(),
            ended: String::new(),
        }
    }
}

impl FileHeader {
    /// Opening header lines, up to and including the `Started` remark.
    pub fn to_lines(&self) -> Vec<String> {
        vec![
            format!("{}  {}", VERSION_DIRECTIVE, self.version),
            self.blank_line.clone(),
            format!("{} {}", ENDIAN_DIRECTIVE, ByteOrder::Little),
            format!("{} {}", BASE_LANGUAGE_DIRECTIVE, self.base_language),
            format!("{} {}", DATABASE_REMARK, self.database),
            format!("{} {}", STARTED_REMARK, self.started),
        ]
    }

    pub fn ended_line(&self) -> String {
        format!("{} {}", ENDED_REMARK, self.ended)
    }

    /// Parses the six opening header lines produced by [`FileHeader::to_lines`].
    pub fn from_lines(lines: &[String]) -> Result<Self> {
        if lines.len() < 6 {
            return Err(DmsError::format(format!(
                "header needs 6 lines, got {}",
                lines.len()
            )));
        }

        let version = directive_value(&lines[0], VERSION_DIRECTIVE)?;
        let blank_line = lines[1].clone();
        let endian = directive_value(&lines[2], ENDIAN_DIRECTIVE)?.parse::<ByteOrder>()?;
        let base_language = directive_value(&lines[3], BASE_LANGUAGE_DIRECTIVE)?;
        let database = directive_value(&lines[4], DATABASE_REMARK)?;
        let started = directive_value(&lines[5], STARTED_REMARK)?;

        Ok(Self {
            version,
            blank_line,
            endian,
            base_language,
            database,
            started,
            ended: String::new(),
        })
    }
}

fn directive_value(line: &str, directive: &str) -> Result<String> {
    line.strip_prefix(directive)
        .map(|rest| rest.trim().to_string())
        .ok_or_else(|| {
            DmsError::format(format!("expected '{}' line, found '{}'", directive, line))
        })
}
