use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::error::{DmsError, Result};

/// What to do when a reserved field that is expected to be zero is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReservedFieldPolicy {
    /// Log the unexpected value and keep decoding.
    #[default]
    Warn,
    /// Fail the decode with a consistency error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub reserved_fields: ReservedFieldPolicy,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            reserved_fields: ReservedFieldPolicy::Strict,
        }
    }

    /// Checks a zero-expected reserved field. The value itself is always kept by the caller.
    pub fn check_reserved(&self, field: &str, value: i64) -> Result<()> {
        if value == 0 {
            return Ok(());
        }
        match self.reserved_fields {
            ReservedFieldPolicy::Warn => {
                warn!(field, value, "reserved field is not zero");
                Ok(())
            }
            ReservedFieldPolicy::Strict => Err(DmsError::consistency(format!(
                "reserved field {} expected 0, found {}",
                field, value
            ))),
        }
    }

    /// Checks a stored count against the number of entries actually present.
    pub fn check_count(&self, what: &str, declared: i64, actual: i64) -> Result<()> {
        if declared == actual {
            return Ok(());
        }
        match self.reserved_fields {
            ReservedFieldPolicy::Warn => {
                warn!(what, declared, actual, "stored count disagrees with contents");
                Ok(())
            }
            ReservedFieldPolicy::Strict => Err(DmsError::consistency(format!(
                "{} declares {} entries, found {}",
                what, declared, actual
            ))),
        }
    }
}
