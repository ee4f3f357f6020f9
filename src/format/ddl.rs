use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::DecodeOptions,
    format::endian::{ByteOrder, EndianReader, EndianWriter},
    types::error::{DmsError, Result},
};

/*
 * DDL Defaults Layout
 * ┌──────────────────────────────────────────────────────────────┐
 * │ model_count(4)                                               │
 * │ [model header] * model_count                                 │
 * │   reserved_a(4) | reserved_b(4) | param_count(4) |           │
 * │   statement_type(2) | platform_id(2) | sql(len(4) + utf16)   │
 * │ reserved(4) | flat_param_count(4)                            │
 * │ [param] * flat_param_count, distributed over models in order │
 * │   reserved_a(4) | statement_type(2) | platform_id(2) |       │
 * │   name(len(4) + utf16) | value(len(4) + utf16) | reserved_b(4)│
 * │ override_count(4)                                            │
 * │ [override] * override_count                                  │
 * │   sizing_set(4) | platform_id(2) | name | value | db_name |  │
 * │   tablespace (each len(4) + utf16) | reserved(4)             │
 * └──────────────────────────────────────────────────────────────┘
 */

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DdlParam {
    pub name: String,
    pub value: String,
    pub statement_type: i16,
    pub platform_id: i16,
    pub reserved_a: i32,
    pub reserved_b: i32,
}

impl DdlParam {
    fn read(reader: &mut EndianReader<'_>) -> Result<Self> {
        let reserved_a = reader.read_i32()?;
        let statement_type = reader.read_i16()?;
        let platform_id = reader.read_i16()?;
        let name = reader.read_prefixed_text()?;
        let value = reader.read_prefixed_text()?;
        let reserved_b = reader.read_i32()?;
        debug!(%name, %value, "ddl parameter");

        Ok(Self {
            name,
            value,
            statement_type,
            platform_id,
            reserved_a,
            reserved_b,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_i32(self.reserved_a);
        writer.write_i16(self.statement_type);
        writer.write_i16(self.platform_id);
        writer.write_prefixed_text(&self.name);
        writer.write_prefixed_text(&self.value);
        writer.write_i32(self.reserved_b);
    }
}

/// A stored SQL statement template together with its substitution parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DdlModel {
    pub sql: String,
    pub statement_type: i16,
    pub platform_id: i16,
    pub reserved_a: i32,
    pub reserved_b: i32,
    pub parameters: Vec<DdlParam>,
}

impl DdlModel {
    // Header only; parameters arrive later in the flat stream.
    fn read_header(reader: &mut EndianReader<'_>) -> Result<(Self, usize)> {
        let reserved_a = reader.read_i32()?;
        let reserved_b = reader.read_i32()?;
        let parameter_count = reader.read_i32()?;
        let statement_type = reader.read_i16()?;
        let platform_id = reader.read_i16()?;
        let sql = reader.read_prefixed_text()?;

        if parameter_count < 0 {
            return Err(DmsError::format(format!(
                "negative parameter count {} in DDL model",
                parameter_count
            )));
        }

        let model = Self {
            sql,
            statement_type,
            platform_id,
            reserved_a,
            reserved_b,
            parameters: Vec::new(),
        };
        Ok((model, parameter_count as usize))
    }

    fn write_header(&self, writer: &mut EndianWriter) {
        writer.write_i32(self.reserved_a);
        writer.write_i32(self.reserved_b);
        writer.write_i32(self.parameters.len() as i32);
        writer.write_i16(self.statement_type);
        writer.write_i16(self.platform_id);
        writer.write_prefixed_text(&self.sql);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablespaceParamOverride {
    pub sizing_set: i32,
    pub platform_id: i16,
    pub name: String,
    pub value: String,
    pub database_name: String,
    pub tablespace_name: String,
    pub reserved: i32,
}

impl TablespaceParamOverride {
    fn read(reader: &mut EndianReader<'_>) -> Result<Self> {
        Ok(Self {
            sizing_set: reader.read_i32()?,
            platform_id: reader.read_i16()?,
            name: reader.read_prefixed_text()?,
            value: reader.read_prefixed_text()?,
            database_name: reader.read_prefixed_text()?,
            tablespace_name: reader.read_prefixed_text()?,
            reserved: reader.read_i32()?,
        })
    }

    fn write(&self, writer: &mut EndianWriter) {
        writer.write_i32(self.sizing_set);
        writer.write_i16(self.platform_id);
        writer.write_prefixed_text(&self.name);
        writer.write_prefixed_text(&self.value);
        writer.write_prefixed_text(&self.database_name);
        writer.write_prefixed_text(&self.tablespace_name);
        writer.write_i32(self.reserved);
    }
}

/// The file-wide DDL model table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DdlDefaults {
    pub models: Vec<DdlModel>,
    pub overrides: Vec<TablespaceParamOverride>,
    pub reserved: i32,
}

impl DdlDefaults {
    pub fn decode(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        Self::decode_with(bytes, order, &DecodeOptions::default())
    }

    pub fn decode_with(bytes: &[u8], order: ByteOrder, options: &DecodeOptions) -> Result<Self> {
        let mut reader = EndianReader::new(bytes, order);

        let model_count = read_count(&mut reader, "DDL model")?;
        let capacity = model_count.min(reader.remaining());
        let mut models = Vec::with_capacity(capacity);
        let mut declared_counts = Vec::with_capacity(capacity);
        for _ in 0..model_count {
            let (model, parameter_count) = DdlModel::read_header(&mut reader)?;
            models.push(model);
            declared_counts.push(parameter_count);
        }

        let reserved = reader.read_i32()?;
        let flat_count = reader.read_i32()?;
        let expected: usize = declared_counts.iter().sum();
        options.check_count("DDL parameter total", flat_count as i64, expected as i64)?;

        // The parameter stream is flat; each model takes its declared share in order.
        for (model, &count) in models.iter_mut().zip(&declared_counts) {
            for _ in 0..count {
                model.parameters.push(DdlParam::read(&mut reader)?);
            }
        }

        let override_count = read_count(&mut reader, "tablespace override")?;
        let mut overrides = Vec::with_capacity(override_count.min(reader.remaining()));
        for _ in 0..override_count {
            overrides.push(TablespaceParamOverride::read(&mut reader)?);
        }

        debug!(
            models = models.len(),
            parameters = expected,
            overrides = overrides.len(),
            trailing = reader.remaining(),
            "decoded DDL defaults"
        );

        Ok(Self {
            models,
            overrides,
            reserved,
        })
    }

    /// Always little-endian; counts come from the live collections.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = EndianWriter::new(ByteOrder::Little);

        writer.write_i32(self.models.len() as i32);
        for model in &self.models {
            model.write_header(&mut writer);
        }

        writer.write_i32(self.reserved);
        writer.write_i32(self.parameter_count() as i32);
        for model in &self.models {
            for param in &model.parameters {
                param.write(&mut writer);
            }
        }

        writer.write_i32(self.overrides.len() as i32);
        for tablespace_override in &self.overrides {
            tablespace_override.write(&mut writer);
        }

        writer.into_bytes()
    }

    pub fn parameter_count(&self) -> usize {
        self.models.iter().map(|m| m.parameters.len()).sum()
    }
}

pub(crate) fn read_count(reader: &mut EndianReader<'_>, what: &str) -> Result<usize> {
    let count = reader.read_i32()?;
    if count < 0 {
        return Err(DmsError::format(format!("negative {} count {}", what, count)));
    }
    Ok(count as usize)
}
