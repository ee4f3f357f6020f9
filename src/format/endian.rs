use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::error::{DmsError, Result};

/// Byte order of the integer and UTF-16 fields in a binary section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    pub fn is_little(&self) -> bool {
        matches!(self, ByteOrder::Little)
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "LE"),
            ByteOrder::Big => write!(f, "BE"),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = DmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LE" => Ok(ByteOrder::Little),
            "BE" => Ok(ByteOrder::Big),
            other => Err(DmsError::format(format!("unknown endian marker '{}'", other))),
        }
    }
}

/// Forward-only cursor over a borrowed byte buffer.
pub struct EndianReader<'a> {
    data: &'a [u8],
    position: usize,
    order: ByteOrder,
}

impl<'a> EndianReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            position: 0,
            order,
        }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(DmsError::OutOfData {
                needed: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buffer = [0u8; N];
        buffer.copy_from_slice(self.read_bytes(N)?);
        if !self.order.is_little() {
            buffer.reverse();
        }
        Ok(buffer)
    }

    /// Carves the next `count` bytes into a reader of their own with the same byte order.
    pub fn sub_reader(&mut self, count: usize) -> Result<EndianReader<'a>> {
        let slice = self.read_bytes(count)?;
        Ok(EndianReader::new(slice, self.order))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array::<2>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array::<8>()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads a fixed-width UTF-16 slot, cut at the first NUL code unit.
    pub fn read_fixed_text(&mut self, byte_width: usize) -> Result<String> {
        if byte_width % 2 != 0 {
            return Err(DmsError::format(format!(
                "fixed text width must be even, got {}",
                byte_width
            )));
        }

        let raw = self.read_bytes(byte_width)?;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| match self.order {
                ByteOrder::Little => u16::from_le_bytes([pair[0], pair[1]]),
                ByteOrder::Big => u16::from_be_bytes([pair[0], pair[1]]),
            })
            .take_while(|&unit| unit != 0)
            .collect();

        String::from_utf16(&units).map_err(|e| {
            DmsError::format(format!(
                "invalid UTF-16 in {}-byte text slot ending at offset {}: {}",
                byte_width, self.position, e
            ))
        })
    }

    /// Reads a 32-bit byte length followed by that many bytes of UTF-16 text.
    pub fn read_prefixed_text(&mut self) -> Result<String> {
        let length = self.read_i32()?;
        if length < 0 {
            return Err(DmsError::format(format!(
                "negative text length {} at offset {}",
                length,
                self.position - 4
            )));
        }
        self.read_fixed_text(length as usize)
    }
}

/// Growable sink that writes integers and UTF-16 text in a fixed byte order.
#[derive(Debug, Default)]
pub struct EndianWriter {
    buffer: Vec<u8>,
    order: ByteOrder,
}

impl EndianWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buffer: Vec::new(),
            order,
        }
    }

    pub fn with_capacity(order: ByteOrder, capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn write_ordered(&mut self, little_endian: &[u8]) {
        match self.order {
            ByteOrder::Little => self.buffer.extend_from_slice(little_endian),
            ByteOrder::Big => self.buffer.extend(little_endian.iter().rev()),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_ordered(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_ordered(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_ordered(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_ordered(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_ordered(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_ordered(&value.to_le_bytes());
    }

    /// Writes `text` as UTF-16 into exactly `byte_width` bytes, zero padded.
    pub fn write_fixed_text(&mut self, text: &str, byte_width: usize) {
        let max_units = byte_width / 2;
        let units: Vec<u16> = text.encode_utf16().collect();
        if units.len() > max_units {
            warn!(text, byte_width, "text truncated to fit fixed-width slot");
        }

        let start = self.buffer.len();
        for &unit in units.iter().take(max_units) {
            self.write_u16(unit);
        }
        self.buffer.resize(start + byte_width, 0);
    }

    /// Writes the byte length (`2 * units + 2`), the UTF-16 text and a zero terminator.
    pub fn write_prefixed_text(&mut self, text: &str) {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_i32((units.len() * 2 + 2) as i32);
        for unit in units {
            self.write_u16(unit);
        }
        self.write_u16(0);
    }
}
