//! Binary primitives mirroring the NetDisk's `writeName`/`writeInteger`/
//! `write64BitInteger`/`writeString` functions and `CODE_*` record tags.
//! The full tagged on-disk flower format is out of scope (SPEC_FULL.md
//! §6) — this module only covers the primitives far enough to round-trip
//! through bytes, which the `serde_json`-based tests exercise instead for
//! whole records.

use crate::error::{CactusError, Result};
use crate::name::Name;
use std::io::{Cursor, Read};

/// Record-kind tags, mirroring the original format's `CODE_BLOCK` etc.
/// Kept as an enum of the handful of entity kinds this crate models, not
/// a faithful reproduction of the original tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Block = 1,
    End = 2,
    Segment = 3,
    Cap = 4,
    Chain = 5,
    Group = 6,
    Event = 7,
}

pub fn write_name(buf: &mut Vec<u8>, name: Name) {
    buf.extend_from_slice(&name.raw().to_be_bytes());
}

pub fn read_name(cursor: &mut Cursor<&[u8]>) -> Result<Name> {
    let mut bytes = [0u8; 8];
    cursor.read_exact(&mut bytes).map_err(CactusError::from)?;
    Ok(Name::from_raw(u64::from_be_bytes(bytes)))
}

pub fn write_integer(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub fn read_integer(cursor: &mut Cursor<&[u8]>) -> Result<i32> {
    let mut bytes = [0u8; 4];
    cursor.read_exact(&mut bytes).map_err(CactusError::from)?;
    Ok(i32::from_be_bytes(bytes))
}

pub fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_integer(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

pub fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_integer(cursor)? as usize;
    let mut bytes = vec![0u8; len];
    cursor.read_exact(&mut bytes).map_err(CactusError::from)?;
    String::from_utf8(bytes).map_err(|e| CactusError::SerializationCorruption(e.to_string()))
}
