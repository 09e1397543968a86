//! # Binary Record Scanning
//!
//! The compiled database has no header or index. Records are found by
//! searching the whole buffer for [`RECORD_MARKER`]; each occurrence starts a
//! fixed [`BLOCK_SIZE`] block laid out as follows (offsets after the marker):
//!
//! ```text
//! 0    ..64    key, ASCII, NUL padded
//! 64   ..68    flags (unused)
//! 68   ..2116  value, windows-1252, NUL padded
//! 2116 ..2120  expiration timestamp, u32 big-endian (0 = persistent)
//! 2120 ..2120+ padding up to the block size
//! ```
//!
//! A block that cannot be decoded is dropped and scanning continues. Only a
//! buffer without a single decodable block is reported as an error.

use byteorder::{BigEndian, ByteOrder};
use encoding_rs::WINDOWS_1252;
use log::{debug, info, trace, warn};
use memchr::memmem;

use crate::dif::types::error::{DifError, Result};
use crate::dif::types::models::*;

/// Bytes with no windows-1252 character. The WHATWG decoder maps them to C1
/// controls instead of failing, so they are rejected up front.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8d, 0x8f, 0x90, 0x9d];

/// Decodes every persistent record in a binary database buffer.
///
/// # Errors
/// Returns [`DifError::Format`] if the marker never occurs or no persistent
/// block decodes.
pub fn decode(bytes: &[u8]) -> Result<FlatDatabase> {
    let mut records = FlatDatabase::new();
    let mut found = 0usize;
    let mut decoded = 0usize;

    for offset in memmem::find_iter(bytes, &RECORD_MARKER) {
        found += 1;
        match decode_block(bytes, offset) {
            Ok(record) if record.expired => {
                trace!("Skipping expiring key '{}' at {:#x}", record.key, offset);
                decoded += 1;
            }
            Ok(record) => {
                trace!("Record '{}' at {:#x}", record.key, offset);
                records.insert(record.key, record.value);
                decoded += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }

    if found == 0 {
        return Err(DifError::Format("record marker not present in buffer".to_string()));
    }
    if decoded == 0 {
        return Err(DifError::Format(format!("none of {} marked blocks could be decoded", found)));
    }
    if records.is_empty() {
        return Err(DifError::Format(format!("all {} decoded blocks are expiring entries", decoded)));
    }

    info!("Decoded {} binary blocks ({} kept, {} unreadable)", found, records.len(), found - decoded);
    Ok(records)
}

/// Decodes the block whose marker starts at `offset`.
pub fn decode_block(bytes: &[u8], offset: usize) -> Result<RawRecord> {
    let block = bytes
        .get(offset..offset.saturating_add(BLOCK_SIZE))
        .ok_or_else(|| DifError::FieldDecode {
            offset,
            reason: format!(
                "block truncated at {} of {} bytes",
                bytes.len().saturating_sub(offset),
                BLOCK_SIZE
            ),
        })?;
    let body = &block[RECORD_MARKER.len()..];

    let key_bytes = until_nul(&body[..KEY_WIDTH]);
    if !key_bytes.is_ascii() {
        return Err(DifError::FieldDecode {
            offset,
            reason: "key is not ASCII".to_string(),
        });
    }
    let key = String::from_utf8_lossy(key_bytes).into_owned();

    let value_bytes = until_nul(&body[VALUE_RANGE]);
    if let Some(byte) = value_bytes.iter().find(|&&b| CP1252_UNDEFINED.contains(&b)) {
        return Err(DifError::FieldDecode {
            offset,
            reason: format!("value of '{}' holds byte {:#04x}, undefined in windows-1252", key, byte),
        });
    }
    let (value, _) = WINDOWS_1252.decode_without_bom_handling(value_bytes);

    let expiration = BigEndian::read_u32(&body[EXPIRY_RANGE]);
    if expiration != 0 {
        debug!("Key '{}' expires at {}", key, expiration);
    }

    Ok(RawRecord {
        key,
        value: value.into_owned(),
        expired: expiration != 0,
    })
}

/// Trims a NUL-padded field at its first zero byte. A field without a
/// terminator is used whole.
fn until_nul(field: &[u8]) -> &[u8] {
    match memchr::memchr(0, field) {
        Some(end) => &field[..end],
        None => field,
    }
}
