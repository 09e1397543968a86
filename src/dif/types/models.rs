//! Core data structures and layout constants for DIF databases.
//!
//! A DIF database is a flat key/value store. The appliance keeps it either as a
//! compiled binary file (`wxl_dif.dat`) made of fixed-size marked blocks, or as a
//! plain text dump with one quoted, comma-separated record per line.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// The flat key → value view of a decoded database.
///
/// Later records with the same key overwrite earlier ones.
pub type FlatDatabase = HashMap<String, String>;

/// Byte sequence that precedes every record block in a binary database.
pub const RECORD_MARKER: [u8; 10] = [0xfa, 0xfa, 0x00, 0x00, 0x08, 0x52, 0x00, 0x00, 0x08, 0x48];

/// Size of one record block, marker included.
pub const BLOCK_SIZE: usize = 2130;

/// Width of the NUL-padded key field, relative to the end of the marker.
pub const KEY_WIDTH: usize = 64;

/// Value field range, relative to the end of the marker.
/// The four bytes between key and value are flags and are not interpreted.
pub const VALUE_RANGE: std::ops::Range<usize> = 68..2116;

/// Big-endian expiration timestamp range, relative to the end of the marker.
pub const EXPIRY_RANGE: std::ops::Range<usize> = 2116..2120;

/// One record as it appears in either storage format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: String,
    pub value: String,
    /// `true` when the record carries a non-zero expiration and is an
    /// ephemeral cache entry rather than persistent configuration.
    pub expired: bool,
}

/// Which decoder produced a flat database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedWith {
    Binary,
    Text,
}

impl fmt::Display for DecodedWith {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodedWith::Binary => write!(f, "binary"),
            DecodedWith::Text => write!(f, "text"),
        }
    }
}

/// Storage format suggested by a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    /// `.dat`: compiled binary database.
    Binary,
    /// `.txt`: text dump.
    Text,
    /// Anything else: try binary, then text.
    Unknown,
}

impl FormatHint {
    /// Derives the hint from the path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("dat") => FormatHint::Binary,
            Some("txt") => FormatHint::Text,
            _ => FormatHint::Unknown,
        }
    }
}
