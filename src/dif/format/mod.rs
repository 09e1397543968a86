//! Storage format layer for DIF databases.
//!
//! - [`binary`]: scans compiled `.dat` databases for marked record blocks
//! - [`text`]: parses `.txt` dumps line by line
//!
//! [`decode_bytes`] picks the decoder from a [`FormatHint`]. With no usable
//! hint it tries the binary decoder first and falls back to text, reporting
//! which one produced the result.

pub mod binary;
pub mod text;

use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};
use log::{debug, error, info, warn};

use crate::dif::types::error::Result;
use crate::dif::types::models::{DecodedWith, FlatDatabase, FormatHint};

/// Decodes an in-memory database using the strategy selected by `hint`.
///
/// # Errors
/// Returns the last decoder's [`DifError::Format`](crate::DifError::Format)
/// when no decoder finds any record.
pub fn decode_bytes(bytes: &[u8], hint: FormatHint) -> Result<(FlatDatabase, DecodedWith)> {
    match hint {
        FormatHint::Binary => {
            info!("Fetching database keys from compiled DIF data");
            binary::decode(bytes).map(|db| (db, DecodedWith::Binary))
        }
        FormatHint::Text => {
            info!("Fetching database keys from DIF text dump");
            text::decode(&bytes_to_text(bytes)).map(|db| (db, DecodedWith::Text))
        }
        FormatHint::Unknown => {
            warn!("Unknown file type, trying both database formats");
            match binary::decode(bytes) {
                Ok(db) => Ok((db, DecodedWith::Binary)),
                Err(e) => {
                    debug!("Binary decode failed ({}), falling back to text", e);
                    text::decode(&bytes_to_text(bytes)).map(|db| (db, DecodedWith::Text))
                }
            }
        }
    }
}

/// Reads and decodes the database at `path`, reporting which decoder
/// succeeded. Never fails: unreadable or undecodable files yield an empty
/// database and `None`.
pub fn parse_database_tagged(path: impl AsRef<Path>) -> (FlatDatabase, Option<DecodedWith>) {
    let path = path.as_ref();
    info!("Parsing DIF database at '{}'", path.display());

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Couldn't read '{}': {}", path.display(), e);
            return (FlatDatabase::new(), None);
        }
    };

    match decode_bytes(&bytes, FormatHint::from_path(path)) {
        Ok((db, with)) => {
            info!("Read {} keys from '{}' ({} format)", db.len(), path.display(), with);
            (db, Some(with))
        }
        Err(e) => {
            error!("Couldn't find any database keys in '{}': {}", path.display(), e);
            (FlatDatabase::new(), None)
        }
    }
}

/// Reads and decodes the database at `path`.
///
/// An empty result means no data was found; the cause has already been logged.
pub fn parse_database(path: impl AsRef<Path>) -> FlatDatabase {
    parse_database_tagged(path).0
}

/// Text dumps are expected to be UTF-8; anything else is read as windows-1252,
/// matching the binary value encoding.
fn bytes_to_text(bytes: &[u8]) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text.into_owned();
    }
    debug!("Text dump is not UTF-8, reading as windows-1252");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}
