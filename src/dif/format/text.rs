//! Text dump scanning.
//!
//! Each line is a comma-separated row `key, flag, flag, value[, expiration]`
//! with optional double quotes around the fields. Rows are parsed
//! independently; a bad row is logged and skipped.

use log::{debug, info};

use crate::dif::types::error::{DifError, Result};
use crate::dif::types::models::{FlatDatabase, RawRecord};

/// Decodes every persistent record in a text dump.
///
/// # Errors
/// Returns [`DifError::Format`] if no line parses as a persistent record.
pub fn decode(content: &str) -> Result<FlatDatabase> {
    let mut records = FlatDatabase::new();
    let mut rows = 0usize;

    for (idx, line) in content.lines().enumerate() {
        rows += 1;
        match parse_row(line, idx + 1) {
            Ok(record) if record.expired => debug!("Expired key on line {} - ignored", idx + 1),
            Ok(record) => {
                records.insert(record.key, record.value);
            }
            Err(e) => debug!("{}", e),
        }
    }

    if records.is_empty() {
        return Err(DifError::Format(format!("no valid records in {} lines", rows)));
    }

    info!("Decoded {} text rows ({} kept)", rows, records.len());
    Ok(records)
}

/// Parses one row. `line` is the 1-based line number used in errors.
pub fn parse_row(row: &str, line: usize) -> Result<RawRecord> {
    let fields: Vec<&str> = row.split(',').collect();
    if fields.len() < 4 {
        return Err(DifError::MalformedRow {
            line,
            reason: format!("expected at least 4 fields, found {}", fields.len()),
        });
    }

    let key = fields[0].trim_start().trim_matches('"');
    let value = fields[3]
        .trim_start()
        .trim_end_matches(['"', '\n', '\r'])
        .trim_matches('"');

    let expired = match fields.get(4) {
        Some(raw) => {
            let raw = raw.trim().trim_matches('"').trim();
            let expiration: i64 = raw.parse().map_err(|_| DifError::MalformedRow {
                line,
                reason: format!("expiration '{}' is not a number", raw),
            })?;
            expiration != 0
        }
        None => false,
    };

    Ok(RawRecord {
        key: key.to_string(),
        value: value.to_string(),
        expired,
    })
}
