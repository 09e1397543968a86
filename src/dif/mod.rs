//! Core DIF codec and flavor engine.
//!
//! Data flows one way through the layers:
//!
//! ```text
//! file bytes ─► format::{binary, text} ─► FlatDatabase
//!            ─► flavor::reconstruct   ─► name → Flavor
//!   (edits on one Flavor, held by session::FlavorSession)
//! Flavor     ─► flavor::encode        ─► import text
//! ```

pub mod flavor;
pub mod format;
pub mod session;
pub mod types;

pub use flavor::encode::{encode_flavor, encode_flavor_with_version, export_flavor};
pub use flavor::reconstruct::reconstruct_flavors;
pub use format::{decode_bytes, parse_database, parse_database_tagged};
pub use types::error::{DifError, ErrorKind, Result};
