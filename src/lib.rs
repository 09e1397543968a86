//! # dif-flavor
//!
//! Decoder and encoder for the WeatherSTAR XL configuration database (DIF),
//! in both its compiled binary form and its text dump form, plus an editable
//! model of the "flavors" (ordered product/sensor/clock sequences) stored in it.
//!
//! ```no_run
//! use dif_flavor::{parse_database, reconstruct_flavors, export_flavor};
//!
//! let db = parse_database("wxl_dif.dat");
//! let flavors = reconstruct_flavors(&db);
//! if let Some(flavor) = flavors.get("L") {
//!     println!("{}", export_flavor(flavor).unwrap());
//! }
//! ```
pub mod dif;

// Re-export the main types for convenience
pub use dif::{
    decode_bytes, encode_flavor, encode_flavor_with_version, export_flavor, parse_database,
    parse_database_tagged, reconstruct_flavors, DifError, ErrorKind, Result,
    flavor::{
        edit::{compute_totals, move_item},
        item::{Category, Item, ItemList, Seconds},
        validate::{validate, ValidationError},
        Flavor,
    },
    session::FlavorSession,
    types::models::{DecodedWith, FlatDatabase, FormatHint, RawRecord},
};
