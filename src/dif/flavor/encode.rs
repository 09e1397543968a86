//! Writes a flavor as DIF import text.
//!
//! Every line has the shape `"<key>",0,0,"<value>"`, the form the appliance's
//! `db_imp` importer reads. Line order:
//!
//! 1. `c_flavor_<name>` activation directive (initialized flavors only)
//! 2. `c_<name>_duration`
//! 3. per category: `_num` count, then `_NN` / `_duration_NN` pairs
//! 4. `_product_version`, `_sensor_version`, `_misc_version`

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use super::item::Category;
use super::validate::validate;
use super::Flavor;
use crate::dif::types::error::{DifError, Result};

/// Prefix of the version token stamped on exported flavors.
pub const VERSION_PREFIX: &str = "EXPORT_";

/// Appends one import record line.
fn push_record(out: &mut String, key: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("\"{}\",0,0,\"{}\"\n", key, value));
}

/// Encodes `flavor`, stamping it with a version token derived from the
/// current time.
pub fn encode_flavor(flavor: &Flavor) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    encode_flavor_with_version(flavor, &format!("{}{}", VERSION_PREFIX, seconds))
}

/// Encodes `flavor` with an explicit version token.
pub fn encode_flavor_with_version(flavor: &Flavor, version: &str) -> String {
    let name = &flavor.name;
    let mut out = String::new();

    if let Some(directive) = flavor.init_directive() {
        push_record(&mut out, &format!("c_flavor_{}", name), directive);
    }
    push_record(&mut out, &format!("c_{}_duration", name), flavor.duration());

    for category in Category::ALL {
        let segment = category.key_segment();
        let list = flavor.list(category);
        push_record(&mut out, &format!("c_{}_{}_num", name, segment), list.count());
        for (index, item) in list.order().iter().enumerate() {
            push_record(&mut out, &format!("c_{}_{}_{:02}", name, segment, index), &item.name);
            push_record(
                &mut out,
                &format!("c_{}_{}_duration_{:02}", name, segment, index),
                item.duration,
            );
        }
    }

    for category in Category::ALL {
        push_record(
            &mut out,
            &format!("c_{}_{}_version", name, category.key_segment()),
            version,
        );
    }

    debug!("Encoded flavor '{}' as {} lines", name, out.lines().count());
    out
}

/// Validates and encodes `flavor` for import on the appliance.
///
/// # Errors
/// Returns [`DifError::Validation`] listing every failed rule.
pub fn export_flavor(flavor: &Flavor) -> Result<String> {
    let errors = validate(flavor);
    if !errors.is_empty() {
        return Err(DifError::Validation(errors));
    }
    info!("Building DIF import text for flavor '{}'", flavor.name);
    Ok(encode_flavor(flavor))
}
