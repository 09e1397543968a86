//! Rebuilds flavors from the flat key space.
//!
//! The database stores each flavor denormalized across many keys:
//!
//! ```text
//! c_flavor_<name>                  @Init(<name>)<modifiers>
//! c_<name>_product_num             2
//! c_<name>_product_00              <product name>
//! c_<name>_product_duration_00     <seconds>
//! c_<name>_sensor_num / _misc_num  ... same pattern per category
//! ```
//!
//! Counts turn up interleaved with the items they describe, so discovery and
//! list resolution are separate passes.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};

use super::item::{Category, Item, ItemList, Seconds};
use super::Flavor;
use crate::dif::types::error::DifError;
use crate::dif::types::models::FlatDatabase;

/// `c_flavor_*` and `c_*_` names that are database settings, not flavors.
pub const RESERVED_NAMES: [&str; 6] = [
    "name_prefix",
    "rule_file_name",
    "version_name",
    "SENSORS",
    "PERM",
    "TAG",
];

const FLAVOR_PREFIX: &str = "c_flavor_";
const CONFIG_PREFIX: &str = "c_";
const INIT_MARKER: &str = "@Init";

/// Per-flavor state gathered in the discovery pass.
#[derive(Default)]
struct Discovered {
    init: bool,
    modifiers: Option<String>,
    counts: HashMap<Category, usize>,
}

/// Groups the flat database into flavors keyed by name.
pub fn reconstruct_flavors(db: &FlatDatabase) -> BTreeMap<String, Flavor> {
    let discovered = discover(db);

    let flavors: BTreeMap<String, Flavor> = discovered
        .into_iter()
        .map(|(name, found)| {
            let mut flavor = Flavor::new(name.as_str());
            flavor.init = found.init;
            flavor.modifiers = found.modifiers;
            for category in Category::ALL {
                let declared = found.counts.get(&category).copied().unwrap_or(0);
                *flavor.list_mut(category) = resolve_list(db, &name, category, declared);
            }
            info!("Got details for discovered flavor '{}'", name);
            (name, flavor)
        })
        .collect();

    info!("Reconstructed {} flavors from {} keys", flavors.len(), db.len());
    flavors
}

/// Pass 1: find activation records and per-category counts.
fn discover(db: &FlatDatabase) -> HashMap<String, Discovered> {
    let mut found: HashMap<String, Discovered> = HashMap::new();

    for (key, value) in db {
        if let Some(name) = key.strip_prefix(FLAVOR_PREFIX) {
            if RESERVED_NAMES.contains(&name) {
                continue;
            }
            let entry = found.entry(name.to_string()).or_default();
            if value.starts_with(INIT_MARKER) {
                debug!("Found Init key for flavor '{}'", name);
                entry.init = true;
                entry.modifiers = init_modifiers(name, value);
            } else {
                warn!("Flavor key '{}' exists but is not initialized as a callable flavor", key);
                entry.init = false;
            }
            continue;
        }

        let Some((name, suffix)) = key
            .strip_prefix(CONFIG_PREFIX)
            .and_then(|rest| rest.split_once('_'))
        else {
            continue;
        };
        if RESERVED_NAMES.contains(&name) {
            continue;
        }
        let Some(category) = Category::from_count_suffix(suffix) else {
            continue;
        };
        match value.trim().parse::<usize>() {
            Ok(count) => {
                debug!("Got {} count for flavor '{}': {}", category, name, count);
                found
                    .entry(name.to_string())
                    .or_default()
                    .counts
                    .insert(category, count);
            }
            Err(_) => warn!("Ignoring unreadable {} count '{}' for key '{}'", category, value, key),
        }
    }

    found
}

/// Text following `@Init(<name>)` in an activation value.
fn init_modifiers(name: &str, value: &str) -> Option<String> {
    let token_len = INIT_MARKER.len() + name.len() + 2;
    let rest = value
        .strip_prefix(&format!("{}({})", INIT_MARKER, name))
        .or_else(|| value.get(token_len..))
        .unwrap_or_default();
    if rest.is_empty() {
        None
    } else {
        debug!("Flavor '{}' has modifiers: '{}'", name, rest);
        Some(rest.to_string())
    }
}

/// Pass 2: look up `count` indexed name/duration pairs for one category.
/// Incomplete or unreadable indices are skipped.
fn resolve_list(db: &FlatDatabase, flavor: &str, category: Category, count: usize) -> ItemList {
    let segment = category.key_segment();
    let mut order = Vec::with_capacity(count);

    for index in 0..count {
        let name = db
            .get(&format!("c_{}_{}_{:02}", flavor, segment, index))
            .filter(|s| !s.is_empty());
        let duration = db
            .get(&format!("c_{}_{}_duration_{:02}", flavor, segment, index))
            .filter(|s| !s.is_empty());

        let (name, duration) = match (name, duration) {
            (Some(name), Some(duration)) => (name, duration),
            (name, _) => {
                let missing = if name.is_none() { "name" } else { "duration" };
                warn!(
                    "{}",
                    DifError::ItemIntegrity {
                        flavor: flavor.to_string(),
                        category: segment,
                        index,
                        missing,
                    }
                );
                continue;
            }
        };

        match duration.parse::<Seconds>() {
            Ok(seconds) => order.push(Item::new(name.as_str(), seconds)),
            Err(_) => warn!(
                "{}",
                DifError::InvalidDuration {
                    category: category.label(),
                    value: duration.clone(),
                }
            ),
        }
    }

    if order.len() < count {
        debug!(
            "Flavor '{}' declares {} {} entries, resolved {}",
            flavor,
            count,
            segment,
            order.len()
        );
    }
    ItemList::from_items(order)
}
