//! The flavor model: a named, ordered broadcast sequence.
//!
//! - [`item`]: durations, items, categories and count-synced item lists
//! - [`reconstruct`]: rebuilds flavors from a flat database
//! - [`encode`]: writes a flavor back as DIF import text
//! - [`edit`]: positional list edits, totals and the clock overlay
//! - [`validate`]: rules a flavor must satisfy before export

pub mod edit;
pub mod encode;
pub mod item;
pub mod reconstruct;
pub mod validate;

use serde::{Deserialize, Serialize};

use item::{Category, ItemList};

/// A flavor as edited in memory.
///
/// The item lists are only reachable through accessors and the edit
/// operations, which keep every list's count equal to its length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "FlavorSnapshot", from = "FlavorSnapshot")]
pub struct Flavor {
    pub name: String,
    /// Whether the flavor carries an `@Init` activation directive.
    pub init: bool,
    /// Text appended after `@Init(<name>)`.
    pub modifiers: Option<String>,
    products: ItemList,
    sensors: ItemList,
    misc: ItemList,
}

impl Flavor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn list(&self, category: Category) -> &ItemList {
        match category {
            Category::Product => &self.products,
            Category::Sensor => &self.sensors,
            Category::Misc => &self.misc,
        }
    }

    pub(crate) fn list_mut(&mut self, category: Category) -> &mut ItemList {
        match category {
            Category::Product => &mut self.products,
            Category::Sensor => &mut self.sensors,
            Category::Misc => &mut self.misc,
        }
    }

    pub fn products(&self) -> &ItemList {
        &self.products
    }

    pub fn sensors(&self) -> &ItemList {
        &self.sensors
    }

    pub fn misc(&self) -> &ItemList {
        &self.misc
    }

    /// Total product playback time, e.g. `"37.5 sec"`.
    pub fn duration(&self) -> String {
        let (_, total) = edit::compute_totals(self.products.order());
        format!("{} sec", total)
    }

    /// The activation directive value, if the flavor is initialized.
    pub fn init_directive(&self) -> Option<String> {
        self.init.then(|| {
            format!(
                "@Init({}){}",
                self.name,
                self.modifiers.as_deref().unwrap_or_default()
            )
        })
    }
}

/// On-disk JSON shape of a flavor. Every part is optional on read.
#[derive(Serialize, Deserialize, Default)]
struct FlavorSnapshot {
    #[serde(default)]
    name: String,
    #[serde(default)]
    init: Option<bool>,
    #[serde(default)]
    modifiers: Option<String>,
    #[serde(default)]
    products: ItemList,
    #[serde(default)]
    sensors: ItemList,
    #[serde(default)]
    misc: ItemList,
    #[serde(default)]
    duration: Option<String>,
}

impl From<Flavor> for FlavorSnapshot {
    fn from(flavor: Flavor) -> Self {
        let duration = Some(flavor.duration());
        Self {
            name: flavor.name,
            init: Some(flavor.init),
            modifiers: flavor.modifiers,
            products: flavor.products,
            sensors: flavor.sensors,
            misc: flavor.misc,
            duration,
        }
    }
}

impl From<FlavorSnapshot> for Flavor {
    fn from(snapshot: FlavorSnapshot) -> Self {
        Self {
            name: snapshot.name,
            init: snapshot.init.unwrap_or(false),
            modifiers: snapshot.modifiers.filter(|m| !m.is_empty()),
            products: snapshot.products,
            sensors: snapshot.sensors,
            misc: snapshot.misc,
        }
    }
}
