//! Named timed items and the ordered lists that hold them.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A duration in seconds, kept whole when it has no fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seconds {
    Whole(i64),
    Fractional(f64),
}

impl Seconds {
    pub const ZERO: Seconds = Seconds::Whole(0);

    /// Normalizes a float: integral values become [`Seconds::Whole`].
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Seconds::Whole(value as i64)
        } else {
            Seconds::Fractional(value)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Seconds::Whole(v) => v as f64,
            Seconds::Fractional(v) => v,
        }
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Seconds::ZERO
    }
}

impl Add for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Seconds) -> Seconds {
        match (self, rhs) {
            (Seconds::Whole(a), Seconds::Whole(b)) => match a.checked_add(b) {
                Some(sum) => Seconds::Whole(sum),
                None => Seconds::from_f64(a as f64 + b as f64),
            },
            (a, b) => Seconds::from_f64(a.as_f64() + b.as_f64()),
        }
    }
}

impl std::iter::Sum for Seconds {
    fn sum<I: Iterator<Item = Seconds>>(iter: I) -> Seconds {
        iter.fold(Seconds::ZERO, Add::add)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Seconds::Whole(v) => write!(f, "{}", v),
            Seconds::Fractional(v) => write!(f, "{}", v),
        }
    }
}

/// Error returned when text is not a whole number or decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSecondsError;

impl fmt::Display for ParseSecondsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not a whole number or decimal")
    }
}

impl std::error::Error for ParseSecondsError {}

impl FromStr for Seconds {
    type Err = ParseSecondsError;

    /// Accepts "5", "5.0" (both whole) and "2.5". Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(whole) = s.parse::<i64>() {
            return Ok(Seconds::Whole(whole));
        }
        match s.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Seconds::from_f64(value)),
            _ => Err(ParseSecondsError),
        }
    }
}

impl Serialize for Seconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Seconds::Whole(v) => serializer.serialize_i64(*v),
            Seconds::Fractional(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Snapshots written straight from a scanned database carry durations as
/// strings, edited ones as numbers. Both are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum SecondsRepr {
    Whole(i64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

impl SecondsRepr {
    fn to_seconds(&self) -> Option<Seconds> {
        match self {
            SecondsRepr::Whole(v) => Some(Seconds::Whole(*v)),
            SecondsRepr::Fractional(v) if v.is_finite() => Some(Seconds::from_f64(*v)),
            SecondsRepr::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Seconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SecondsRepr::deserialize(deserializer)?;
        repr.to_seconds().ok_or_else(|| match repr {
            SecondsRepr::Text(s) => serde::de::Error::custom(format!("invalid duration '{}'", s)),
            _ => serde::de::Error::custom("duration must be a number or numeric string"),
        })
    }
}

/// A product, sensor or misc entry: a named segment of the playback sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub duration: Seconds,
}

impl Item {
    pub fn new(name: impl Into<String>, duration: Seconds) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// The three item lists a flavor carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Product,
    Sensor,
    Misc,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Product, Category::Sensor, Category::Misc];

    /// The segment used for this category in database keys.
    pub fn key_segment(self) -> &'static str {
        match self {
            Category::Product => "product",
            Category::Sensor => "sensor",
            Category::Misc => "misc",
        }
    }

    /// Maps a `<segment>_num` key suffix back to its category.
    pub fn from_count_suffix(suffix: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| suffix.strip_prefix(c.key_segment()) == Some("_num"))
    }

    /// Human readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Category::Product => "Product",
            Category::Sensor => "Sensor",
            Category::Misc => "Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key_segment())
    }
}

/// An ordered item list whose count always equals its length.
///
/// Positions are the only identity an item has; all edits address items by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemListSnapshot")]
pub struct ItemList {
    count: usize,
    order: Vec<Item>,
}

/// Serialized form of an [`ItemList`]. The stored count is not trusted and
/// rows without a name or a readable duration are dropped.
#[derive(Deserialize, Default)]
struct ItemListSnapshot {
    #[serde(default)]
    #[allow(dead_code)]
    count: Option<usize>,
    #[serde(default)]
    order: Option<Vec<ItemRow>>,
}

/// One snapshot row, read without requiring either field.
#[derive(Deserialize)]
struct ItemRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    duration: Option<SecondsRepr>,
}

impl From<ItemListSnapshot> for ItemList {
    fn from(snapshot: ItemListSnapshot) -> Self {
        let order = snapshot
            .order
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let name = row.name.filter(|n| !n.is_empty());
                let duration = row.duration.as_ref().and_then(SecondsRepr::to_seconds);
                match (name, duration) {
                    (Some(name), Some(duration)) => Some(Item::new(name, duration)),
                    _ => {
                        warn!("Invalid entry {} found in snapshot - dropping", index);
                        None
                    }
                }
            })
            .collect();
        ItemList::from_items(order)
    }
}

impl ItemList {
    pub fn from_items(order: Vec<Item>) -> Self {
        Self {
            count: order.len(),
            order,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn order(&self) -> &[Item] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.order.get(index)
    }

    /// Mutates the underlying vector and re-syncs the count afterwards.
    pub(crate) fn edit<R>(&mut self, f: impl FnOnce(&mut Vec<Item>) -> R) -> R {
        let out = f(&mut self.order);
        self.count = self.order.len();
        out
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
