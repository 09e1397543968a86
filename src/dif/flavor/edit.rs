//! Positional edits on a flavor's item lists.

use log::{debug, info};

use super::item::{Category, Item, Seconds};
use super::Flavor;
use crate::dif::types::error::{DifError, Result};

/// Name of the on-screen clock overlay, the only misc entry in practice.
pub const CLOCK: &str = "clock";

/// Returns the number of items and their summed duration.
pub fn compute_totals(order: &[Item]) -> (usize, Seconds) {
    let total: Seconds = order.iter().map(|item| item.duration).sum();
    (order.len(), Seconds::from_f64(total.as_f64()))
}

/// Moves the item at `from` to position `to`; other items keep their
/// relative order. A `to` past the end lands on the last position.
///
/// # Errors
/// Fails with [`DifError::IndexOutOfRange`] if `from` is not a valid index.
pub fn move_item<T>(order: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    if from >= order.len() {
        return Err(DifError::IndexOutOfRange {
            category: "item",
            index: from,
            len: order.len(),
        });
    }
    let item = order.remove(from);
    let to = to.min(order.len());
    order.insert(to, item);
    Ok(())
}

impl Flavor {
    /// Adds an item to the end of a list (`index == None`) or replaces the
    /// item at `index`. The duration is parsed from text.
    pub fn add_or_update_item(
        &mut self,
        category: Category,
        index: Option<usize>,
        name: &str,
        duration: &str,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(DifError::MissingField {
                category: category.label(),
                field: "name",
            });
        }
        if duration.trim().is_empty() {
            return Err(DifError::MissingField {
                category: category.label(),
                field: "duration",
            });
        }
        let seconds: Seconds = duration.parse().map_err(|_| DifError::InvalidDuration {
            category: category.label(),
            value: duration.to_string(),
        })?;
        let item = Item::new(name, seconds);

        let list = self.list_mut(category);
        match index {
            Some(index) => {
                let len = list.count();
                list.edit(|order| match order.get_mut(index) {
                    Some(slot) => {
                        *slot = item;
                        Ok(())
                    }
                    None => Err(DifError::IndexOutOfRange {
                        category: category.label(),
                        index,
                        len,
                    }),
                })?;
                info!("Updated {} {}: '{}' with duration of {} seconds", category, index, name, seconds);
            }
            None => {
                list.edit(|order| order.push(item));
                info!("Added {} '{}' with duration of {} seconds", category, name, seconds);
            }
        }
        Ok(())
    }

    /// Removes and returns the item at `index`.
    pub fn remove_item(&mut self, category: Category, index: usize) -> Result<Item> {
        let list = self.list_mut(category);
        let len = list.count();
        if index >= len {
            return Err(DifError::IndexOutOfRange {
                category: category.label(),
                index,
                len,
            });
        }
        let removed = list.edit(|order| order.remove(index));
        debug!(
            "Removed {} {}: '{}' with duration of {} seconds",
            category, index, removed.name, removed.duration
        );
        Ok(removed)
    }

    /// Relocates an item within one list, see [`move_item`].
    pub fn move_item(&mut self, category: Category, from: usize, to: usize) -> Result<()> {
        let list = self.list_mut(category);
        let len = list.count();
        list.edit(|order| move_item(order, from, to))
            .map_err(|_| DifError::IndexOutOfRange {
                category: category.label(),
                index: from,
                len,
            })?;
        debug!("Moved {} {} to {}", category, from, to);
        Ok(())
    }

    /// Count and summed duration of one list.
    pub fn totals(&self, category: Category) -> (usize, Seconds) {
        compute_totals(self.list(category).order())
    }

    /// Whether the clock overlay is the first misc entry.
    pub fn clock_enabled(&self) -> bool {
        self.misc.get(0).is_some_and(|item| item.name == CLOCK)
    }

    /// Turns the clock overlay on, lasting as long as all products, or off.
    pub fn set_clock(&mut self, enabled: bool) {
        let order = if enabled {
            let (_, total) = self.totals(Category::Product);
            vec![Item::new(CLOCK, total)]
        } else {
            Vec::new()
        };
        self.misc.edit(|misc| *misc = order);
        info!("On-screen clock {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Re-derives the clock duration after product edits. No-op when the
    /// clock is off.
    pub fn sync_clock(&mut self) {
        if self.clock_enabled() {
            self.set_clock(true);
        }
    }
}
