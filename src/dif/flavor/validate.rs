//! Rules a flavor must satisfy before it can be exported.
//!
//! Failing rules never touch the flavor; they only block export.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::edit::CLOCK;
use super::item::Category;
use super::Flavor;

/// The appliance rejects flavors with more products than this.
pub const MAX_PRODUCTS: usize = 99;

static INVALID_NAME_CHAR: OnceLock<Regex> = OnceLock::new();

fn invalid_name_char() -> &'static Regex {
    INVALID_NAME_CHAR.get_or_init(|| Regex::new(r"[^A-Z0-9]").expect("Invalid flavor name pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Flavor name contains an invalid character.")]
    InvalidName,
    #[error("Flavor name must contain at least one character.")]
    EmptyName,
    #[error("Clock cannot be enabled if there are no products.")]
    ClockWithoutProducts,
    #[error("Clock duration is longer than total product duration.")]
    ClockTooLong,
    #[error("You must have at least 1 product.")]
    NoProducts,
    #[error("Product count cannot be higher than 99!")]
    TooManyProducts,
}

/// Checks every export rule and returns the ones that fail, in a stable order.
pub fn validate(flavor: &Flavor) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (product_count, product_total) = flavor.totals(Category::Product);

    if invalid_name_char().is_match(&flavor.name) {
        errors.push(ValidationError::InvalidName);
    } else if flavor.name.is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if let Some(first) = flavor.misc().get(0) {
        if first.name == CLOCK && product_count == 0 {
            errors.push(ValidationError::ClockWithoutProducts);
        }
        if first.duration.as_f64() > product_total.as_f64() {
            errors.push(ValidationError::ClockTooLong);
        }
    }

    if product_count == 0 {
        errors.push(ValidationError::NoProducts);
    }
    if product_count > MAX_PRODUCTS {
        errors.push(ValidationError::TooManyProducts);
    }

    errors
}
