//! Display formatting for grid cells.

use shared::{
    domain::Product,
    error::{CatalogError, FormatError},
};

use crate::logger::Logger;

pub const PRICE_PLACEHOLDER: &str = "N/A";
const CURRENCY_PREFIX: &str = "HK$";

/// Renders a price as Hong Kong dollars with an en-US layout, e.g.
/// `HK$1,234.50`.
pub fn format_price(price: f64) -> Result<String, FormatError> {
    if !price.is_finite() {
        return Err(FormatError::NonFinitePrice(price));
    }

    let scaled = (price.abs() * 100.0).round();
    if scaled >= u128::MAX as f64 {
        return Err(FormatError::PriceOutOfRange(price));
    }
    let cents = scaled as u128;
    let sign = if price.is_sign_negative() && cents > 0 {
        "-"
    } else {
        ""
    };
    Ok(format!(
        "{sign}{CURRENCY_PREFIX}{}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    ))
}

/// Price cell text; formatting faults are logged and replaced by
/// [`PRICE_PLACEHOLDER`].
pub fn price_cell(product: &Product, logger: &Logger) -> String {
    let Some(price) = product.price else {
        return String::new();
    };

    match format_price(price) {
        Ok(text) => text,
        Err(err) => {
            logger.error("Failed to format price", &CatalogError::from(err));
            PRICE_PLACEHOLDER.to_string()
        }
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
