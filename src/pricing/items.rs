use crate::core::{DocumentError, DocumentResult};
use crate::models::{LineItem, RawAmount};

use super::money::{format_amount, parse_amount, zero};

/// Quantity of an item; a missing quantity counts as zero.
pub fn parse_quantity(item: &LineItem) -> DocumentResult<i64> {
    item.quantity.as_ref().map_or(Ok(0), parse_amount)
}

/// quantity × price as an integer.
pub fn item_total(item: &LineItem) -> DocumentResult<i64> {
    let quantity = parse_quantity(item)?;
    let price = parse_amount(item.price.as_ref().unwrap_or(&RawAmount::Integer(0)))?;

    quantity
        .checked_mul(price)
        .ok_or_else(|| DocumentError::MalformedAmount(format!("{} x {}", quantity, price)))
}

/// Formatted quantity × price, or the formatted zero when either operand is
/// malformed.
pub fn compute_item_total(item: &LineItem) -> String {
    match item_total(item) {
        Ok(total) => format_amount(total),
        Err(e) => {
            tracing::warn!(item = ?item.name, error = %e, "Item total falls back to zero");
            zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_quantity_by_separated_price() {
        assert_eq!(compute_item_total(&LineItem::new("A", 3, "1,000")), "3,000");
        assert_eq!(compute_item_total(&LineItem::new("B", "12", 2_500)), "30,000");
    }

    #[test]
    fn malformed_operand_yields_zero() {
        assert_eq!(compute_item_total(&LineItem::new("A", 2, "oops")), "0");
        assert_eq!(compute_item_total(&LineItem::new("A", "abc", 500)), "0");
    }

    #[test]
    fn missing_quantity_counts_as_zero() {
        let item = LineItem {
            name: Some("A".into()),
            price: Some(RawAmount::Integer(500)),
            ..Default::default()
        };
        assert_eq!(parse_quantity(&item).unwrap(), 0);
        assert_eq!(compute_item_total(&item), "0");
    }

    #[test]
    fn overflow_is_treated_as_malformed() {
        let item = LineItem::new("A", i64::MAX, 2);
        assert!(item_total(&item).is_err());
        assert_eq!(compute_item_total(&item), "0");
    }
}
