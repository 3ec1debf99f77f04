use serde::Serialize;

use crate::core::{DocumentError, DocumentResult};
use crate::models::{LineItem, RawAmount};

use super::items::{item_total, parse_quantity};
use super::money::{format_amount, parse_amount, zero};

/// Tax rate as a whole percentage (10 = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(i64);

impl TaxRate {
    pub fn from_percent(percent: i64) -> Self {
        TaxRate(percent)
    }

    pub fn percent(&self) -> i64 {
        self.0
    }

    /// floor(amount × rate); a tax that does not fit in an `i64` is malformed.
    pub fn apply(&self, amount: i64) -> DocumentResult<i64> {
        let tax = (i128::from(amount) * i128::from(self.0)).div_euclid(100);
        i64::try_from(tax)
            .map_err(|_| DocumentError::MalformedAmount(format!("{} x {}%", amount, self.0)))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(10)
    }
}

/// A line item with its total and tax filled in and formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<RawAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<RawAmount>,
    pub total: String,
    pub total_str: String,
    pub tax_amount: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Keys that `PricedItem` always computes itself.
const COMPUTED_ITEM_KEYS: [&str; 2] = ["total_str", "tax_amount"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedTotals {
    pub supply_price: String,
    /// floor(supply_price × rate)
    pub tax_amount: String,
    /// Sum of per-item taxes; may differ from `tax_amount` by rounding.
    pub total_tax_amount: String,
    pub total_amount: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub items: Vec<PricedItem>,
    pub totals: ComputedTotals,
}

/// Saturating sum that reports when the clamp kicks in.
fn accumulate(sum: i64, value: i64, field: &'static str) -> i64 {
    sum.checked_add(value).unwrap_or_else(|| {
        tracing::warn!(field, sum, value, "Amount overflow, clamping");
        sum.saturating_add(value)
    })
}

/// Derives every item's total and tax plus the collection totals.
///
/// The input is left untouched; the populated items come back in input order.
/// Malformed totals contribute zero and malformed quantities are left out of
/// `total_quantity`; neither stops the remaining items from being processed.
pub fn aggregate(items: &[LineItem], rate: TaxRate) -> Aggregation {
    let mut supply_price: i64 = 0;
    let mut total_tax: i64 = 0;
    let mut total_quantity: i64 = 0;

    let priced: Vec<PricedItem> = items
        .iter()
        .map(|item| {
            let parsed_total = if item.needs_total() {
                // Same zero fallback as the formatted item total.
                Ok(item_total(item).unwrap_or(0))
            } else {
                item.total.as_ref().map_or(Ok(0), parse_amount)
            };

            let priced = parsed_total.and_then(|total| rate.apply(total).map(|tax| (total, tax)));
            let (total, tax) = match priced {
                Ok((total, tax)) => {
                    supply_price = accumulate(supply_price, total, "supply_price");
                    total_tax = accumulate(total_tax, tax, "total_tax_amount");
                    (format_amount(total), format_amount(tax))
                }
                Err(e) => {
                    tracing::warn!(
                        item = ?item.name,
                        error = %e,
                        "Item excluded from supply price"
                    );
                    (zero(), zero())
                }
            };

            match parse_quantity(item) {
                Ok(quantity) => {
                    total_quantity = accumulate(total_quantity, quantity, "total_quantity")
                }
                Err(e) => tracing::debug!(item = ?item.name, error = %e, "Quantity skipped"),
            }

            let mut extra = item.extra.clone();
            for key in COMPUTED_ITEM_KEYS {
                extra.remove(key);
            }

            PricedItem {
                name: item.name.clone(),
                quantity: item.quantity.clone(),
                price: item.price.clone(),
                total_str: total.clone(),
                total,
                tax_amount: tax,
                extra,
            }
        })
        .collect();

    let tax_amount = rate.apply(supply_price).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Supply price tax overflow, clamping");
        if (supply_price < 0) == (rate.percent() < 0) {
            i64::MAX
        } else {
            i64::MIN
        }
    });

    Aggregation {
        items: priced,
        totals: ComputedTotals {
            supply_price: format_amount(supply_price),
            tax_amount: format_amount(tax_amount),
            total_tax_amount: format_amount(total_tax),
            total_amount: format_amount(accumulate(supply_price, tax_amount, "total_amount")),
            total_quantity,
        },
    }
}
