pub mod items;
pub mod money;
pub mod totals;

pub use items::{compute_item_total, item_total, parse_quantity};
pub use money::{format_amount, parse_amount, parse_amount_str};
pub use totals::{aggregate, Aggregation, ComputedTotals, PricedItem, TaxRate};
