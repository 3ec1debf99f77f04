use serde::Serialize;

use super::{Receiver, Supplier};
use crate::pricing::PricedItem;

/// Everything a template can reference, with every amount already formatted.
///
/// Two template styles are served from the same view: flat templates read
/// the `supplier_*`/`receiver_*` scalars and the pre-rendered `items_rows`,
/// structured templates walk `supplier`, `receiver` and `items`. The `*_str`
/// fields are synonyms kept for templates written against that naming.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledView {
    pub title: String,
    pub doc_number: String,
    pub date: String,
    pub tax: i64,

    pub supply_price: String,
    pub tax_amount: String,
    pub total_tax_amount: String,
    pub total_amount: String,
    pub total_quantity: i64,

    pub subtotal_str: String,
    pub tax_amount_str: String,
    pub grand_total_str: String,

    pub receiver_name: String,
    pub receiver_ceo: String,
    pub supplier_name: String,
    pub supplier_ceo: String,
    pub supplier_reg_id: String,
    pub supplier_address: String,
    pub supplier_contact: String,
    pub items_rows: String,

    pub receiver: Receiver,
    pub supplier: Supplier,
    pub items: Vec<PricedItem>,
}
