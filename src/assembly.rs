//! Builds the template view for one record under one document-type heading.

use crate::models::{AssembledView, DocumentRecord, RawAmount};
use crate::pricing::{aggregate, format_amount, parse_amount, PricedItem, TaxRate};
use crate::templates::helpers::escape_typst;

/// Author-supplied amounts win over computed ones. Parseable overrides are
/// reformatted; anything else is passed through as written.
fn resolve_amount(supplied: Option<&RawAmount>, computed: &str) -> String {
    match supplied {
        None => computed.to_string(),
        Some(value) => match parse_amount(value) {
            Ok(amount) => format_amount(amount),
            Err(_) => value.to_string(),
        },
    }
}

/// One Typst table row per item, in input order, for templates that splice
/// the item table in instead of iterating `items`.
pub fn render_item_rows(items: &[PricedItem]) -> String {
    items
        .iter()
        .map(|item| {
            let cell = |value: Option<String>| escape_typst(&value.unwrap_or_default());
            format!(
                "  [{}], [{}], [{}], [{}],",
                cell(item.name.clone()),
                cell(item.quantity.as_ref().map(RawAmount::to_string)),
                cell(item.price.as_ref().map(RawAmount::to_string)),
                cell(Some(item.total.clone())),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assemble(record: &DocumentRecord, title: &str) -> AssembledView {
    let aggregation = aggregate(&record.items, TaxRate::from_percent(record.tax_percent));
    let totals = aggregation.totals;

    let supply_price = resolve_amount(record.supply_price.as_ref(), &totals.supply_price);
    let tax_amount = resolve_amount(record.tax_amount.as_ref(), &totals.tax_amount);
    let total_amount = resolve_amount(record.total_amount.as_ref(), &totals.total_amount);

    let supplier = &record.supplier;
    let receiver = &record.receiver;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    AssembledView {
        title: title.to_string(),
        doc_number: text(&record.doc_number),
        date: text(&record.date),
        tax: record.tax_percent,

        subtotal_str: supply_price.clone(),
        tax_amount_str: tax_amount.clone(),
        grand_total_str: total_amount.clone(),

        supply_price,
        tax_amount,
        total_tax_amount: totals.total_tax_amount,
        total_amount,
        total_quantity: totals.total_quantity,

        receiver_name: text(&receiver.name),
        receiver_ceo: text(&receiver.ceo),
        supplier_name: text(&supplier.name),
        supplier_ceo: text(&supplier.ceo),
        supplier_reg_id: text(&supplier.reg_id),
        supplier_address: text(&supplier.address),
        supplier_contact: text(&supplier.contact),
        items_rows: render_item_rows(&aggregation.items),

        receiver: receiver.clone(),
        supplier: supplier.clone(),
        items: aggregation.items,
    }
}
