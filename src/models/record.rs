use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::DocumentResult;

/// An amount or quantity as it appears in source data: an integer, or text
/// that may carry thousands separators ("1,000").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Text(String),
    // Floats, booleans and the like are kept for display but never parse.
    Other(serde_json::Value),
}

impl RawAmount {
    /// Absent-equivalent: empty text or integer zero.
    pub fn is_blank(&self) -> bool {
        match self {
            RawAmount::Integer(n) => *n == 0,
            RawAmount::Text(s) => s.trim().is_empty(),
            RawAmount::Other(v) => v.is_null(),
        }
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Integer(n) => write!(f, "{}", n),
            RawAmount::Text(s) => write!(f, "{}", s),
            RawAmount::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Integer(value)
    }
}

impl From<i32> for RawAmount {
    fn from(value: i32) -> Self {
        RawAmount::Integer(value.into())
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

/// Accepts any JSON scalar for a display field; numbers such as a phone
/// number or a document number come through as their JSON text.
fn text_or_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One line entry as supplied by the record author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "text_or_scalar")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<RawAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<RawAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<RawAmount>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LineItem {
    pub fn new(name: &str, quantity: impl Into<RawAmount>, price: impl Into<RawAmount>) -> Self {
        LineItem {
            name: Some(name.to_string()),
            quantity: Some(quantity.into()),
            price: Some(price.into()),
            ..Default::default()
        }
    }

    pub fn with_total(mut self, total: impl Into<RawAmount>) -> Self {
        self.total = Some(total.into());
        self
    }

    /// A total that still has to be computed from quantity and price.
    pub fn needs_total(&self) -> bool {
        self.total.as_ref().map_or(true, RawAmount::is_blank)
    }
}

fn default_tax_percent() -> i64 {
    10
}

/// Source data for one financial document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub supplier: Supplier,
    #[serde(default)]
    pub receiver: Receiver,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default = "default_tax_percent", rename = "tax")]
    pub tax_percent: i64,
    #[serde(default, deserialize_with = "text_or_scalar")]
    pub doc_number: Option<String>,
    #[serde(default, deserialize_with = "text_or_scalar")]
    pub date: Option<String>,
    pub supply_price: Option<RawAmount>,
    pub tax_amount: Option<RawAmount>,
    pub total_amount: Option<RawAmount>,
}

impl Default for DocumentRecord {
    fn default() -> Self {
        DocumentRecord {
            supplier: Supplier::default(),
            receiver: Receiver::default(),
            items: Vec::new(),
            tax_percent: default_tax_percent(),
            doc_number: None,
            date: None,
            supply_price: None,
            tax_amount: None,
            total_amount: None,
        }
    }
}

impl DocumentRecord {
    pub fn from_json(content: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Every call yields a fresh copy; nothing is shared between loads.
    pub async fn load(path: &Path) -> DocumentResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_integers_and_text() {
        let record = DocumentRecord::from_json(
            r#"{
                "items": [
                    {"name": "A", "quantity": 2, "price": "1,500"},
                    {"name": "B", "quantity": "3", "price": 700, "total": "", "unit": "EA"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(record.tax_percent, 10);
        assert_eq!(record.items[0].quantity, Some(RawAmount::Integer(2)));
        assert_eq!(record.items[0].price, Some(RawAmount::Text("1,500".into())));
        assert!(record.items[1].needs_total());
        assert_eq!(record.items[1].extra.get("unit"), Some(&serde_json::json!("EA")));
    }

    #[test]
    fn floats_are_kept_as_other() {
        let item: LineItem = serde_json::from_str(r#"{"quantity": 1.5}"#).unwrap();
        assert_eq!(item.quantity, Some(RawAmount::Other(serde_json::json!(1.5))));
        assert_eq!(item.quantity.unwrap().to_string(), "1.5");
    }

    #[test]
    fn numeric_display_fields_are_kept_as_text() {
        let record = DocumentRecord::from_json(
            r#"{
                "doc_number": 2024001,
                "date": null,
                "supplier": {"name": "Hanbit", "contact": 1012345678, "reg_id": "123-45-67890"},
                "receiver": {"name": 42},
                "items": [{"name": 7, "quantity": 1, "price": 100}]
            }"#,
        )
        .unwrap();

        assert_eq!(record.doc_number.as_deref(), Some("2024001"));
        assert_eq!(record.date, None);
        assert_eq!(record.supplier.contact.as_deref(), Some("1012345678"));
        assert_eq!(record.supplier.reg_id.as_deref(), Some("123-45-67890"));
        assert_eq!(record.supplier.address, None);
        assert_eq!(record.receiver.name.as_deref(), Some("42"));
        assert_eq!(record.items[0].name.as_deref(), Some("7"));
    }

    #[test]
    fn zero_total_is_recomputed() {
        assert!(LineItem::new("A", 1, 100).with_total(0).needs_total());
        assert!(!LineItem::new("A", 1, 100).with_total("100").needs_total());
    }
}
