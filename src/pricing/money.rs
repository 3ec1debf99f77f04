//! Integer amounts rendered with `,` thousands separators ("1,234,000").
//!
//! Amounts carry no fractional part; the same convention is used for every
//! figure handed to templates.

use num_format::{Locale, ToFormattedString as _};

use crate::core::{DocumentError, DocumentResult};
use crate::models::RawAmount;

const GROUP_SEPARATOR: char = ',';

pub fn format_amount(amount: i64) -> String {
    amount.to_formatted_string(&Locale::en)
}

/// Formatted zero, the fallback for anything that fails to parse.
pub fn zero() -> String {
    format_amount(0)
}

/// Parses text that may already carry grouping separators.
pub fn parse_amount_str(value: &str) -> DocumentResult<i64> {
    let stripped: String = value.chars().filter(|c| *c != GROUP_SEPARATOR).collect();
    stripped
        .trim()
        .parse::<i64>()
        .map_err(|_| DocumentError::MalformedAmount(value.to_string()))
}

pub fn parse_amount(value: &RawAmount) -> DocumentResult<i64> {
    match value {
        RawAmount::Integer(n) => Ok(*n),
        RawAmount::Text(s) => parse_amount_str(s),
        RawAmount::Other(v) => Err(DocumentError::MalformedAmount(v.to_string())),
    }
}
