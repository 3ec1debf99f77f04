use chrono::NaiveDate;
use minijinja::value::ValueKind;
use minijinja::{Environment, Value};

use crate::pricing::{format_amount, parse_amount_str};

const DEFAULT_DATE_FORMAT: &str = "%Y년 %m월 %d일";

/// Registers the filters every template may use.
pub fn register(env: &mut Environment<'_>) {
    env.add_filter("money", money_filter);
    env.add_filter("escape_typst", escape_typst_filter);
    env.add_filter("format_date", date_filter);
}

/// Escapes characters that Typst would read as markup.
pub fn escape_typst(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '#' | '$' | '@' | '*' | '_' | '[' | ']' | '<' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// Filters

/// Formats integers with thousands separators. Text that parses as an amount
/// is reformatted; other text and fractional numbers pass through untouched.
pub fn money_filter(value: Value) -> Result<Value, minijinja::Error> {
    if let Some(text) = value.as_str() {
        return Ok(match parse_amount_str(text) {
            Ok(amount) => Value::from(format_amount(amount)),
            Err(_) => value,
        });
    }

    if value.kind() != ValueKind::Number {
        return Err(minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            "Value must be an amount",
        ));
    }

    // Fractional numbers are not amounts; show them as written.
    match i64::try_from(value.clone()) {
        Ok(amount) => Ok(Value::from(format_amount(amount))),
        Err(_) => Ok(value),
    }
}

pub fn escape_typst_filter(value: Value) -> Result<Value, minijinja::Error> {
    if let Some(s) = value.as_str() {
        Ok(Value::from(escape_typst(s)))
    } else {
        Ok(value)
    }
}

/// ISO dates (`2024-03-01`) are reformatted; anything else comes back as is.
pub fn date_filter(value: Value, format: Option<Value>) -> Result<Value, minijinja::Error> {
    let format_str = format
        .as_ref()
        .and_then(|f| f.as_str())
        .unwrap_or(DEFAULT_DATE_FORMAT);

    match value.as_str() {
        Some(date_str) => Ok(Value::from(format_date_string(date_str, format_str))),
        None => Ok(value),
    }
}

pub fn format_date_string(date_str: &str, format: &str) -> String {
    match NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        Ok(date) => date.format(format).to_string(),
        Err(_) => date_str.to_string(),
    }
}
