use crate::models::{FieldValue, QuoteRecord};
use chrono::{Local, SecondsFormat};
use rust_decimal::Decimal;

/// Gets the current local time as an ISO-8601 string.
pub fn current_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Normalize a provider field label.
///
/// Keeps the segment after the last `.`, trims it, joins words with `_` and
/// lower-cases the result: `"6. Last Refreshed"` becomes `"last_refreshed"`.
pub fn normalize_key(label: &str) -> String {
    label
        .rsplit('.')
        .next()
        .unwrap_or(label)
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

/// Exponents beyond this cannot produce a value a `Decimal` holds.
const MAX_EXPONENT: i32 = 64;

/// Parse decimal text, accepting plain and scientific notation.
///
/// Parsing is exact: text needing more than 28 significant digits, or a
/// larger scale, yields `None` rather than a rounded value.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    match text.find(['e', 'E']) {
        Some(pos) => {
            let plain = expand_exponent(&text[..pos], &text[pos + 1..])?;
            Decimal::from_str_exact(&plain).ok()
        }
        None => Decimal::from_str_exact(text).ok(),
    }
}

/// Rewrite `mantissa` x 10^`exponent` as plain decimal text, digit for digit.
fn expand_exponent(mantissa: &str, exponent: &str) -> Option<String> {
    let exponent: i32 = exponent.parse().ok()?;
    if exponent.abs() > MAX_EXPONENT {
        return None;
    }

    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let all = format!("{}{}", int_part, frac_part);
    let point = int_part.len() as i32 + exponent;
    let expanded = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), all)
    } else if point as usize >= all.len() {
        format!("{}{}", all, "0".repeat(point as usize - all.len()))
    } else {
        let (whole, fraction) = all.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    };

    Some(format!("{}{}", sign, expanded))
}

/// Parse a raw provider value into a number, or keep it as text.
pub fn parse_field_value(raw: &str) -> FieldValue {
    match parse_decimal(raw) {
        Some(d) => FieldValue::Number(d),
        None => FieldValue::Text(raw.to_string()),
    }
}

/// Normalize every labeled provider field into a quote record.
pub fn normalize_fields<'a, I>(fields: I) -> QuoteRecord
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    fields
        .into_iter()
        .map(|(label, raw)| (normalize_key(label), parse_field_value(raw)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_normalize_key_last_segment() {
        assert_eq!(normalize_key("6. Last Refreshed"), "last_refreshed");
        assert_eq!(normalize_key("1. From_Currency Code"), "from_currency_code");
        assert_eq!(normalize_key("5. Exchange Rate"), "exchange_rate");
    }

    #[test]
    fn test_normalize_key_without_dot() {
        assert_eq!(normalize_key("  Bid Price "), "bid_price");
    }

    #[test]
    fn test_normalize_key_multiple_dots() {
        assert_eq!(normalize_key("a.b. Ask Price"), "ask_price");
    }

    #[test]
    fn test_parse_field_value_numeric() {
        let value = parse_field_value("1.08500000");
        assert_eq!(value.as_decimal().unwrap().to_string(), "1.08500000");

        let value = parse_field_value(" 42 ");
        assert_eq!(value, FieldValue::Number(Decimal::from(42)));

        let value = parse_field_value("-0.25");
        assert_eq!(value.as_decimal().unwrap().to_string(), "-0.25");
    }

    #[test]
    fn test_parse_field_value_text_unchanged() {
        for raw in ["United States Dollar", "UTC", "2024-01-15 10:00:00", "", "nan"] {
            assert_eq!(parse_field_value(raw), FieldValue::Text(raw.to_string()));
        }
    }

    #[test]
    fn test_parse_field_value_too_precise_stays_text() {
        let raw = "0.1234567890123456789012345678901";
        assert_eq!(parse_field_value(raw), FieldValue::Text(raw.to_string()));
    }

    #[test]
    fn test_parse_decimal_scientific_is_exact() {
        assert_eq!(parse_decimal("1.5e-3").unwrap().to_string(), "0.0015");
        assert_eq!(parse_decimal("2.50E2").unwrap().to_string(), "250");
        assert_eq!(parse_decimal("-1e2").unwrap().to_string(), "-100");
        assert_eq!(parse_decimal("1.25e1").unwrap().to_string(), "12.5");
    }

    #[test]
    fn test_parse_decimal_scientific_out_of_range() {
        assert!(parse_decimal("1e-40").is_none());
        assert!(parse_decimal("1e40").is_none());
        assert!(parse_decimal("1.2345678901234567890123456789012e3").is_none());
        assert!(parse_decimal("e5").is_none());
    }

    #[test]
    fn test_normalize_fields() {
        let mut raw = BTreeMap::new();
        raw.insert("3. To_Currency Code".to_string(), "EUR".to_string());
        raw.insert("5. Exchange Rate".to_string(), "0.91500000".to_string());

        let record = normalize_fields(&raw);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("to_currency_code"), Some(&FieldValue::from("EUR")));
        assert_eq!(
            record.get("exchange_rate").and_then(FieldValue::as_decimal).map(|d| d.to_string()),
            Some("0.91500000".to_string())
        );
    }

    #[test]
    fn test_current_timestamp_is_iso8601() {
        let ts = current_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
