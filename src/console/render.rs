//! Default cell formatting.

use chrono::DateTime;
use serde_json::Value;

use super::projection::Projected;

/// Placeholder shown for missing paths and null fields.
const PLACEHOLDER: &str = "—";

/// Default formatting for a projected cell:
///
/// - missing path or null field -> placeholder dash
/// - object with an `email` field -> the email
/// - ISO-8601-looking string -> the date portion
/// - anything else -> string coercion
pub fn default_cell(projected: &Projected<'_>) -> String {
    let value = match projected {
        Projected::Missing | Projected::Null => return PLACEHOLDER.to_string(),
        Projected::Value(value) => value,
    };

    match value {
        Value::Object(map) => match map.get("email").and_then(Value::as_str) {
            Some(email) => email.to_string(),
            None => value.to_string(),
        },
        Value::String(s) => {
            if looks_like_date(s) {
                match DateTime::parse_from_rfc3339(s) {
                    Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
                    Err(_) => s.clone(),
                }
            } else {
                s.clone()
            }
        }
        Value::Null => PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}

/// Column renderer for booleans: "Yes"/"No" instead of "true"/"false".
pub fn yes_no(projected: &Projected<'_>) -> String {
    match projected.value().and_then(Value::as_bool) {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Cheap check for a leading `YYYY-MM-DD` before attempting a real parse.
fn looks_like_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_null_render_dash() {
        assert_eq!(default_cell(&Projected::Missing), "—");
        assert_eq!(default_cell(&Projected::Null), "—");
    }

    #[test]
    fn test_object_with_email_renders_email() {
        let value = json!({"email": "owner@acme.test", "name": "Owner"});
        assert_eq!(default_cell(&Projected::Value(&value)), "owner@acme.test");
    }

    #[test]
    fn test_iso_date_renders_date_portion() {
        let value = json!("2026-07-15T09:30:00Z");
        assert_eq!(default_cell(&Projected::Value(&value)), "2026-07-15");
    }

    #[test]
    fn test_date_like_but_unparseable_string_passes_through() {
        let value = json!("2026-13-99");
        assert_eq!(default_cell(&Projected::Value(&value)), "2026-13-99");
    }

    #[test]
    fn test_plain_values_coerce_to_string() {
        assert_eq!(default_cell(&Projected::Value(&json!("acme"))), "acme");
        assert_eq!(default_cell(&Projected::Value(&json!(42.5))), "42.5");
        assert_eq!(default_cell(&Projected::Value(&json!(true))), "true");
    }

    #[test]
    fn test_yes_no_renderer() {
        assert_eq!(yes_no(&Projected::Value(&json!(true))), "Yes");
        assert_eq!(yes_no(&Projected::Value(&json!(false))), "No");
        assert_eq!(yes_no(&Projected::Missing), "—");
    }
}
