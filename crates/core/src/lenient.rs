//! Lenient field access over loosely-shaped backend JSON.
//!
//! Backend records are only partially populated and occasionally mistyped
//! (numbers where strings are expected, `"true"` for booleans, full
//! timestamps in date fields). Every accessor here returns a usable default
//! instead of failing, so one bad field never prevents a record from loading.

use serde_json::Value;
use time::macros::format_description;
use time::Date;

static NULL: Value = Value::Null;

/// The value under `key`, or `null` when absent or when `value` is not an object.
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Walk a path of object keys.
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter().fold(value, |v, key| field(v, key))
}

/// String value of `key`. Numbers are rendered; anything else is empty.
pub fn text(value: &Value, key: &str) -> String {
    as_text(field(value, key))
}

pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Non-empty string value of `key`.
pub fn opt_text(value: &Value, key: &str) -> Option<String> {
    Some(text(value, key)).filter(|s| !s.is_empty())
}

/// Boolean value of `key`. Accepts `true`, `"true"`, `"yes"`, `"y"`, `"1"`
/// and non-zero numbers.
pub fn flag(value: &Value, key: &str) -> bool {
    match field(value, key) {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// ISO `YYYY-MM-DD` date of `key`. Timestamps keep their date part; values
/// that are not a valid calendar date become empty.
pub fn iso_date(value: &Value, key: &str) -> String {
    let raw = text(value, key);
    let day = raw.split('T').next().unwrap_or("").trim();
    if Date::parse(day, format_description!("[year]-[month]-[day]")).is_ok() {
        day.to_string()
    } else {
        String::new()
    }
}

/// Array elements of `key`, empty when absent or not an array.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    field(value, key).as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Unwrap a `{ "data": ... }` envelope. Bodies without a `data` key are the
/// payload themselves.
pub fn unwrap_data(body: &Value) -> &Value {
    match body {
        Value::Object(map) if map.contains_key("data") => field(body, "data"),
        other => other,
    }
}

/// Whether a payload carries nothing: `null`, `{}`, `[]` or `""`.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_accepts_numbers_and_defaults_everything_else() {
        let v = json!({"dwt": 105000, "name": "Nordic Star", "flag": null, "loa": true});
        assert_eq!(text(&v, "dwt"), "105000");
        assert_eq!(text(&v, "name"), "Nordic Star");
        assert_eq!(text(&v, "flag"), "");
        assert_eq!(text(&v, "loa"), "");
        assert_eq!(text(&v, "missing"), "");
        assert_eq!(text(&json!("not an object"), "x"), "");
    }

    #[test]
    fn flag_accepts_common_truthy_spellings() {
        let v = json!({"a": true, "b": "Yes", "c": 1, "d": "no", "e": 0, "f": null});
        assert!(flag(&v, "a"));
        assert!(flag(&v, "b"));
        assert!(flag(&v, "c"));
        assert!(!flag(&v, "d"));
        assert!(!flag(&v, "e"));
        assert!(!flag(&v, "f"));
    }

    #[test]
    fn iso_date_keeps_date_part_only() {
        let v = json!({
            "ts": "2025-03-14T08:30:00.000Z",
            "day": "2025-03-14",
            "bad": "14/03/2025",
            "impossible": "2025-02-30"
        });
        assert_eq!(iso_date(&v, "ts"), "2025-03-14");
        assert_eq!(iso_date(&v, "day"), "2025-03-14");
        assert_eq!(iso_date(&v, "bad"), "");
        assert_eq!(iso_date(&v, "impossible"), "");
    }

    #[test]
    fn path_walks_nested_objects() {
        let v = json!({"vessels": {"constantHeading": {"shipName": "Aurora"}}});
        assert_eq!(
            as_text(path(&v, &["vessels", "constantHeading", "shipName"])),
            "Aurora"
        );
        assert!(path(&v, &["vessels", "manoeuvring", "shipName"]).is_null());
    }

    #[test]
    fn unwrap_data_envelope() {
        let wrapped = json!({"success": true, "data": {"operationRef": "OP1"}});
        assert_eq!(unwrap_data(&wrapped), &json!({"operationRef": "OP1"}));
        let bare = json!({"operationRef": "OP1"});
        assert_eq!(unwrap_data(&bare), &bare);
        let null_data = json!({"data": null});
        assert!(is_empty_payload(unwrap_data(&null_data)));
    }

    #[test]
    fn empty_payload_detection() {
        assert!(is_empty_payload(&json!(null)));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(is_empty_payload(&json!("  ")));
        assert!(!is_empty_payload(&json!({"a": 1})));
        assert!(!is_empty_payload(&json!(false)));
    }
}
