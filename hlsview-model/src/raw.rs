//! Lenient accessors over loosely-typed configuration documents.
//!
//! Every accessor answers `None` for absent keys, `null`, non-object parents
//! and values of the wrong JSON type. Callers pick the default.

use serde_json::Value;

pub(crate) fn field<'a>(raw: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    raw.and_then(|value| value.get(key))
        .filter(|value| !value.is_null())
}

pub(crate) fn string(raw: Option<&Value>, key: &str) -> Option<String> {
    let value = field(raw, key)?;
    match value.as_str() {
        Some(text) => Some(text.to_owned()),
        None => {
            mistyped(key, "string", value);
            None
        }
    }
}

pub(crate) fn boolean(raw: Option<&Value>, key: &str) -> Option<bool> {
    let value = field(raw, key)?;
    match value.as_bool() {
        Some(flag) => Some(flag),
        None => {
            mistyped(key, "boolean", value);
            None
        }
    }
}

pub(crate) fn number(raw: Option<&Value>, key: &str) -> Option<f64> {
    let value = field(raw, key)?;
    match value.as_f64().filter(|number| number.is_finite()) {
        Some(number) => Some(number),
        None => {
            mistyped(key, "number", value);
            None
        }
    }
}

/// Positive integral dimension; zero and negatives count as unusable.
pub(crate) fn dimension(raw: Option<&Value>, key: &str) -> Option<u32> {
    let number = number(raw, key)?;
    if number < 1.0 || number > f64::from(u32::MAX) {
        tracing::warn!(
            field = key,
            value = number,
            "dimension must be a positive integer, using default"
        );
        return None;
    }
    Some(number.round() as u32)
}

fn mistyped(key: &str, expected: &str, value: &Value) {
    tracing::warn!(
        field = key,
        expected,
        value = %value,
        "ignoring configuration field of unexpected type"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_missing_are_absent() {
        let raw = json!({ "id": null });
        assert_eq!(string(Some(&raw), "id"), None);
        assert_eq!(string(Some(&raw), "missing"), None);
        assert_eq!(string(None, "id"), None);
    }

    #[test]
    fn wrong_types_are_absent() {
        let raw = json!({ "autoplay": "yes", "width": "720", "id": 7 });
        assert_eq!(boolean(Some(&raw), "autoplay"), None);
        assert_eq!(dimension(Some(&raw), "width"), None);
        assert_eq!(string(Some(&raw), "id"), None);
    }

    #[test]
    fn non_object_parent_is_absent() {
        let raw = json!([1, 2, 3]);
        assert_eq!(number(Some(&raw), "width"), None);
    }

    #[test]
    fn dimensions_must_be_positive() {
        let raw = json!({ "zero": 0, "negative": -4, "ok": 640, "frac": 480.4 });
        assert_eq!(dimension(Some(&raw), "zero"), None);
        assert_eq!(dimension(Some(&raw), "negative"), None);
        assert_eq!(dimension(Some(&raw), "ok"), Some(640));
        assert_eq!(dimension(Some(&raw), "frac"), Some(480));
    }
}
