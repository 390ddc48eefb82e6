//! Defensive reading of provider product metadata.
//!
//! The provider stores `metadata` either as a JSON object or as a string of
//! encoded JSON (sometimes encoded twice). Every shape other than an object
//! resolves to an empty map. Field lookups go through the `coerce_*`
//! functions, which treat any type mismatch as "absent".

use serde_json::{Map, Value};

/// Encoding depth accepted for string metadata. `"{\"a\":1}"` is depth 1, the
/// same payload wrapped in another JSON string is depth 2.
const MAX_ENCODING_DEPTH: usize = 2;

/// The shapes raw metadata arrives in.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMetadata {
    Encoded(String),
    Object(Map<String, Value>),
    Other,
}

impl RawMetadata {
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::Encoded(s.clone()),
            Some(Value::Object(map)) => Self::Object(map.clone()),
            _ => Self::Other,
        }
    }

    /// Resolves to a metadata object, or an empty map when the payload is
    /// not (or does not decode to) a JSON object.
    #[must_use]
    pub fn resolve(self) -> Map<String, Value> {
        match self {
            Self::Object(map) => map,
            Self::Encoded(encoded) => decode(&encoded, MAX_ENCODING_DEPTH).unwrap_or_default(),
            Self::Other => Map::new(),
        }
    }
}

fn decode(encoded: &str, depth: usize) -> Option<Map<String, Value>> {
    if depth == 0 || encoded.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(encoded) {
        Ok(Value::Object(map)) => Some(map),
        Ok(Value::String(inner)) => decode(&inner, depth - 1),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "product metadata is not valid JSON; treating as empty");
            None
        }
    }
}

/// Resolves a raw `metadata` field in one step.
#[must_use]
pub fn resolve_metadata(value: Option<&Value>) -> Map<String, Value> {
    RawMetadata::from_value(value).resolve()
}

/// A non-blank string value.
#[must_use]
pub fn coerce_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// An `images[]` entry: a non-blank string, or an object with a non-blank
/// `url` (preferred) or `path`.
#[must_use]
pub fn coerce_image_entry(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
        Value::Object(entry) => coerce_str(entry.get("url")).or_else(|| coerce_str(entry.get("path"))),
        _ => None,
    }
}

/// A `files[]` entry: an object with a non-blank `path`.
#[must_use]
pub fn coerce_file_entry(value: &Value) -> Option<&str> {
    match value {
        Value::Object(entry) => coerce_str(entry.get("path")),
        _ => None,
    }
}

/// A price in subunits. Numbers and numeric strings are accepted and rounded
/// to the nearest integer.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_price(value: Option<&Value>) -> Option<i64> {
    let amount = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !amount.is_finite() {
        return None;
    }
    Some(amount.round() as i64)
}

/// A JSON number.
#[must_use]
pub fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// A product id: strings as-is, numbers rendered in their JSON form.
#[must_use]
pub fn coerce_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_metadata_passes_through() {
        let meta = resolve_metadata(Some(&json!({"badge": "Sale"})));
        assert_eq!(meta.get("badge"), Some(&json!("Sale")));
    }

    #[test]
    fn encoded_metadata_is_parsed() {
        let meta = resolve_metadata(Some(&json!("{\"image\":\"http://x/a.jpg\"}")));
        assert_eq!(meta.get("image"), Some(&json!("http://x/a.jpg")));
    }

    #[test]
    fn double_encoded_metadata_is_parsed() {
        let once = serde_json::to_string(&json!({"category": "Shoes"})).unwrap();
        let twice = serde_json::to_string(&once).unwrap();
        let meta = resolve_metadata(Some(&Value::String(twice)));
        assert_eq!(meta.get("category"), Some(&json!("Shoes")));
    }

    #[test]
    fn malformed_and_non_object_metadata_resolve_empty() {
        assert!(resolve_metadata(Some(&json!("{not json"))).is_empty());
        assert!(resolve_metadata(Some(&json!("[1,2]"))).is_empty());
        assert!(resolve_metadata(Some(&json!("42"))).is_empty());
        assert!(resolve_metadata(Some(&json!(""))).is_empty());
        assert!(resolve_metadata(Some(&Value::Null)).is_empty());
        assert!(resolve_metadata(Some(&json!([{"a": 1}]))).is_empty());
        assert!(resolve_metadata(None).is_empty());
    }

    #[test]
    fn coerce_str_skips_blank_and_non_strings() {
        assert_eq!(coerce_str(Some(&json!("a.jpg"))), Some("a.jpg"));
        assert_eq!(coerce_str(Some(&json!("   "))), None);
        assert_eq!(coerce_str(Some(&json!(3))), None);
        assert_eq!(coerce_str(None), None);
    }

    #[test]
    fn image_entry_prefers_url_over_path() {
        assert_eq!(
            coerce_image_entry(&json!({"url": "u.jpg", "path": "p.jpg"})),
            Some("u.jpg")
        );
        assert_eq!(coerce_image_entry(&json!({"path": "p.jpg"})), Some("p.jpg"));
        assert_eq!(coerce_image_entry(&json!("s.jpg")), Some("s.jpg"));
        assert_eq!(coerce_image_entry(&json!({"url": ""})), None);
    }

    #[test]
    fn file_entry_requires_path() {
        assert_eq!(coerce_file_entry(&json!({"path": "f.jpg"})), Some("f.jpg"));
        assert_eq!(coerce_file_entry(&json!({"url": "f.jpg"})), None);
        assert_eq!(coerce_file_entry(&json!("f.jpg")), None);
    }

    #[test]
    fn price_coercion() {
        assert_eq!(coerce_price(Some(&json!(2500))), Some(2500));
        assert_eq!(coerce_price(Some(&json!(2500.6))), Some(2501));
        assert_eq!(coerce_price(Some(&json!(" 2500 "))), Some(2500));
        assert_eq!(coerce_price(Some(&json!("12.4"))), Some(12));
        assert_eq!(coerce_price(Some(&json!("abc"))), None);
        assert_eq!(coerce_price(Some(&json!(""))), None);
        assert_eq!(coerce_price(Some(&json!(null))), None);
        assert_eq!(coerce_price(None), None);
    }

    #[test]
    fn id_coercion() {
        assert_eq!(coerce_id(Some(&json!(1))), Some("1".to_owned()));
        assert_eq!(coerce_id(Some(&json!("PROD_x"))), Some("PROD_x".to_owned()));
        assert_eq!(coerce_id(Some(&json!(""))), None);
        assert_eq!(coerce_id(Some(&json!({"id": 1}))), None);
    }
}
