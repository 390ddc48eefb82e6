//! Catalog provider response shapes.
//!
//! The listing endpoint normally answers `{status, message, data: [...],
//! meta: {...}}`, but bare arrays have been seen from proxies and older
//! deployments. Records inside `data` stay untyped; see [`crate::metadata`]
//! and [`crate::normalize`] for how they are read.

use serde::Serialize;
use serde_json::Value;

/// One page of the product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub data: Vec<Value>,
    pub meta: Option<Value>,
}

impl ProductPage {
    /// Builds a page from a decoded listing body. Unknown shapes yield an
    /// empty page.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Array(data) => Self { data, meta: None },
            Value::Object(mut envelope) => {
                let data = match envelope.remove("data") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let meta = envelope
                    .remove("meta")
                    .filter(|m| !m.is_null())
                    .or_else(|| envelope.remove("pagination").filter(|m| !m.is_null()));
                Self { data, meta }
            }
            _ => Self::default(),
        }
    }

    /// Total record count reported by the page's metadata, if any.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.meta.as_ref().and_then(crate::pagination::read_total)
    }
}

/// Listing record projected for the oldest-products view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OldestProduct {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub currency: String,
    pub image: Option<String>,
    pub metadata: Value,
    pub created_at: Option<Value>,
}
