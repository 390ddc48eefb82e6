//! Checkout link resolution.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::metadata::{coerce_str, resolve_metadata};

/// Hosted payment page used when a product has no `shareable_link`.
pub const FALLBACK_CHECKOUT_BASE: &str = "https://paystack.com/buy";

/// Path of the in-app checkout page.
pub const CHECKOUT_PATH: &str = "/checkout";

/// URI component encoding: everything but ALPHA, DIGIT and `-_.!~*'()`
/// is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Resolves the payment URL for a product from already-resolved metadata.
#[must_use]
pub fn checkout_url(product_id: &str, metadata: &Map<String, Value>) -> String {
    coerce_str(metadata.get("shareable_link")).map_or_else(
        || {
            format!(
                "{FALLBACK_CHECKOUT_BASE}/{}",
                utf8_percent_encode(product_id, COMPONENT)
            )
        },
        |link| link.trim().to_owned(),
    )
}

/// Resolves the payment URL from raw metadata, which may be a JSON string.
#[must_use]
pub fn resolve_checkout_url(product_id: &str, raw_metadata: Option<&Value>) -> String {
    checkout_url(product_id, &resolve_metadata(raw_metadata))
}

/// The in-app route that frames `target`.
#[must_use]
pub fn checkout_route(target: &str) -> String {
    format!(
        "{CHECKOUT_PATH}?url={}",
        utf8_percent_encode(target, COMPONENT)
    )
}
