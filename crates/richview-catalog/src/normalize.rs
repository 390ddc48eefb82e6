//! Normalization from raw provider records to [`richview_core::Product`].
//!
//! Provider records are untrusted JSON. Normalization never fails: type
//! mismatches are treated as missing fields and missing fields get
//! placeholders.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use richview_core::Product;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::metadata::{
    coerce_f64, coerce_file_entry, coerce_id, coerce_image_entry, coerce_price, coerce_str,
    resolve_metadata,
};

pub const DEFAULT_CURRENCY: &str = "NGN";
pub const DEFAULT_DESCRIPTION: &str = "Premium quality fashion item";
pub const DEFAULT_CATEGORY: &str = "Fashion";

/// Badges handed out to records that carry none.
pub const PLACEHOLDER_BADGES: [&str; 5] =
    ["New Arrival", "Bestseller", "Limited Edition", "Trending", "Sale"];

/// Metadata keys checked after the standard image fields, in order.
const ALTERNATE_IMAGE_FIELDS: [&str; 5] = ["photo", "picture", "img", "thumbnail", "product_image"];

/// Placeholder price range in subunits, upper bound exclusive.
const PLACEHOLDER_PRICE_MIN: i64 = 5_000;
const PLACEHOLDER_PRICE_MAX: i64 = 55_000;

/// Display placeholders for a record, derived from its id so that the same
/// record always normalizes the same way.
struct Placeholders {
    price: i64,
    badge: &'static str,
    rating: f64,
}

impl Placeholders {
    fn for_id(id: &str) -> Self {
        let mut rng = seeded_rng(id);
        let price = rng.random_range(PLACEHOLDER_PRICE_MIN..PLACEHOLDER_PRICE_MAX);
        let badge = PLACEHOLDER_BADGES[rng.random_range(0..PLACEHOLDER_BADGES.len())];
        let rating = f64::from(rng.random_range(40u8..=50)) / 10.0;
        Self {
            price,
            badge,
            rating,
        }
    }
}

fn seeded_rng(key: &str) -> StdRng {
    let digest = Sha256::digest(key.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    StdRng::from_seed(seed)
}

/// Returns the first image candidate on a record, scanning the product
/// before its metadata.
///
/// Order: `files[].path`, `images[]`, `image` on the product, the same three
/// on the metadata, then the alternate metadata keys.
#[must_use]
pub fn extract_image(product: &Map<String, Value>, metadata: &Map<String, Value>) -> Option<String> {
    image_from_record(product)
        .or_else(|| image_from_record(metadata))
        .or_else(|| {
            ALTERNATE_IMAGE_FIELDS
                .iter()
                .find_map(|field| coerce_str(metadata.get(*field)))
        })
        .map(str::to_owned)
}

fn image_from_record(record: &Map<String, Value>) -> Option<&str> {
    first_in_list(record.get("files"), coerce_file_entry)
        .or_else(|| first_in_list(record.get("images"), coerce_image_entry))
        .or_else(|| coerce_str(record.get("image")))
}

fn first_in_list<'a>(
    list: Option<&'a Value>,
    coerce: fn(&'a Value) -> Option<&'a str>,
) -> Option<&'a str> {
    list?.as_array()?.iter().find_map(coerce)
}

/// Normalizes one raw record. `index` is its position in the listing and
/// feeds the fallback id and name.
#[must_use]
pub fn normalize_product(raw: &Value, index: usize) -> Product {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);
    let metadata = resolve_metadata(record.get("metadata"));

    let id = coerce_id(record.get("id")).unwrap_or_else(|| format!("product_{index}"));
    let placeholders = Placeholders::for_id(&id);

    let name = coerce_str(record.get("name"))
        .or_else(|| coerce_str(record.get("title")))
        .map_or_else(|| format!("Product {}", index + 1), str::to_owned);
    let description = coerce_str(record.get("description"))
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_owned();
    let price = coerce_price(record.get("price")).unwrap_or(placeholders.price);
    let currency = coerce_str(record.get("currency"))
        .unwrap_or(DEFAULT_CURRENCY)
        .to_owned();
    let image = extract_image(record, &metadata);
    let badge = coerce_str(metadata.get("badge"))
        .or_else(|| coerce_str(record.get("badge")))
        .unwrap_or(placeholders.badge)
        .to_owned();
    let rating = coerce_f64(metadata.get("rating")).unwrap_or(placeholders.rating);
    let category = coerce_str(metadata.get("category"))
        .or_else(|| coerce_str(record.get("category")))
        .unwrap_or(DEFAULT_CATEGORY)
        .to_owned();
    let position = coerce_f64(metadata.get("position"));

    Product {
        id,
        name,
        description,
        price,
        currency,
        image,
        badge,
        rating,
        category,
        position,
        metadata,
    }
}

/// Normalizes a listing, preserving order.
#[must_use]
pub fn normalize_products(raws: &[Value]) -> Vec<Product> {
    raws.iter()
        .enumerate()
        .map(|(index, raw)| normalize_product(raw, index))
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
