//! Helpers for the oldest-products walk.
//!
//! The provider lists newest first and reports its total in page metadata
//! under one of several keys. The walk itself lives on
//! [`crate::CatalogClient::fetch_oldest_products`]; this module holds the
//! pure parts.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::metadata::{coerce_id, coerce_image_entry, coerce_price, coerce_str, resolve_metadata};
use crate::normalize::DEFAULT_CURRENCY;
use crate::types::OldestProduct;

/// Page size used when walking backward from the last page.
pub const OLDEST_PAGE_SIZE: u32 = 50;

/// Page size for the single unordered fetch used when no total is known.
pub const FALLBACK_PAGE_SIZE: u32 = 100;

/// Maximum number of pages the backward walk may request.
pub const MAX_PAGES: usize = 200;

pub const DEFAULT_OLDEST_COUNT: usize = 3;

/// Reads a record total from listing metadata.
///
/// Checks `total`, `total_count` and `count` at the top level, then the same
/// first two keys under a nested `pagination` object. Non-negative numbers and
/// numeric strings are accepted.
#[must_use]
pub fn read_total(meta: &Value) -> Option<u64> {
    let meta = meta.as_object()?;
    ["total", "total_count", "count"]
        .iter()
        .find_map(|key| meta.get(*key).and_then(as_count))
        .or_else(|| {
            let nested = meta.get("pagination")?.as_object()?;
            ["total", "total_count"]
                .iter()
                .find_map(|key| nested.get(*key).and_then(as_count))
        })
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            float_to_count(f)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_count))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.floor() as u64)
}

/// Last page number for `total` records at `per_page` records per page.
#[must_use]
pub fn last_page(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page.max(1))).max(1)
}

/// Projects a listing record to the oldest-products shape.
#[must_use]
pub fn project_oldest(raw: &Value) -> OldestProduct {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);
    let metadata = resolve_metadata(record.get("metadata"));

    let created_at = ["createdAt", "created_at"]
        .iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
        .cloned();

    OldestProduct {
        id: coerce_id(record.get("id")),
        name: coerce_str(record.get("name")).map(str::to_owned),
        description: coerce_str(record.get("description")).map(str::to_owned),
        price: coerce_price(record.get("price")),
        currency: coerce_str(record.get("currency"))
            .unwrap_or(DEFAULT_CURRENCY)
            .to_owned(),
        image: extract_oldest_image(record, &metadata),
        metadata: record.get("metadata").cloned().unwrap_or(Value::Null),
        created_at,
    }
}

/// Image for the oldest-products view. Metadata wins over the record:
/// `metadata.image`, the first `metadata.images` entry, the first
/// `metadata.files` entry (`url` or `path`), then the record's own `image`
/// and first `images` entry. Only the first element of each list is looked at.
#[must_use]
pub fn extract_oldest_image(
    record: &Map<String, Value>,
    metadata: &Map<String, Value>,
) -> Option<String> {
    coerce_str(metadata.get("image"))
        .or_else(|| first_entry(metadata.get("images")).and_then(coerce_image_entry))
        .or_else(|| first_entry(metadata.get("files")).and_then(file_url_or_path))
        .or_else(|| coerce_str(record.get("image")))
        .or_else(|| first_entry(record.get("images")).and_then(coerce_image_entry))
        .map(str::to_owned)
}

fn first_entry(list: Option<&Value>) -> Option<&Value> {
    list?.as_array()?.first()
}

fn file_url_or_path(entry: &Value) -> Option<&str> {
    let entry = entry.as_object()?;
    coerce_str(entry.get("url")).or_else(|| coerce_str(entry.get("path")))
}

/// Parses a creation timestamp: RFC 3339 strings or epoch milliseconds.
fn parse_created_at(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        _ => None,
    }
}

/// Picks the `count` oldest records from a collected listing.
///
/// Records are de-duplicated by id (first occurrence kept). When any record
/// carries a creation timestamp, records without one are dropped and the
/// rest sorted ascending; unparsable timestamps sort last. Otherwise the
/// collected order is kept.
#[must_use]
pub fn select_oldest(records: &[Value], count: usize) -> Vec<OldestProduct> {
    let mut seen = HashSet::new();
    let mut projected: Vec<OldestProduct> = records
        .iter()
        .map(project_oldest)
        .filter(|p| match &p.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect();

    if projected.iter().any(|p| p.created_at.is_some()) {
        projected.retain(|p| p.created_at.is_some());
        // `None` sorts before `Some`, so key on "unparsable" first.
        projected.sort_by_cached_key(|p| {
            let parsed = p.created_at.as_ref().and_then(parse_created_at);
            (parsed.is_none(), parsed)
        });
    }

    projected.truncate(count.max(1));
    projected
}
