//! Persisted shopping cart.
//!
//! [`CartStore`] is an explicit reducer over an ordered list of
//! [`CartItem`]s with a defined persistence boundary: state is loaded from a
//! [`CartStorage`] once at construction and written back after every
//! mutation. Mutations never fail; storage write errors are logged and the
//! in-memory state stays authoritative for the rest of the session.

mod storage;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage};

/// Fixed storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart_v1";

const DEFAULT_CURRENCY: &str = "NGN";

#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One line in the cart. `quantity` is always at least 1 while the item is
/// in a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Unit price in currency subunits.
    pub price: i64,
    pub image_url: Option<String>,
    pub quantity: u32,
}

/// The fields a caller supplies when adding an item; quantity is passed
/// separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub image_url: Option<String>,
}

pub struct CartStore<S: CartStorage> {
    items: Vec<CartItem>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Builds a store from whatever the storage currently holds.
    ///
    /// Unreadable or malformed content yields an empty cart. Entries with a
    /// non-positive quantity are dropped and duplicate ids are merged.
    pub fn load(storage: S) -> Self {
        let items = match storage.read() {
            Ok(Some(raw)) => parse_stored_items(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted cart; starting empty");
                Vec::new()
            }
        };
        Self { items, storage }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Adds `quantity` of `item`. An existing line with the same id has its
    /// quantity increased and keeps its original name, price and image.
    /// Adding zero is a no-op.
    pub fn add_item(&mut self, item: NewCartItem, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                id: item.id,
                name: item.name,
                price: item.price,
                image_url: item.image_url,
                quantity,
            });
        }
        self.persist();
    }

    /// Removes `quantity` units of `id`; the line disappears once its
    /// quantity reaches zero.
    pub fn remove_item(&mut self, id: &str, quantity: u32) {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            return;
        };

        let remaining = self.items[pos].quantity.saturating_sub(quantity);
        if remaining == 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = remaining;
        }
        self.persist();
    }

    /// Removes the line for `id` regardless of its quantity.
    pub fn remove_all(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Sets the exact quantity for `id`. Zero or below removes the line;
    /// unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_all(id);
            return;
        }

        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return;
        };
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Total of `price * quantity` over all lines, in subunits.
    #[must_use]
    pub fn get_total(&self) -> i64 {
        self.items.iter().fold(0i64, |acc, item| {
            acc.saturating_add(item.price.saturating_mul(i64::from(item.quantity)))
        })
    }

    /// [`Self::get_total`] as a currency string; `None` means NGN.
    #[must_use]
    pub fn get_total_formatted(&self, currency: Option<&str>) -> String {
        crate::currency::format_subunits(self.get_total(), currency.unwrap_or(DEFAULT_CURRENCY))
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.items) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart; change not persisted");
                return;
            }
        };
        if let Err(e) = self.storage.write(&serialized) {
            tracing::warn!(error = %e, "failed to persist cart; change kept in memory only");
        }
    }
}

/// Reads persisted state one entry at a time. Older writers stored numeric
/// ids and an `image` field next to or instead of `imageUrl`; an entry that
/// cannot be read is skipped without affecting the rest.
fn parse_stored_items(raw: &str) -> Vec<CartItem> {
    let stored: Vec<Value> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "persisted cart is malformed; starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(stored.len());
    for (index, entry) in stored.iter().enumerate() {
        let Some(item) = read_stored_item(entry) else {
            tracing::debug!(index, "skipping unreadable persisted cart entry");
            continue;
        };

        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            continue;
        }
        items.push(item);
    }
    items
}

fn read_stored_item(entry: &Value) -> Option<CartItem> {
    let fields = entry.as_object()?;
    let id = fields.get("id").and_then(value_as_id)?;
    let quantity = fields.get("quantity").and_then(value_as_i64).unwrap_or(0);
    if quantity <= 0 {
        return None;
    }

    let image_url = ["imageUrl", "image"].iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    });

    Some(CartItem {
        id,
        name: fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        price: fields.get("price").and_then(value_as_i64).unwrap_or(0),
        image_url,
        quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
    })
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../cart_test.rs"]
mod tests;
