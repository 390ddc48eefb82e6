use serde::{Deserialize, Serialize};

/// Image shown when a product resolves to no image candidate at all.
pub const PLACEHOLDER_IMAGE: &str = "/fallback-product.jpg";

/// A catalog record coalesced into the flat display model the storefront
/// renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Provider product ID, rendered as a string.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in currency subunits (e.g. kobo for NGN).
    pub price: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// First image candidate found on the record, if any.
    pub image: Option<String>,
    pub badge: String,
    pub rating: f64,
    pub category: String,
    /// `metadata.position`, used to order featured listings.
    pub position: Option<f64>,
    /// Resolved metadata object. Always an object, empty when the raw
    /// metadata was absent or malformed.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Returns the image to display, substituting the placeholder when the
    /// record carried none.
    #[must_use]
    pub fn display_image(&self) -> &str {
        self.image.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Price formatted as a currency string in the product's own currency.
    #[must_use]
    pub fn formatted_price(&self) -> String {
        crate::currency::format_subunits(self.price, &self.currency)
    }
}
