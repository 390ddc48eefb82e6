pub mod checkout;
pub mod client;
pub mod collection;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod normalize;
pub mod pagination;
pub(crate) mod rate_limit;
pub mod types;

pub use checkout::{checkout_route, checkout_url, resolve_checkout_url};
pub use client::{CatalogClient, LISTING_PAGE_SIZE};
pub use collection::{categories, featured, filter_products};
pub use error::CatalogError;
pub use frame::{FrameCheck, FrameHeaders, FrameProbe};
pub use metadata::RawMetadata;
pub use normalize::{normalize_product, normalize_products};
pub use types::{OldestProduct, ProductPage};
