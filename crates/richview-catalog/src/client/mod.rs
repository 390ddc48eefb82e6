//! HTTP client for the catalog provider's product API.

mod oldest;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use richview_core::{AppConfig, Product};
use serde_json::Value;

use crate::error::CatalogError;
use crate::normalize::normalize_products;
use crate::rate_limit::retry_with_backoff;
use crate::types::ProductPage;

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// Page size used by the storefront listing.
pub const LISTING_PAGE_SIZE: u32 = 10;

/// Authenticated client for the provider's `/product` endpoints.
///
/// 429s, transport failures and 5xx responses are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    secret_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Upper bound on any single retry wait; the request timeout.
    max_backoff_secs: u64,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("secret_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client against the default provider base URL.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MissingSecret`] if `secret_key` is blank.
    /// - [`CatalogError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        secret_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            secret_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client against an explicit base URL (used for tests and
    /// provider sandboxes).
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MissingSecret`] if `secret_key` is blank.
    /// - [`CatalogError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`CatalogError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        secret_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        if secret_key.trim().is_empty() {
            return Err(CatalogError::MissingSecret);
        }
        reqwest::Url::parse(base_url).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            secret_key: secret_key.trim().to_owned(),
            max_retries,
            backoff_base_secs,
            max_backoff_secs: timeout_secs,
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_base_url`]; a missing secret yields
    /// [`CatalogError::MissingSecret`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let secret = config
            .paystack_secret_key
            .as_deref()
            .ok_or(CatalogError::MissingSecret)?;
        Self::with_base_url(
            &config.catalog_base_url,
            secret,
            config.catalog_timeout_secs,
            &config.catalog_user_agent,
            config.catalog_max_retries,
            config.catalog_backoff_base_secs,
        )
    }

    /// Fetches one listing page.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RateLimited`] on 429 after retries.
    /// - [`CatalogError::NotFound`] on 404.
    /// - [`CatalogError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`CatalogError::Http`] on transport failure after retries.
    /// - [`CatalogError::Deserialize`] if the body is not JSON.
    pub async fn list_products(&self, per_page: u32, page: u64) -> Result<ProductPage, CatalogError> {
        let url = self.products_url(per_page, page)?;
        let body = self
            .get_json(&url, &format!("product listing page {page}"))
            .await?;
        Ok(ProductPage::from_body(body))
    }

    /// Fetches a single product record, or `None` when the provider answers
    /// 404.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_products`] apart from 404.
    pub async fn fetch_product(&self, id: &str) -> Result<Option<Value>, CatalogError> {
        let url = self.product_url(id)?;
        match self.get_json(&url, &format!("product {id}")).await {
            Ok(body) => Ok(match body {
                Value::Object(mut envelope) if envelope.contains_key("data") => {
                    envelope.remove("data").filter(Value::is_object)
                }
                other @ Value::Object(_) => Some(other),
                _ => None,
            }),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetches and normalizes the first listing page unless `cancelled`
    /// resolves first. A cancelled load yields `Ok(None)` and its result is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_products`].
    pub async fn load_products_until<C>(
        &self,
        per_page: u32,
        cancelled: C,
    ) -> Result<Option<Vec<Product>>, CatalogError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancelled => {
                tracing::debug!("product load cancelled; discarding result");
                Ok(None)
            }
            page = self.list_products(per_page, 1) => {
                page.map(|page| Some(normalize_products(&page.data)))
            }
        }
    }

    async fn get_json(&self, url: &str, context: &str) -> Result<Value, CatalogError> {
        retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs,
            self.max_backoff_secs,
            || async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(&self.secret_key)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(0);
                    return Err(CatalogError::RateLimited { retry_after_secs });
                }
                if status == StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound {
                        url: url.to_owned(),
                    });
                }
                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<Value>(&body).map_err(|e| CatalogError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            },
        )
        .await
    }

    fn products_url(&self, per_page: u32, page: u64) -> Result<String, CatalogError> {
        let mut url = self.endpoint("/product")?;
        url.query_pairs_mut()
            .append_pair("perPage", &per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url.to_string())
    }

    fn product_url(&self, id: &str) -> Result<String, CatalogError> {
        let mut url = self.endpoint("/product")?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: "base URL cannot carry a path".to_owned(),
            })?
            .push(id);
        Ok(url.to_string())
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, CatalogError> {
        reqwest::Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            CatalogError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
