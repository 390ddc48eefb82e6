use serde_json::Value;

use super::CatalogClient;
use crate::error::CatalogError;
use crate::pagination::{
    last_page, select_oldest, FALLBACK_PAGE_SIZE, MAX_PAGES, OLDEST_PAGE_SIZE,
};
use crate::types::OldestProduct;

impl CatalogClient {
    /// Returns the `count` oldest products (at least one).
    ///
    /// Probes page 1 for a total. With a known total, walks pages backward
    /// from the last one until enough records are collected, reusing the
    /// probe for page 1. Without one, fetches a single larger page.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::PaginationLimit`] if the walk would exceed
    ///   [`MAX_PAGES`] requests.
    /// - Any error from [`CatalogClient::list_products`].
    pub async fn fetch_oldest_products(
        &self,
        count: usize,
    ) -> Result<Vec<OldestProduct>, CatalogError> {
        let count = count.max(1);
        let probe = self.list_products(OLDEST_PAGE_SIZE, 1).await?;

        let records = match probe.total().filter(|t| *t > 0) {
            Some(total) => self.walk_backward(total, count, probe.data).await?,
            None => {
                tracing::debug!("listing reported no total; fetching a single unordered page");
                let per_page = u32::try_from(count)
                    .unwrap_or(u32::MAX)
                    .max(FALLBACK_PAGE_SIZE);
                self.list_products(per_page, 1).await?.data
            }
        };

        Ok(select_oldest(&records, count))
    }

    async fn walk_backward(
        &self,
        total: u64,
        count: usize,
        first_page: Vec<Value>,
    ) -> Result<Vec<Value>, CatalogError> {
        let mut first_page = Some(first_page);
        let mut pages: Vec<Vec<Value>> = Vec::new();
        let mut collected = 0usize;
        let mut page = last_page(total, OLDEST_PAGE_SIZE);

        tracing::debug!(total, last_page = page, count, "walking listing backward");

        while page >= 1 && collected < count {
            if pages.len() >= MAX_PAGES {
                return Err(CatalogError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }
            let data = match (page, first_page.take()) {
                (1, Some(data)) => data,
                (_, probe) => {
                    first_page = probe;
                    self.list_products(OLDEST_PAGE_SIZE, page).await?.data
                }
            };
            collected += data.len();
            pages.push(data);
            page -= 1;
        }

        // Pages were visited newest-last-page first; restore listing order.
        Ok(pages.into_iter().rev().flatten().collect())
    }
}
