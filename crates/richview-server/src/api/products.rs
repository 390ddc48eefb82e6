use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use richview_catalog::{
    categories, featured, filter_products, normalize_product, normalize_products,
    pagination::DEFAULT_OLDEST_COUNT, OldestProduct, LISTING_PAGE_SIZE,
};
use richview_core::Product;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_catalog_error, parse_count, require_catalog, ApiError, ApiResponse, AppState};

/// Page size for views that normalize and reorder a listing.
const COLLECTION_PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// GET /api/products
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct ProductListing {
    products: Vec<Value>,
    total: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct ListingFailure {
    error: &'static str,
}

impl IntoResponse for ListingFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub(super) async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListing>, ListingFailure> {
    let Some(catalog) = state.catalog.as_deref() else {
        tracing::error!("PAYSTACK_SECRET_KEY not configured");
        return Err(ListingFailure {
            error: "Paystack secret key not configured",
        });
    };

    let page = catalog
        .list_products(LISTING_PAGE_SIZE, 1)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch products");
            ListingFailure {
                error: "Failed to fetch products",
            }
        })?;

    let total = page.total().unwrap_or(0);
    Ok(Json(ProductListing {
        products: page.data,
        total,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/products/oldest
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CountQuery {
    pub count: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OldestListing {
    success: bool,
    products: Vec<OldestProduct>,
}

#[derive(Debug, Serialize)]
pub(super) struct OldestFailure {
    success: bool,
    message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl IntoResponse for OldestFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(super) async fn list_oldest_products(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<OldestListing>, OldestFailure> {
    let Some(catalog) = state.catalog.as_deref() else {
        tracing::error!("PAYSTACK_SECRET_KEY not configured");
        return Err(OldestFailure {
            success: false,
            message: "Paystack secret key not configured".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        });
    };
    let count = parse_count(query.count.as_deref(), DEFAULT_OLDEST_COUNT);

    match catalog.fetch_oldest_products(count).await {
        Ok(products) => Ok(Json(OldestListing {
            success: true,
            products,
        })),
        Err(e) => {
            tracing::error!(error = %e, count, "failed to fetch oldest products");
            let status = e
                .upstream_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(OldestFailure {
                success: false,
                message: e.to_string(),
                status,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized views
// ---------------------------------------------------------------------------

async fn load_normalized(state: &AppState, request_id: &str) -> Result<Vec<Product>, ApiError> {
    let catalog = require_catalog(state, request_id)?;
    let page = catalog
        .list_products(COLLECTION_PAGE_SIZE, 1)
        .await
        .map_err(|e| map_catalog_error(request_id.to_owned(), &e))?;
    Ok(normalize_products(&page.data))
}

pub(super) async fn list_featured_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CountQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = load_normalized(&state, &req_id.0).await?;
    let count = parse_count(
        query.count.as_deref(),
        richview_catalog::collection::DEFAULT_FEATURED_COUNT,
    );
    let data = featured(&products, count).into_iter().cloned().collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

#[derive(Debug, Deserialize)]
pub(super) struct CollectionQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionData {
    products: Vec<Product>,
    categories: Vec<String>,
}

pub(super) async fn list_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<ApiResponse<CollectionData>>, ApiError> {
    let products = load_normalized(&state, &req_id.0).await?;
    let filtered = filter_products(
        &products,
        query.q.as_deref().unwrap_or_default(),
        query.category.as_deref(),
    )
    .into_iter()
    .cloned()
    .collect();
    let data = CollectionData {
        products: filtered,
        categories: categories(&products),
    };
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let catalog = require_catalog(&state, &req_id.0)?;
    let raw = catalog
        .fetch_product(&id)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse::new(normalize_product(&raw, 0), req_id.0)))
}
