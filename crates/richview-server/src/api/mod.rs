mod checkout;
mod frame;
mod products;
mod stores;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use richview_catalog::{CatalogClient, CatalogError, FrameProbe};
use richview_core::StoreDirectory;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider secret is configured; catalog routes then
    /// answer with an error instead of calling out.
    pub catalog: Option<Arc<CatalogClient>>,
    pub frame_probe: Arc<FrameProbe>,
    pub stores: Arc<StoreDirectory>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Returns the catalog client or the error envelope used when no secret is
/// configured.
pub(super) fn require_catalog(
    state: &AppState,
    request_id: &str,
) -> Result<Arc<CatalogClient>, ApiError> {
    state.catalog.clone().ok_or_else(|| {
        tracing::error!("PAYSTACK_SECRET_KEY not configured");
        ApiError::new(
            request_id,
            "internal_error",
            "catalog secret key is not configured",
        )
    })
}

pub(super) fn map_catalog_error(request_id: String, error: &CatalogError) -> ApiError {
    tracing::error!(error = %error, "catalog request failed");
    match error {
        CatalogError::MissingSecret => ApiError::new(
            request_id,
            "internal_error",
            "catalog secret key is not configured",
        ),
        CatalogError::RateLimited { .. } => ApiError::new(
            request_id,
            "rate_limited",
            "catalog provider is throttling requests",
        ),
        _ => ApiError::new(
            request_id,
            "upstream_error",
            "catalog provider request failed",
        ),
    }
}

/// Parses a lenient `count` query value. Non-numeric input falls back to
/// `default`; the result is at least 1.
pub(super) fn parse_count(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(default, |n| usize::try_from(n).unwrap_or(0))
        .max(1)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/oldest", get(products::list_oldest_products))
        .route(
            "/api/products/featured",
            get(products::list_featured_products),
        )
        .route("/api/products/collection", get(products::list_collection))
        .route("/api/products/{id}", get(products::get_product))
        .route(
            "/api/products/{id}/checkout",
            get(checkout::redirect_to_checkout),
        )
        .route("/api/check-frame", get(frame::check_frame))
        .route("/api/stores", get(stores::list_stores))
        .route("/checkout", get(checkout::checkout_page))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let catalog = if state.catalog.is_some() {
        "configured"
    } else {
        "unconfigured"
    };
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            catalog,
        },
        req_id.0,
    ))
}

#[cfg(test)]
#[path = "../api_test.rs"]
mod tests;
