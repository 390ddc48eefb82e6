use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use richview_catalog::{checkout_route, checkout_url, normalize_product};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_catalog_error, require_catalog, ApiError, AppState};

const IFRAME_SANDBOX: &str = "allow-scripts allow-forms allow-same-origin allow-popups \
                              allow-modals allow-popups-to-escape-sandbox";
const IFRAME_ALLOW: &str = "payment *; fullscreen *";

/// `GET /api/products/{id}/checkout`: 303 to the in-app checkout page for
/// the product's payment link.
pub(super) async fn redirect_to_checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
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

    let product = normalize_product(&raw, 0);
    let target = checkout_url(&product.id, &product.metadata);
    tracing::info!(product_id = %product.id, target = %target, "redirecting to checkout");
    Ok(Redirect::to(&checkout_route(&target)))
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutQuery {
    pub url: Option<String>,
}

/// `GET /checkout?url=...`: full-screen framed payment page, or back home
/// when there is nothing usable to frame.
pub(super) async fn checkout_page(Query(query): Query<CheckoutQuery>) -> Response {
    let Some(url) = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| is_http_url(u))
    else {
        tracing::debug!("checkout opened without a usable url; redirecting home");
        return Redirect::to("/").into_response();
    };

    Html(render_checkout_page(url)).into_response()
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn render_checkout_page(url: &str) -> String {
    let src = escape_attr(url);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Checkout | Richview</title>\n\
         <style>html,body{{margin:0;height:100%;background:#000}}\
         iframe{{position:fixed;inset:0;width:100%;height:100%;border:0}}</style>\n\
         </head>\n\
         <body>\n\
         <iframe src=\"{src}\" title=\"Checkout\" sandbox=\"{IFRAME_SANDBOX}\" \
         allow=\"{IFRAME_ALLOW}\" referrerpolicy=\"no-referrer-when-downgrade\"></iframe>\n\
         </body>\n\
         </html>\n"
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
