use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use richview_catalog::{CatalogError, FrameCheck};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct FrameQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    ok: bool,
    #[serde(flatten)]
    check: FrameCheck,
}

#[derive(Debug, Serialize)]
struct FrameFailure {
    ok: bool,
    message: String,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(FrameFailure {
            ok: false,
            message: message.into(),
        }),
    )
        .into_response()
}

/// `GET /api/check-frame?url=...`
pub(super) async fn check_frame(
    State(state): State<AppState>,
    Query(query): Query<FrameQuery>,
) -> Response {
    let Some(url) = query.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Missing url");
    };

    match state.frame_probe.check(url).await {
        Ok(check) => Json(FrameReport { ok: true, check }).into_response(),
        Err(CatalogError::InvalidUrl { .. }) => failure(StatusCode::BAD_REQUEST, "Invalid url"),
        Err(e) => {
            tracing::warn!(error = %e, url, "frame probe failed");
            failure(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
