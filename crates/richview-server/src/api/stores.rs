use axum::{
    extract::{Query, State},
    Extension, Json,
};
use richview_core::Store;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct StoreQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    #[serde(flatten)]
    store: Store,
    distance_km: Option<f64>,
}

/// Stores matching `q`, nearest first when both coordinates are given.
pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<ApiResponse<Vec<StoreItem>>>, ApiError> {
    let origin = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(ApiError::new(
                    req_id.0,
                    "validation_error",
                    "lat must be within [-90, 90] and lng within [-180, 180]",
                ));
            }
            Some((lat, lng))
        }
        _ => None,
    };

    let matches = state
        .stores
        .search(query.q.as_deref().unwrap_or_default());
    let items: Vec<StoreItem> = match origin {
        Some((lat, lng)) => {
            let mut ranked: Vec<(&Store, f64)> = matches
                .into_iter()
                .map(|s| (s, s.distance_km(lat, lng)))
                .collect();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
            ranked
                .into_iter()
                .map(|(store, d)| StoreItem {
                    store: store.clone(),
                    distance_km: Some(d),
                })
                .collect()
        }
        None => matches
            .into_iter()
            .map(|store| StoreItem {
                store: store.clone(),
                distance_km: None,
            })
            .collect(),
    };

    Ok(Json(ApiResponse::new(items, req_id.0)))
}
