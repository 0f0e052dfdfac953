use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::ElementSummary;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ElementsResponse {
    pub satellites: Vec<ElementSummary>,
}

#[utoipa::path(
    get,
    path = "/api/elements",
    tag = "elements",
    responses(
        (status = 200, description = "Element summaries for the loaded catalog", body = ElementsResponse),
        (status = 400, description = "Predictions not configured")
    )
)]
pub async fn list_elements(State(state): State<AppState>) -> ApiResult<Json<ElementsResponse>> {
    let loader = state
        .tle_loader
        .as_ref()
        .ok_or_else(|| ApiError::Validation("predictions not configured".into()))?;

    let loader = loader.read().await;
    let mut satellites = Vec::new();
    for entry in loader.satellites() {
        match entry.summary() {
            Ok(summary) => satellites.push(summary),
            Err(e) => log::warn!("skipping {}: {}", entry.info.name, e),
        }
    }

    satellites.sort_by_key(|s| s.norad_id);

    Ok(Json(ElementsResponse { satellites }))
}
