use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::horizon::{upcoming_passes, Pass};
use crate::predict::sun::{sun_conjunction, sun_track};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

const MAX_HORIZON_DAYS: i64 = 30;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PassesQuery {
    /// Start of the search window (RFC3339); defaults to now.
    pub start: Option<String>,
    /// Horizon length in days; defaults to the configured value.
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassRecord {
    pub satellite: String,
    pub norad_id: u64,
    /// True when the pass track runs close to the sun for an optical observer.
    pub sun_conflict: bool,
    pub pass: Pass,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassesResponse {
    pub passes: Vec<PassRecord>,
    pub satellite_count: usize,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(
        ("start" = Option<String>, Query, description = "Start time (RFC3339), default now"),
        ("days" = Option<i64>, Query, description = "Horizon length in days")
    ),
    responses(
        (status = 200, description = "Upcoming passes for every loaded satellite", body = PassesResponse),
        (status = 400, description = "Invalid parameters or no satellites loaded")
    )
)]
pub async fn list_passes(
    State(state): State<AppState>,
    Query(query): Query<PassesQuery>,
) -> ApiResult<impl IntoResponse> {
    let loader = state
        .tle_loader
        .as_ref()
        .ok_or_else(|| ApiError::Validation("predictions not configured".into()))?;

    let observer = state
        .config
        .station
        .observer()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let start = match &query.start {
        Some(raw) => parse_rfc3339(raw)?,
        None => Utc::now(),
    };

    let days = query.days.unwrap_or_else(|| {
        state
            .config
            .predict
            .as_ref()
            .map(|c| c.horizon_days)
            .unwrap_or(7)
    });
    if !(1..=MAX_HORIZON_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!(
            "days must be within 1..={MAX_HORIZON_DAYS}"
        )));
    }

    let loader = loader.read().await;
    let satellites = loader.satellites();
    if satellites.is_empty() {
        return Err(ApiError::Validation("no satellites loaded".into()));
    }

    let mut records = Vec::new();
    for entry in satellites {
        let oracle = match entry.oracle(observer) {
            Ok(oracle) => oracle,
            Err(e) => {
                log::warn!("skipping {}: {}", entry.info.name, e);
                continue;
            }
        };

        for pass in upcoming_passes(&oracle, start, Duration::days(days)) {
            let sun = sun_track(&observer, &pass.track);
            records.push(PassRecord {
                satellite: entry.info.name.clone(),
                norad_id: entry.info.norad_id,
                sun_conflict: sun_conjunction(&pass.track, &sun),
                pass,
            });
        }
    }

    records.sort_by_key(|r| r.pass.aos.map(|aos| aos.time));

    let satellite_count: HashSet<_> = records.iter().map(|r| r.norad_id).collect();

    Ok((
        StatusCode::OK,
        Json(PassesResponse {
            satellite_count: satellite_count.len(),
            passes: records,
        }),
    ))
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::Validation(format!("invalid start time: {e}")))
}
