use axum::{extract::State, Json};

use crate::horizon::LookAngleSample;
use crate::tracker::{RunCommand, TrackerError, TrackerMode, TrackerStatus};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[utoipa::path(
    post,
    path = "/api/tracker/run",
    tag = "tracker",
    request_body = RunCommand,
    responses(
        (status = 200, description = "Tracker started", body = TrackerMode),
        (status = 400, description = "Invalid TLE", body = ErrorResponse),
        (status = 409, description = "Tracker already running", body = ErrorResponse)
    )
)]
pub async fn run(
    State(state): State<AppState>,
    Json(request): Json<RunCommand>,
) -> ApiResult<Json<TrackerMode>> {
    let mut tracker = state.tracker.lock().await;
    tracker.run(&request).map_err(map_tracker_error)?;
    Ok(Json(tracker.status().mode))
}

#[utoipa::path(
    post,
    path = "/api/tracker/stop",
    tag = "tracker",
    responses(
        (status = 200, description = "Tracker stopped", body = TrackerMode)
    )
)]
pub async fn stop(State(state): State<AppState>) -> ApiResult<Json<TrackerMode>> {
    let mut tracker = state.tracker.lock().await;
    tracker.stop().await;
    Ok(Json(tracker.status().mode))
}

#[utoipa::path(
    get,
    path = "/api/tracker/status",
    tag = "tracker",
    responses(
        (status = 200, description = "Full tracking state", body = TrackerStatus)
    )
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<TrackerStatus>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.status()))
}

#[utoipa::path(
    get,
    path = "/api/tracker/status/sample",
    tag = "tracker",
    responses(
        (status = 200, description = "Latest look-angle sample", body = Option<LookAngleSample>)
    )
)]
pub async fn status_sample(
    State(state): State<AppState>,
) -> ApiResult<Json<Option<LookAngleSample>>> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.status().last_sample))
}

fn map_tracker_error(err: TrackerError) -> ApiError {
    match err {
        TrackerError::AlreadyRunning => ApiError::Conflict("tracker_running"),
        other => ApiError::Validation(other.to_string()),
    }
}
