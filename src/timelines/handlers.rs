use axum::extract::{Path, State};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::state::AppState;
use crate::timelines::dto::{
    AddTimelineRequest, DeletedResponse, TimelineListResponse, TimelineResponse,
};
use crate::timelines::repo::Timeline;

#[instrument(skip(state))]
pub async fn list_timelines(
    State(state): State<AppState>,
) -> ApiResult<Json<TimelineListResponse>> {
    let timelines = Timeline::list(&state.db).await?;
    Ok(Json(TimelineListResponse {
        success: true,
        timelines,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_timeline(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<AddTimelineRequest>,
) -> ApiResult<Json<TimelineResponse>> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::Validation("Description is required".into()));
    }
    if payload.from.trim().is_empty() {
        return Err(ApiError::Validation("From date is required".into()));
    }

    let timeline = Timeline::create(
        &state.db,
        payload.title.trim(),
        payload.description.trim(),
        payload.from.trim(),
        payload.to.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    )
    .await?;
    info!(timeline_id = %timeline.id, "timeline added");
    Ok(Json(TimelineResponse {
        success: true,
        message: "Timeline added successfully".into(),
        timeline,
    }))
}

#[instrument(skip(state))]
pub async fn delete_timeline(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    if !Timeline::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Timeline not found".into()));
    }
    info!(timeline_id = %id, "timeline deleted");
    Ok(Json(DeletedResponse {
        success: true,
        message: "Timeline deleted successfully".into(),
    }))
}
