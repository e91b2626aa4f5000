use axum::extract::{Multipart, Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::applications::dto::{ApplicationListResponse, ApplicationResponse, DeletedResponse};
use crate::applications::repo::SoftwareApplication;
use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::state::AppState;
use crate::uploads::MultipartForm;

const ICON_FOLDER: &str = "software_icons";

#[instrument(skip(state))]
pub async fn list_applications(
    State(state): State<AppState>,
) -> ApiResult<Json<ApplicationListResponse>> {
    let applications = SoftwareApplication::list(&state.db).await?;
    Ok(Json(ApplicationListResponse {
        success: true,
        applications,
    }))
}

#[instrument(skip(state, mp))]
pub async fn add_application(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    mp: Multipart,
) -> ApiResult<Json<ApplicationResponse>> {
    let form = MultipartForm::read(mp).await?;
    let icon = form.required_file("svg", "SVG or icon of the software is required")?;
    let name = form.required_text("name", "Name of the software")?;

    let stored = state
        .storage
        .upload(ICON_FOLDER, icon.bytes.clone(), &icon.content_type)
        .await
        .map_err(|e| ApiError::UploadFailed(e.to_string()))?;

    let application = SoftwareApplication::create(&state.db, &name, &stored.id, &stored.url).await?;
    info!(application_id = %application.id, "software application added");
    Ok(Json(ApplicationResponse {
        success: true,
        message: "Software application added successfully".into(),
        application,
    }))
}

#[instrument(skip(state))]
pub async fn delete_application(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let application = SoftwareApplication::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Software application not found".into()))?;

    if let Err(e) = state.storage.delete(&application.icon_id).await {
        warn!(error = %e, object = %application.icon_id, "failed to delete application icon");
    }
    SoftwareApplication::delete(&state.db, id).await?;
    info!(application_id = %id, "software application deleted");
    Ok(Json(DeletedResponse {
        success: true,
        message: "Software application deleted successfully".into(),
    }))
}
