use axum::extract::{Multipart, Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::skills::dto::{DeletedResponse, SkillListResponse, SkillResponse, UpdateSkillRequest};
use crate::skills::repo::Skill;
use crate::state::AppState;
use crate::uploads::MultipartForm;

const ICON_FOLDER: &str = "skills_icons";

#[instrument(skip(state))]
pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Json<SkillListResponse>> {
    let skills = Skill::list(&state.db).await?;
    Ok(Json(SkillListResponse {
        success: true,
        skills,
    }))
}

#[instrument(skip(state, mp))]
pub async fn add_skill(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    mp: Multipart,
) -> ApiResult<Json<SkillResponse>> {
    let form = MultipartForm::read(mp).await?;
    let icon = form.required_file("svg", "PNG, JPEG or SVG icon of the skill is required")?;
    let title = form.required_text("title", "Title")?;
    let proficiency = form.required_text("proficiency", "Proficiency")?;

    let stored = state
        .storage
        .upload(ICON_FOLDER, icon.bytes.clone(), &icon.content_type)
        .await
        .map_err(|e| ApiError::UploadFailed(e.to_string()))?;

    let skill = Skill::create(&state.db, &title, &proficiency, &stored.id, &stored.url).await?;
    info!(skill_id = %skill.id, "skill added");
    Ok(Json(SkillResponse {
        success: true,
        message: "Skill added successfully".into(),
        skill,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_skill(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkillRequest>,
) -> ApiResult<Json<SkillResponse>> {
    let skill = Skill::update_proficiency(&state.db, id, &payload.proficiency)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".into()))?;
    info!(skill_id = %skill.id, "skill updated");
    Ok(Json(SkillResponse {
        success: true,
        message: "Skill updated successfully".into(),
        skill,
    }))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let skill = Skill::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".into()))?;

    if let Err(e) = state.storage.delete(&skill.icon_id).await {
        warn!(error = %e, object = %skill.icon_id, "failed to delete skill icon");
    }
    Skill::delete(&state.db, id).await?;
    info!(skill_id = %id, "skill deleted");
    Ok(Json(DeletedResponse {
        success: true,
        message: "Skill deleted successfully".into(),
    }))
}
