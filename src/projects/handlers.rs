use axum::extract::{Multipart, Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::projects::dto::{DeletedResponse, ProjectListResponse, ProjectResponse};
use crate::projects::repo::{NewProject, Project};
use crate::state::AppState;
use crate::uploads::MultipartForm;

const IMAGE_FOLDER: &str = "project_images";

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<ProjectListResponse>> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(ProjectListResponse {
        success: true,
        projects,
    }))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = Project::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;
    Ok(Json(ProjectResponse {
        success: true,
        message: None,
        project,
    }))
}

#[instrument(skip(state, mp))]
pub async fn add_project(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    mp: Multipart,
) -> ApiResult<Json<ProjectResponse>> {
    let form = MultipartForm::read(mp).await?;
    let image = form.required_file("image", "Project banner image is required")?;

    let new = NewProject {
        title: form.required_text("title", "Title")?,
        description: form.required_text("description", "Description")?,
        github_link: form.required_text("githublink", "GitHub link")?,
        project_link: form.required_text("projectlink", "Project link")?,
        technologies: form.required_text("technologies", "Technologies")?,
        stack: form.required_text("stack", "Stack")?,
        deployed: form.required_text("deployed", "Deployed")?,
        image_id: String::new(),
        image_url: String::new(),
    };

    let stored = state
        .storage
        .upload(IMAGE_FOLDER, image.bytes.clone(), &image.content_type)
        .await
        .map_err(|e| ApiError::UploadFailed(e.to_string()))?;

    let project = Project::create(
        &state.db,
        &NewProject {
            image_id: stored.id,
            image_url: stored.url,
            ..new
        },
    )
    .await?;
    info!(project_id = %project.id, "project added");
    Ok(Json(ProjectResponse {
        success: true,
        message: Some("Project added successfully".into()),
        project,
    }))
}

#[instrument(skip(state, mp))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> ApiResult<Json<ProjectResponse>> {
    let existing = Project::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    let form = MultipartForm::read(mp).await?;
    let mut new = NewProject {
        title: form.required_text("title", "Title")?,
        description: form.required_text("description", "Description")?,
        github_link: form.required_text("githublink", "GitHub link")?,
        project_link: form.required_text("projectlink", "Project link")?,
        technologies: form.required_text("technologies", "Technologies")?,
        stack: form.required_text("stack", "Stack")?,
        deployed: form.required_text("deployed", "Deployed")?,
        image_id: existing.image_id.clone(),
        image_url: existing.image_url.clone(),
    };

    if let Some(image) = form.file("image") {
        let stored = state
            .storage
            .upload(IMAGE_FOLDER, image.bytes.clone(), &image.content_type)
            .await
            .map_err(|e| ApiError::UploadFailed(e.to_string()))?;
        if let Err(e) = state.storage.delete(&existing.image_id).await {
            warn!(error = %e, object = %existing.image_id, "failed to delete replaced project image");
        }
        new.image_id = stored.id;
        new.image_url = stored.url;
    }

    let project = Project::update(&state.db, id, &new).await?;
    info!(project_id = %project.id, "project updated");
    Ok(Json(ProjectResponse {
        success: true,
        message: Some("Project updated successfully".into()),
        project,
    }))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let project = Project::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    if let Err(e) = state.storage.delete(&project.image_id).await {
        warn!(error = %e, object = %project.image_id, "failed to delete project image");
    }
    Project::delete(&state.db, id).await?;
    info!(project_id = %id, "project deleted");
    Ok(Json(DeletedResponse {
        success: true,
        message: "Project deleted successfully".into(),
    }))
}
