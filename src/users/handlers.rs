use axum::extract::{FromRef, Multipart, Path, State};
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::state::AppState;
use crate::uploads::MultipartForm;
use crate::users::dto::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ResetPasswordRequest, UserResponse,
};
use crate::users::repo::{NewUser, ProfilePatch, User};
use crate::users::services::{
    complete_password_reset, is_valid_email, start_password_reset, validate_new_password,
    validate_phone, verify_login, verify_old_password,
};

const AVATAR_FOLDER: &str = "AVATARS";
const RESUME_FOLDER: &str = "RESUMES";
const MISSING_FILES: &str = "Avatar and resume are required";

#[instrument(skip(state, mp))]
pub async fn register(
    State(state): State<AppState>,
    mp: Multipart,
) -> ApiResult<Json<AuthResponse>> {
    let form = MultipartForm::read(mp).await?;
    if !form.has_files() {
        return Err(ApiError::Validation(MISSING_FILES.into()));
    }
    let avatar = form.required_file("avatar", MISSING_FILES)?;
    let resume = form.required_file("resume", MISSING_FILES)?;

    let name = form.required_text("name", "Name")?;
    let email = form.required_text("email", "Email")?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    let phone = form.required_text("phone", "Phone number")?;
    validate_phone(&phone)?;
    let about_me = form.required_text("aboutMe", "About me")?;
    let password = form.required_text("password", "Password")?;
    validate_new_password(&password, &password)?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "register with taken email");
        return Err(ApiError::Validation("Email already registered".into()));
    }

    let stored_avatar = state
        .storage
        .upload(AVATAR_FOLDER, avatar.bytes.clone(), &avatar.content_type)
        .await
        .map_err(|e| ApiError::UploadFailed(e.to_string()))?;
    let stored_resume = state
        .storage
        .upload(RESUME_FOLDER, resume.bytes.clone(), &resume.content_type)
        .await
        .map_err(|e| ApiError::UploadFailed(e.to_string()))?;

    let password_hash = hash_password(&password)?;
    let user = User::create(
        &state.db,
        &NewUser {
            name,
            email,
            phone,
            about_me,
            password_hash,
            avatar_id: stored_avatar.id,
            avatar_url: stored_avatar.url,
            resume_id: stored_resume.id,
            resume_url: stored_resume.url,
            portfolio_url: form.text("portfolioURL"),
            github_url: form.text("githubURL"),
            linkedin_url: form.text("linkedInURL"),
            instagram_url: form.text("instagramURL"),
            twitter_url: form.text("twitterURL"),
            facebook_url: form.text("facebookURL"),
            youtube_url: form.text("youtubeURL"),
        },
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        success: true,
        message: "User registered successfully".into(),
        token,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Please enter email and password".into()));
    }

    let found = User::find_by_email(&state.db, &payload.email).await?;
    let user = verify_login(found, &payload.password)?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        success: true,
        message: "User logged in successfully".into(),
        token,
        user,
    }))
}

/// Tokens are stateless; logout is the client discarding its copy.
#[instrument(skip_all)]
pub async fn logout(AuthUser(user): AuthUser) -> Json<MessageResponse> {
    info!(user_id = %user.id, "user logged out");
    Json(MessageResponse {
        success: true,
        message: "Logged out successfully".into(),
    })
}

#[instrument(skip_all)]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user,
    })
}

/// Public read of the site owner's profile; no credentials involved.
#[instrument(skip(state))]
pub async fn portfolio_profile(State(state): State<AppState>) -> ApiResult<Json<UserResponse>> {
    let user = User::first_profile(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

#[instrument(skip(state, mp))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mp: Multipart,
) -> ApiResult<Json<UserResponse>> {
    let form = MultipartForm::read(mp).await?;

    let name = form.required_text("name", "Name")?;
    let email = form.required_text("email", "Email")?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if email != user.email && User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Validation("Email already registered".into()));
    }
    let phone = form.required_text("phone", "Phone number")?;
    validate_phone(&phone)?;
    let about_me = form.required_text("aboutMe", "About me")?;

    let mut patch = ProfilePatch {
        name,
        email,
        phone,
        about_me,
        avatar_id: user.avatar_id.clone(),
        avatar_url: user.avatar_url.clone(),
        resume_id: user.resume_id.clone(),
        resume_url: user.resume_url.clone(),
        portfolio_url: form.text("portfolioURL"),
        github_url: form.text("githubURL"),
        linkedin_url: form.text("linkedInURL"),
        instagram_url: form.text("instagramURL"),
        twitter_url: form.text("twitterURL"),
        facebook_url: form.text("facebookURL"),
        youtube_url: form.text("youtubeURL"),
    };

    if let Some(file) = form.file("avatar") {
        let stored = state
            .storage
            .upload(AVATAR_FOLDER, file.bytes.clone(), &file.content_type)
            .await
            .map_err(|e| ApiError::UploadFailed(e.to_string()))?;
        if let Err(e) = state.storage.delete(&user.avatar_id).await {
            warn!(error = %e, object = %user.avatar_id, "failed to delete replaced avatar");
        }
        patch.avatar_id = stored.id;
        patch.avatar_url = stored.url;
    }
    if let Some(file) = form.file("resume") {
        let stored = state
            .storage
            .upload(RESUME_FOLDER, file.bytes.clone(), &file.content_type)
            .await
            .map_err(|e| ApiError::UploadFailed(e.to_string()))?;
        if let Err(e) = state.storage.delete(&user.resume_id).await {
            warn!(error = %e, object = %user.resume_id, "failed to delete replaced resume");
        }
        patch.resume_id = stored.id;
        patch.resume_url = stored.url;
    }

    let updated = User::update_profile(&state.db, user.id, &patch).await?;
    info!(user_id = %updated.id, "profile updated");
    Ok(Json(UserResponse {
        success: true,
        user: updated,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    verify_old_password(&user, &payload.old_password)?;
    validate_new_password(&payload.new_password, &payload.confirm_new_password)?;

    let password_hash = hash_password(&payload.new_password)?;
    User::set_password(&state.db, user.id, &password_hash).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "password changed");
    Ok(Json(AuthResponse {
        success: true,
        message: "Password updated successfully".into(),
        token,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = payload.email.trim().to_lowercase();
    let sent_to = start_password_reset(
        &state.db,
        state.mailer.as_ref(),
        &state.config.dashboard_url,
        &email,
    )
    .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: format!("Email sent to {sent_to} successfully"),
    }))
}

#[instrument(skip(state, payload, token))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = complete_password_reset(
        &state.db,
        &token,
        &payload.password,
        &payload.confirm_password,
    )
    .await?;

    let session = JwtKeys::from_ref(&state).sign(user.id)?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Password reset successfully".into(),
        token: session,
        user,
    }))
}
