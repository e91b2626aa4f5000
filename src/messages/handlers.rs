use axum::extract::{Path, State};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::json::Json;
use crate::messages::dto::{DeletedResponse, MessageListResponse, SendMessageRequest, SentResponse};
use crate::messages::repo::Message;
use crate::state::AppState;

fn min_len(value: &str, label: &str) -> Result<(), ApiError> {
    if value.trim().len() < 3 {
        return Err(ApiError::Validation(format!(
            "{label} should have at least 3 characters"
        )));
    }
    Ok(())
}

/// Public contact form; the only unauthenticated write in the system.
#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<Json<SentResponse>> {
    min_len(&payload.sender_name, "Name")?;
    min_len(&payload.subject, "Subject")?;
    min_len(&payload.message, "Message")?;

    let data = Message::create(
        &state.db,
        payload.sender_name.trim(),
        payload.subject.trim(),
        payload.message.trim(),
    )
    .await?;
    info!(message_id = %data.id, "message received");
    Ok(Json(SentResponse {
        success: true,
        message: "Message sent successfully".into(),
        data,
    }))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<MessageListResponse>> {
    let messages = Message::list(&state.db).await?;
    Ok(Json(MessageListResponse {
        success: true,
        messages,
    }))
}

#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    if !Message::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Message not found".into()));
    }
    info!(message_id = %id, "message deleted");
    Ok(Json(DeletedResponse {
        success: true,
        message: "Message deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_len_rule() {
        assert!(min_len("abc", "Name").is_ok());
        assert!(min_len("  abc  ", "Name").is_ok());
        let err = min_len("ab", "Subject").unwrap_err();
        assert_eq!(err.to_string(), "Subject should have at least 3 characters");
    }
}
