use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Request gate: a handler taking `AuthUser` only runs for a request carrying
/// a valid bearer token whose subject still exists. Everything else is 401.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "bearer token rejected");
            ApiError::Unauthenticated
        })?;

        // The subject may have vanished after issuance; that is an auth
        // failure, not a server fault.
        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/user/profile");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn tampered_token_is_unauthenticated() {
        let state = AppState::fake();
        let forged_keys = JwtKeys {
            encoding: jsonwebtoken::EncodingKey::from_secret(b"other-secret"),
            ..JwtKeys::from_ref(&state)
        };
        let token = forged_keys.sign(Uuid::new_v4()).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
