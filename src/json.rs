use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// Drop-in for `axum::Json` that keeps body rejections inside the error
/// envelope: a missing or malformed field becomes a 400
/// `{"success": false, "message": ...}` instead of axum's plain-text 422.
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        Ok(Json(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    #[derive(Debug, serde::Deserialize)]
    struct Credentials {
        #[allow(dead_code)]
        email: String,
        #[allow(dead_code)]
        password: String,
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_field_becomes_enveloped_validation_error() {
        let req = json_request(r#"{"email":"a@x.com"}"#);
        let err = Json::<Credentials>::from_request(req, &())
            .await
            .err()
            .expect("must reject");
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_becomes_enveloped_validation_error() {
        let req = json_request("{not json");
        let err = Json::<Credentials>::from_request(req, &())
            .await
            .err()
            .expect("must reject");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn well_formed_body_passes_through() {
        let req = json_request(r#"{"email":"a@x.com","password":"password123"}"#);
        let Json(creds) = Json::<Credentials>::from_request(req, &())
            .await
            .ok()
            .expect("must accept");
        assert_eq!(creds.email, "a@x.com");
    }
}
