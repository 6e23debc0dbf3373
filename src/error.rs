/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - RepoError / AuthError を統一的に変換
 *
 * Envelope (全エラー共通):
 *   {"success": false, "error": <status>, "message": <string>}
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: status.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Request Timeout")]
    RequestTimeout,
    #[error("Payload Too Large")]
    PayloadTooLarge,
    // The reason is for logs only; clients get the generic message.
    #[error("Unprocessable")]
    Unprocessable { reason: String },
    #[error("Internal Server Error")]
    Internal,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl AppError {
    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable {
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(e) => e.status_code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unprocessable { reason } = &self {
            tracing::info!(%reason, "unprocessable request");
        }

        ErrorResponse::new(self.status_code(), self.to_string()).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::unprocessable("a drink with this title already exists"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
            RepoError::CorruptRecipe { id } => {
                tracing::error!(drink_id = id, "stored recipe is not valid JSON");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unprocessable_hides_reason() {
        let (status, body) = body_of(AppError::unprocessable("title is required")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"success": false, "error": 422, "message": "Unprocessable"}));
    }

    #[tokio::test]
    async fn auth_errors_keep_their_status_and_message() {
        let (status, body) = body_of(AuthError::AuthorizationHeaderMissing.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"success": false, "error": 401, "message": "Authorization header is missing"})
        );
    }

    #[tokio::test]
    async fn payload_too_large_uses_envelope() {
        let (status, body) = body_of(AppError::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body,
            json!({"success": false, "error": 413, "message": "Payload Too Large"})
        );
    }

    #[tokio::test]
    async fn conflict_maps_to_unprocessable() {
        let (status, _) = body_of(RepoError::Conflict.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
