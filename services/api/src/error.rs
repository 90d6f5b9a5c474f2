use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use warden_core::validation::FieldErrors;

/// API error variants, rendered as `{statusCode, kind, message[, errors]}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("invalid id")]
    InvalidId,
    #[error("email is not registered")]
    EmailNotRegistered,
    #[error("update failed")]
    UpdateFailed,
    #[error("user not found")]
    UserNotFound,
    #[error("role not found")]
    RoleNotFound,
    #[error("permission not found")]
    PermissionNotFound,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("role already exists")]
    RoleAlreadyExists,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("insufficient permission")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidId => "INVALID_ID",
            Self::EmailNotRegistered => "EMAIL_NOT_REGISTERED",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::PermissionNotFound => "PERMISSION_NOT_FOUND",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::RoleAlreadyExists => "ROLE_ALREADY_EXISTS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidId | Self::EmailNotRegistered | Self::UpdateFailed => {
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound | Self::RoleNotFound | Self::PermissionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailAlreadyRegistered | Self::RoleAlreadyExists => StatusCode::CONFLICT,
            // Permission denial shares 401 with authentication failures; `kind` tells them apart.
            Self::Unauthorized | Self::InvalidCredentials | Self::InvalidToken | Self::Forbidden => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors; TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "statusCode": status.as_u16(),
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(errors) = self {
            body["errors"] = serde_json::to_value(&errors).unwrap_or_default();
        }
        (status, axum::Json(body)).into_response()
    }
}
