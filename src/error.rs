use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

/// Erreurs renvoyées par les services et les routes.
/// Chaque variante correspond à un code d'erreur stable côté client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Token and device id are required")]
    MissingCredentials,

    #[error("A valid email address is required")]
    InvalidEmail,

    #[error("This email is not on the beta whitelist")]
    NotWhitelisted,

    #[error("Invalid token")]
    InvalidToken,

    #[error("This token is already bound to another device")]
    DeviceMismatch,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) | ApiError::MissingCredentials => "invalid_input",
            ApiError::InvalidEmail => "invalid_email",
            ApiError::NotWhitelisted => "not_whitelisted",
            ApiError::InvalidToken => "invalid_token",
            ApiError::DeviceMismatch => "device_mismatch",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::UpstreamUnavailable(_) => "upstream_unavailable",
            ApiError::Database(_) | ApiError::Internal(_) => "internal",
        }
    }

    /// Les échecs d'authentification portent aussi `valid: false`
    fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::MissingCredentials | ApiError::InvalidToken | ApiError::DeviceMismatch
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::MissingCredentials | ApiError::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotWhitelisted | ApiError::DeviceMismatch => StatusCode::FORBIDDEN,
            ApiError::InvalidToken | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Le détail reste dans les logs, jamais dans la réponse
        let message = match self {
            ApiError::Database(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            ApiError::UpstreamUnavailable(_) => {
                tracing::error!(error = %self, "upstream call failed");
                "Service temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        };

        let mut body = serde_json::json!({
            "success": false,
            "error": self.code(),
            "message": message,
        });
        if self.is_auth_failure() {
            body["valid"] = serde_json::Value::Bool(false);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}
