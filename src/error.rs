use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::jwt::TokenKind;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no signing secret configured for the {0}")]
    MissingSecret(TokenKind),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("invalid Set-Cookie value")]
    InvalidCookie(#[from] http::header::InvalidHeaderValue),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error("missing or malformed authorization")]
    Unauthorized,

    #[error("password hashing failed")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::UserNotFound => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::Token(TokenError::Invalid(_)) => StatusCode::UNAUTHORIZED,
            AuthError::Token(_) | AuthError::PasswordHash(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        // server-side faults get a generic body
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
