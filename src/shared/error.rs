use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything that can end an interaction request early.
///
/// The response body never carries the underlying reason; that only goes to
/// the log.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("interaction signature could not be verified: {0}")]
    Authentication(String),
    #[error("malformed interaction payload: {0}")]
    MalformedRequest(String),
    #[error("failed to encode interaction response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl InteractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InteractionError::Authentication(_) => StatusCode::UNAUTHORIZED,
            InteractionError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            InteractionError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            InteractionError::Authentication(_) => "invalid request signature",
            InteractionError::MalformedRequest(_) => "bad request",
            InteractionError::Encoding(_) => "internal server error",
        }
    }
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        match &self {
            InteractionError::Encoding(_) => tracing::error!("{}", &self),
            _ => tracing::warn!("{}", &self),
        }

        (self.status_code(), self.public_message()).into_response()
    }
}
