//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use studio_core::StudioError;
use thiserror::Error;

use crate::generator::GeneratorError;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A studio operation failed.
    #[error(transparent)]
    Studio(#[from] StudioError),
    /// The generator could not be reached or answered badly.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// No generator URL is configured.
    #[error("AI generation is not configured")]
    GeneratorUnavailable,
    /// The request body is invalid.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Studio(e) => match e {
                StudioError::TemplateNotFound(_)
                | StudioError::PropertyNotFound(_)
                | StudioError::RevisionNotFound(_) => StatusCode::NOT_FOUND,
                StudioError::NoSelection
                | StudioError::DuplicateTemplate(_)
                | StudioError::StaleGeneration { .. } => StatusCode::CONFLICT,
                StudioError::InvalidDescriptor { .. }
                | StudioError::InvalidValue { .. }
                | StudioError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
                StudioError::Generation(_) => StatusCode::BAD_GATEWAY,
                StudioError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Generator(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Generator(GeneratorError::InvalidUrl(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Generator(_) => StatusCode::BAD_GATEWAY,
            Self::GeneratorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// User-visible notification attached to an error response.
#[derive(Debug, Serialize)]
pub struct Notification {
    /// Severity, always `error` for failures.
    pub level: &'static str,
    /// Message to show.
    pub message: String,
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Error message.
    pub error: String,
    /// Notification for the UI.
    pub notification: Notification,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("{status}: {message}");
        } else {
            tracing::debug!("{status}: {message}");
        }

        let body = ErrorBody {
            success: false,
            error: message.clone(),
            notification: Notification {
                level: "error",
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
