//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template body could not be parsed.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The markup references a name with no property value.
    #[error("Unbound parameter: {0}")]
    UnboundParameter(String),

    /// The backend failed for another reason.
    #[error("Render backend failed: {0}")]
    Backend(String),
}
