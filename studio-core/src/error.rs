//! Error types for studio operations.

use thiserror::Error;

/// Result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur in studio operations.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Template id is not present in the catalog.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Property name is not declared by the active template's schema.
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// An operation needed an active template but none is selected.
    #[error("No template selected")]
    NoSelection,

    /// Revision index is outside the history.
    #[error("Revision not found at index {0}")]
    RevisionNotFound(usize),

    /// A template with the same id is already in the catalog.
    #[error("Duplicate template id: {0}")]
    DuplicateTemplate(String),

    /// A property descriptor violates its schema invariants.
    #[error("Invalid property descriptor '{name}': {reason}")]
    InvalidDescriptor {
        /// Property name.
        name: String,
        /// Why the descriptor was rejected.
        reason: String,
    },

    /// Raw form input could not be converted to the property's kind.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// Property name.
        name: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A generation response arrived for a request that has been superseded.
    #[error("Stale generation response (ticket {ticket}, current {current})")]
    StaleGeneration {
        /// Ticket carried by the response.
        ticket: u64,
        /// Ticket of the newest request.
        current: u64,
    },

    /// The remote generator reported a failure.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A component body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
