//! Wire types for the remote component generator.
//!
//! The generator itself is an opaque HTTP collaborator; this module only
//! defines the request/response bodies and the ticket used to discard
//! superseded responses.

use serde::{Deserialize, Serialize};

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Free-form description of the component.
    pub description: String,
    /// Component type, e.g. `button` or `card`.
    #[serde(default)]
    pub component_type: String,
    /// Visual style hint.
    #[serde(default)]
    pub style: String,
}

impl GenerationRequest {
    /// Display name for the template built from this request.
    ///
    /// Uses the first few words of the description, falling back to the
    /// component type.
    #[must_use]
    pub fn template_name(&self) -> String {
        const MAX_WORDS: usize = 5;

        let words: Vec<&str> = self.description.split_whitespace().take(MAX_WORDS).collect();
        if words.is_empty() {
            let kind = self.component_type.trim();
            return if kind.is_empty() {
                "Generated Component".to_string()
            } else {
                format!("Generated {kind}")
            };
        }

        let mut name = words.join(" ");
        if let Some(first) = name.get(..1) {
            name = first.to_uppercase() + &name[1..];
        }
        name
    }
}

/// Body of a generation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Whether generation succeeded.
    pub success: bool,
    /// Component body on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Where the component came from (model name, fallback, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    /// A failed response carrying `error`.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Body of an enhancement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    /// Component body to improve.
    pub component_code: String,
    /// What the user wants improved.
    pub enhancement_request: String,
}

/// Suggestions returned by the enhancement endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancements {
    /// Proposed new properties, in whatever shape the service returns.
    #[serde(default)]
    pub new_props: Vec<serde_json::Value>,
    /// Styling suggestions.
    #[serde(default)]
    pub style_improvements: Vec<String>,
    /// Accessibility suggestions.
    #[serde(default)]
    pub accessibility_tips: Vec<String>,
    /// Performance suggestions.
    #[serde(default)]
    pub performance_tips: Vec<String>,
}

/// Body of an enhancement response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Suggestions on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhancements: Option<Enhancements>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Identifies one generation request. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationTicket(pub u64);
