//! Downloadable export of the revision history.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Revision, RevisionHistory, StudioResult};

/// JSON document produced by an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// RFC 3339 export timestamp.
    pub export_date: String,
    /// Name of the template selected at export time.
    pub component: String,
    /// Every revision, oldest first.
    pub revisions: Vec<Revision>,
    /// Cursor index at export time.
    pub current_revision: usize,
}

impl ExportDocument {
    /// Build an export of `history`.
    #[must_use]
    pub fn new(
        component: impl Into<String>,
        history: &RevisionHistory,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            component: component.into(),
            revisions: history.revisions().to_vec(),
            current_revision: history.cursor(),
        }
    }

    /// Suggested download file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        let slug: String = self
            .component
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}-revisions.json", slug.trim_matches('-'))
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> StudioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an exported document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an export document.
    pub fn from_json(json: &str) -> StudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
