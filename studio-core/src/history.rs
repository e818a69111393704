//! Revision history with linear undo/redo.
//!
//! The history is an ordered list of full property snapshots plus a cursor
//! pointing at the "current" revision:
//!
//! ```text
//!   [r0] [r1] [r2] [r3] [r4]
//!                   ^
//!                 cursor     undo -> r1, redo -> r3
//! ```
//!
//! Once the list grows past its capacity, the oldest unstarred revisions
//! are evicted; the most recent `protected_recent` revisions and every
//! starred revision are never evicted, so the capacity is a soft limit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PropertyValue, PropertyValueMap, StudioError, StudioResult};

/// Default number of revisions kept before eviction starts.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default number of most recent revisions that are never evicted.
pub const DEFAULT_PROTECTED_RECENT: usize = 10;

/// What produced a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    /// A different template was selected.
    TemplateSwitch,
    /// A single property was edited.
    PropertyEdit,
    /// Properties were reset to their defaults.
    Reset,
    /// An AI-generated template was added and selected.
    Generated,
}

/// Informational record of one changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Previous value, if the field existed.
    pub from: Option<PropertyValue>,
    /// New value.
    pub to: PropertyValue,
}

/// A captured snapshot of (template, property values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Millisecond timestamp, strictly increasing within a history.
    pub id: u64,
    /// Template the snapshot belongs to.
    pub template_id: String,
    /// Full copy of every property value.
    pub snapshot: PropertyValueMap,
    /// Human readable summary.
    pub description: String,
    /// Fields that differ from the previous state.
    #[serde(default)]
    pub changed_fields: BTreeMap<String, FieldChange>,
    /// Starred revisions are never evicted.
    #[serde(default)]
    pub starred: bool,
    /// What produced this revision.
    #[serde(default = "Revision::default_kind")]
    pub kind: RevisionKind,
}

impl Revision {
    const fn default_kind() -> RevisionKind {
        RevisionKind::PropertyEdit
    }
}

/// Data for a revision that has not been committed yet.
#[derive(Debug, Clone)]
pub struct NewRevision {
    /// Template the snapshot belongs to.
    pub template_id: String,
    /// Full copy of every property value.
    pub snapshot: PropertyValueMap,
    /// Human readable summary.
    pub description: String,
    /// Fields that differ from the previous state.
    pub changed_fields: BTreeMap<String, FieldChange>,
    /// What produced this revision.
    pub kind: RevisionKind,
}

/// What happens to revisions past the cursor when a new one is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPolicy {
    /// Discard the undone revisions before appending. Starred ones are kept
    /// in place ahead of the new revision.
    #[default]
    Truncate,
    /// Keep the undone revisions in the list; they become unreachable by
    /// redo but stay visible and can still be restored by index.
    Preserve,
}

impl fmt::Display for BranchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncate => f.write_str("truncate"),
            Self::Preserve => f.write_str("preserve"),
        }
    }
}

impl FromStr for BranchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "preserve" => Ok(Self::Preserve),
            other => Err(format!("unknown branch policy: {other}")),
        }
    }
}

/// History sizing and branching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Soft cap on the number of revisions.
    pub capacity: usize,
    /// Number of most recent revisions that eviction never touches.
    pub protected_recent: usize,
    /// Behavior when committing after an undo.
    pub branch_policy: BranchPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            protected_recent: DEFAULT_PROTECTED_RECENT,
            branch_policy: BranchPolicy::default(),
        }
    }
}

/// Ordered revisions plus a cursor.
///
/// Invariant: `cursor < len` whenever the history is non-empty.
#[derive(Debug, Clone, Default)]
pub struct RevisionHistory {
    revisions: Vec<Revision>,
    cursor: usize,
    config: HistoryConfig,
}

impl RevisionHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            revisions: Vec::new(),
            cursor: 0,
            config,
        }
    }

    /// Rebuild a history from persisted revisions. The cursor is placed on
    /// the newest revision.
    #[must_use]
    pub fn from_revisions(config: HistoryConfig, revisions: Vec<Revision>) -> Self {
        let mut history = Self {
            cursor: revisions.len().saturating_sub(1),
            revisions,
            config,
        };
        history.evict();
        history
    }

    /// Append a revision and move the cursor onto it, then evict.
    ///
    /// Returns the id of the new revision.
    pub fn commit(&mut self, new: NewRevision, now_ms: u64) -> u64 {
        if self.config.branch_policy == BranchPolicy::Truncate && self.can_redo() {
            let before = self.revisions.len();
            let cursor = self.cursor;
            let mut index = 0;
            // Starred revisions outlive the branch they were undone from.
            self.revisions.retain(|r| {
                let keep = index <= cursor || r.starred;
                index += 1;
                keep
            });
            tracing::debug!(
                "Discarded {} undone revisions",
                before - self.revisions.len()
            );
        }

        let id = self
            .revisions
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(now_ms, |last| now_ms.max(last.saturating_add(1)));

        self.revisions.push(Revision {
            id,
            template_id: new.template_id,
            snapshot: new.snapshot,
            description: new.description,
            changed_fields: new.changed_fields,
            starred: false,
            kind: new.kind,
        });
        self.cursor = self.revisions.len() - 1;
        self.evict();
        id
    }

    /// Drop the oldest unstarred revisions outside the protected window until
    /// the history fits its capacity or nothing more can be evicted.
    ///
    /// Returns the number of evicted revisions.
    pub fn evict(&mut self) -> usize {
        let mut removed = 0;
        while self.revisions.len() > self.config.capacity {
            let protected_from = self
                .revisions
                .len()
                .saturating_sub(self.config.protected_recent);
            let Some(index) = self.revisions[..protected_from]
                .iter()
                .position(|r| !r.starred)
            else {
                break;
            };
            self.revisions.remove(index);
            if self.cursor > index {
                self.cursor -= 1;
            }
            removed += 1;
        }
        if !self.revisions.is_empty() && self.cursor >= self.revisions.len() {
            self.cursor = self.revisions.len() - 1;
        }
        if removed > 0 {
            tracing::debug!(
                "Evicted {removed} revisions, {} remain",
                self.revisions.len()
            );
        }
        removed
    }

    /// Step back one revision.
    pub fn undo(&mut self) -> Option<&Revision> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.revisions.get(self.cursor)
    }

    /// Step forward one revision.
    pub fn redo(&mut self) -> Option<&Revision> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.revisions.get(self.cursor)
    }

    /// Move the cursor to an arbitrary revision.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn restore(&mut self, index: usize) -> StudioResult<&Revision> {
        if index >= self.revisions.len() {
            return Err(StudioError::RevisionNotFound(index));
        }
        self.cursor = index;
        Ok(&self.revisions[index])
    }

    /// Mark a revision as starred.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn star(&mut self, index: usize) -> StudioResult<()> {
        self.set_starred(index, true)
    }

    /// Clear a revision's star.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn unstar(&mut self, index: usize) -> StudioResult<()> {
        self.set_starred(index, false)
    }

    fn set_starred(&mut self, index: usize, starred: bool) -> StudioResult<()> {
        let revision = self
            .revisions
            .get_mut(index)
            .ok_or(StudioError::RevisionNotFound(index))?;
        revision.starred = starred;
        Ok(())
    }

    /// Remove every revision.
    pub fn clear(&mut self) {
        self.revisions.clear();
        self.cursor = 0;
    }

    /// Whether [`undo`](Self::undo) would move the cursor.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`redo`](Self::redo) would move the cursor.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.revisions.len()
    }

    /// The revision under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Revision> {
        self.revisions.get(self.cursor)
    }

    /// Revision at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Revision> {
        self.revisions.get(index)
    }

    /// All revisions, oldest first.
    #[must_use]
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    /// Cursor index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of revisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the history has no revisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Sizing and branching configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

/// Fields whose value differs between two snapshots.
#[must_use]
pub fn diff(before: &PropertyValueMap, after: &PropertyValueMap) -> BTreeMap<String, FieldChange> {
    after
        .iter()
        .filter(|(name, value)| before.get(*name) != Some(*value))
        .map(|(name, value)| {
            (
                name.clone(),
                FieldChange {
                    from: before.get(name).cloned(),
                    to: value.clone(),
                },
            )
        })
        .collect()
}
