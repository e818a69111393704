//! Studio session state.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::ai::{GenerationRequest, GenerationResponse, GenerationTicket};
use crate::history::{self, FieldChange, HistoryConfig, NewRevision, RevisionHistory, RevisionKind};
use crate::panel::{generate_panel, Panel};
use crate::store::{HistoryStore, MemoryHistoryStore};
use crate::{
    infer, Catalog, ComponentTemplate, ExportDocument, PropertyValue, PropertyValueMap, Revision,
    StudioError, StudioResult,
};

/// Callback invoked whenever the selected template or its values change.
pub type OnChangeCallback = Box<dyn Fn(&ComponentTemplate, &PropertyValueMap) + Send + Sync>;

/// Millisecond clock used to stamp revisions.
pub type Clock = fn() -> u64;

/// Milliseconds since the Unix epoch from the system clock.
#[must_use]
pub fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// One editing session: the catalog, the selected template, its property
/// values and the revision history.
pub struct StudioState {
    catalog: Catalog,
    active: Option<String>,
    values: PropertyValueMap,
    history: RevisionHistory,
    store: Box<dyn HistoryStore>,
    clock: Clock,
    on_change: Option<OnChangeCallback>,
    generation: u64,
}

impl fmt::Debug for StudioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioState")
            .field("catalog", &self.catalog.len())
            .field("active", &self.active)
            .field("values", &self.values)
            .field("history", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl StudioState {
    /// Create a session with an in-memory store.
    #[must_use]
    pub fn new(catalog: Catalog, config: HistoryConfig) -> Self {
        Self::with_store(catalog, config, Box::new(MemoryHistoryStore::new()))
    }

    /// Create a session backed by `store`, loading any persisted revisions.
    ///
    /// A store that fails to load is logged and the session starts with an
    /// empty history. When revisions are loaded, the newest one is applied.
    #[must_use]
    pub fn with_store(
        mut catalog: Catalog,
        config: HistoryConfig,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        let revisions = match store.load() {
            Ok(revisions) => revisions,
            Err(e) => {
                tracing::warn!("Failed to load revision history, starting empty: {e}");
                Vec::new()
            }
        };
        tracing::info!("Loaded {} persisted revisions", revisions.len());

        for revision in &revisions {
            catalog.reserve_generated_id(&revision.template_id);
        }

        let mut state = Self {
            catalog,
            active: None,
            values: PropertyValueMap::new(),
            history: RevisionHistory::from_revisions(config, revisions),
            store,
            clock: system_clock,
            on_change: None,
            generation: 0,
        };
        if let Some(revision) = state.history.current().cloned() {
            state.apply(&revision);
        }
        state
    }

    /// Replace the clock used to stamp revisions.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the change notification callback.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn(&ComponentTemplate, &PropertyValueMap) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Select a template, resetting every property to its default.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::TemplateNotFound`] if `id` is not in the
    /// catalog. The state is left unchanged.
    pub fn select_template(&mut self, id: &str) -> StudioResult<()> {
        let Some(template) = self.catalog.get(id) else {
            tracing::warn!("Template not found: {id}");
            return Err(StudioError::TemplateNotFound(id.to_string()));
        };
        let description = format!("Switched to {}", template.name);
        self.supersede_generation();
        self.switch_to(id, description, RevisionKind::TemplateSwitch);
        Ok(())
    }

    fn switch_to(&mut self, id: &str, description: String, kind: RevisionKind) {
        let Some(template) = self.catalog.get(id) else {
            return;
        };
        self.values = template.schema.defaults();
        self.active = Some(id.to_string());
        tracing::debug!("Selected template {id}");

        self.commit(description, BTreeMap::new(), kind);
        self.notify();
        self.persist();
    }

    /// Set one property of the selected template.
    ///
    /// The value is stored as given; use
    /// [`PanelField::parse_input`](crate::PanelField::parse_input) to
    /// validate raw input first.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::NoSelection`] if no template is selected, or
    /// [`StudioError::PropertyNotFound`] if the template does not declare
    /// `name`. The state is left unchanged.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> StudioResult<()> {
        let template = self.active_template().ok_or_else(|| {
            tracing::warn!("Ignoring edit of '{name}': no template selected");
            StudioError::NoSelection
        })?;
        if !template.schema.contains(name) {
            tracing::warn!("Template {} has no property '{name}'", template.id);
            return Err(StudioError::PropertyNotFound(name.to_string()));
        }

        self.supersede_generation();
        let from = self.values.insert(name.to_string(), value.clone());
        let mut changed = BTreeMap::new();
        changed.insert(name.to_string(), FieldChange { from, to: value });

        self.commit(format!("Changed {name}"), changed, RevisionKind::PropertyEdit);
        self.notify();
        self.persist();
        Ok(())
    }

    /// Restore every property of the selected template to its default.
    ///
    /// Returns the number of fields that changed. Nothing is committed when
    /// the values already match the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::NoSelection`] if no template is selected.
    pub fn reset_properties(&mut self) -> StudioResult<usize> {
        let template = self.active_template().ok_or(StudioError::NoSelection)?;
        let defaults = template.schema.defaults();
        let changed = history::diff(&self.values, &defaults);
        if changed.is_empty() {
            return Ok(0);
        }

        let count = changed.len();
        self.supersede_generation();
        self.values = defaults;
        self.commit(
            format!("Reset {count} properties"),
            changed,
            RevisionKind::Reset,
        );
        self.notify();
        self.persist();
        Ok(count)
    }

    /// Step back one revision. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(revision) = self.history.undo().cloned() else {
            return false;
        };
        self.supersede_generation();
        self.apply(&revision);
        true
    }

    /// Step forward one revision. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(revision) = self.history.redo().cloned() else {
            return false;
        };
        self.supersede_generation();
        self.apply(&revision);
        true
    }

    /// Jump to the revision at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn restore(&mut self, index: usize) -> StudioResult<()> {
        let revision = self.history.restore(index)?.clone();
        self.supersede_generation();
        self.apply(&revision);
        Ok(())
    }

    /// Star the revision at `index`, protecting it from eviction.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn star(&mut self, index: usize) -> StudioResult<()> {
        self.history.star(index)?;
        self.persist();
        Ok(())
    }

    /// Remove the star from the revision at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::RevisionNotFound`] if `index` is out of range.
    pub fn unstar(&mut self, index: usize) -> StudioResult<()> {
        self.history.unstar(index)?;
        self.persist();
        Ok(())
    }

    /// Export the full revision history, stamped with `exported_at`.
    #[must_use]
    pub fn export(&self, exported_at: DateTime<Utc>) -> ExportDocument {
        let component = self
            .active_template()
            .map_or("component", |t| t.name.as_str());
        ExportDocument::new(component, &self.history, exported_at)
    }

    /// Property panel for the selected template.
    #[must_use]
    pub fn panel(&self) -> Option<Panel> {
        self.active_template()
            .map(|template| generate_panel(template, &self.values))
    }

    /// Start a generation request, superseding any request in flight.
    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.supersede_generation();
        tracing::debug!("Generation request {} started", self.generation);
        GenerationTicket(self.generation)
    }

    /// Apply the generator's response to the request identified by `ticket`.
    ///
    /// A ticket is superseded by a newer request and by any edit or
    /// navigation made while it was in flight. On success a template is inferred from the returned component, added
    /// to the `generated` category and selected. Returns its id.
    ///
    /// # Errors
    ///
    /// - [`StudioError::StaleGeneration`] if the ticket has been superseded
    /// - [`StudioError::Generation`] if the generator reported a failure or
    ///   returned no component
    /// - a parse error if the component's parameter list is malformed
    ///
    /// The state is unchanged on every error.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        request: &GenerationRequest,
        response: GenerationResponse,
    ) -> StudioResult<String> {
        if ticket.0 != self.generation {
            tracing::debug!(
                "Discarding stale generation response {} (current {})",
                ticket.0,
                self.generation
            );
            return Err(StudioError::StaleGeneration {
                ticket: ticket.0,
                current: self.generation,
            });
        }
        if !response.success {
            let error = response
                .error
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!("Component generation failed: {error}");
            return Err(StudioError::Generation(error));
        }
        let Some(body) = response.component else {
            return Err(StudioError::Generation(
                "response carried no component".to_string(),
            ));
        };

        let mut template = infer::template_from_source(
            String::new(),
            request.template_name(),
            request.description.clone(),
            &body,
        )?;
        template.id = self.catalog.next_generated_id();
        let id = template.id.clone();
        let description = format!("Generated {}", template.name);
        self.catalog.insert(template)?;
        tracing::info!(
            "Added generated template {id} (source: {})",
            response.source.as_deref().unwrap_or("unknown")
        );

        self.switch_to(&id, description, RevisionKind::Generated);
        Ok(id)
    }

    /// The only ticket that may currently complete.
    #[must_use]
    pub fn current_generation(&self) -> GenerationTicket {
        GenerationTicket(self.generation)
    }

    /// The template catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The selected template.
    #[must_use]
    pub fn active_template(&self) -> Option<&ComponentTemplate> {
        self.active.as_deref().and_then(|id| self.catalog.get(id))
    }

    /// Current property values of the selected template.
    #[must_use]
    pub fn values(&self) -> &PropertyValueMap {
        &self.values
    }

    /// The revision history.
    #[must_use]
    pub fn history(&self) -> &RevisionHistory {
        &self.history
    }

    fn commit(
        &mut self,
        description: String,
        changed_fields: BTreeMap<String, FieldChange>,
        kind: RevisionKind,
    ) {
        let Some(template_id) = self.active.clone() else {
            return;
        };
        let now = (self.clock)();
        self.history.commit(
            NewRevision {
                template_id,
                snapshot: self.values.clone(),
                description,
                changed_fields,
                kind,
            },
            now,
        );
    }

    /// Make `revision` the visible state without committing.
    fn apply(&mut self, revision: &Revision) {
        let Some(template) = self.catalog.get(&revision.template_id) else {
            tracing::warn!(
                "Revision {} refers to unknown template {}",
                revision.id,
                revision.template_id
            );
            return;
        };
        if !template.schema.matches(&revision.snapshot) {
            tracing::warn!(
                "Revision {} does not match the properties of {}",
                revision.id,
                revision.template_id
            );
            return;
        }
        self.active = Some(revision.template_id.clone());
        self.values = revision.snapshot.clone();
        self.notify();
    }

    fn supersede_generation(&mut self) {
        self.generation += 1;
    }

    fn notify(&self) {
        if let (Some(callback), Some(template)) = (&self.on_change, self.active_template()) {
            callback(template, &self.values);
        }
    }

    /// Write the revision list to the store. Failures are logged only.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(self.history.revisions()) {
            tracing::warn!("Failed to persist revision history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn frozen_clock() -> u64 {
        1_700_000_000_000
    }

    fn studio() -> StudioState {
        StudioState::new(Catalog::builtin(), HistoryConfig::default()).with_clock(frozen_clock)
    }

    fn text(value: &str) -> PropertyValue {
        PropertyValue::String(value.to_string())
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            description: "glowing card".into(),
            component_type: "card".into(),
            style: "modern".into(),
        }
    }

    #[test]
    fn select_template_applies_defaults() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");

        let template = state.active_template().expect("active");
        assert_eq!(state.values(), &template.schema.defaults());
        assert_eq!(state.values().get("text"), Some(&text("Click Me")));
        assert_eq!(state.history().len(), 1);
        assert_eq!(
            state.history().current().map(|r| r.kind),
            Some(RevisionKind::TemplateSwitch)
        );
    }

    #[test]
    fn unknown_template_leaves_state_unchanged() {
        let mut state = studio();
        state.select_template("card-profile").expect("select");
        let before = state.values().clone();

        let err = state.select_template("nope").expect_err("unknown");
        assert!(matches!(err, StudioError::TemplateNotFound(_)));
        assert_eq!(state.active_template().map(|t| t.id.as_str()), Some("card-profile"));
        assert_eq!(state.values(), &before);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn edit_then_undo_restores_default_text() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");

        let edit = state.history().current().expect("revision");
        assert_eq!(edit.changed_fields.len(), 1);
        assert_eq!(
            edit.changed_fields.get("text").and_then(|c| c.from.clone()),
            Some(text("Click Me"))
        );

        assert!(state.undo());
        assert_eq!(state.values().get("text"), Some(&text("Click Me")));
        assert!(state.redo());
        assert_eq!(state.values().get("text"), Some(&text("Buy Now")));
    }

    #[test]
    fn undo_across_template_switch_restores_previous_template() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");
        state.select_template("alert-banner").expect("select");

        assert!(state.undo());
        assert_eq!(
            state.active_template().map(|t| t.id.as_str()),
            Some("button-animated")
        );
        assert_eq!(state.values().get("text"), Some(&text("Buy Now")));
    }

    #[test]
    fn undo_with_single_revision_is_a_no_op() {
        let mut state = studio();
        assert!(!state.undo());
        state.select_template("button-animated").expect("select");
        assert!(!state.undo());
        assert!(!state.redo());
    }

    #[test]
    fn unknown_property_is_rejected() {
        let mut state = studio();
        assert!(matches!(
            state.set_property("text", text("x")),
            Err(StudioError::NoSelection)
        ));

        state.select_template("button-animated").expect("select");
        let err = state
            .set_property("missing", text("x"))
            .expect_err("unknown property");
        assert!(matches!(err, StudioError::PropertyNotFound(_)));
        assert!(!state.values().contains_key("missing"));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn reset_commits_only_changed_fields() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        assert_eq!(state.reset_properties().expect("reset"), 0);

        state.set_property("text", text("Buy Now")).expect("edit");
        state
            .set_property("rounded", PropertyValue::Checkbox(false))
            .expect("edit");
        assert_eq!(state.reset_properties().expect("reset"), 2);

        let revision = state.history().current().expect("revision");
        assert_eq!(revision.kind, RevisionKind::Reset);
        assert_eq!(revision.changed_fields.len(), 2);
        assert_eq!(state.values().get("text"), Some(&text("Click Me")));
    }

    #[test]
    fn restore_jumps_to_revision() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        for label in ["One", "Two", "Three"] {
            state.set_property("text", text(label)).expect("edit");
        }
        state.restore(1).expect("restore");
        assert_eq!(state.values().get("text"), Some(&text("One")));
        assert!(state.restore(99).is_err());
    }

    #[test]
    fn observer_is_notified_on_every_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut state = studio();
        let counter = Arc::clone(&calls);
        state.set_on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");
        state.undo();
        let _ = state.select_template("missing");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let store = MemoryHistoryStore::new();
        let mut state = StudioState::with_store(
            Catalog::builtin(),
            HistoryConfig::default(),
            Box::new(store.clone()),
        )
        .with_clock(frozen_clock);

        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");
        state.star(0).expect("star");

        let saved = store.snapshot();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].starred);
    }

    #[test]
    fn persistence_failure_keeps_memory_state() {
        let mut state = StudioState::with_store(
            Catalog::builtin(),
            HistoryConfig::default(),
            Box::new(MemoryHistoryStore::failing()),
        );
        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn loading_applies_newest_revision() {
        let store = MemoryHistoryStore::new();
        {
            let mut state = StudioState::with_store(
                Catalog::builtin(),
                HistoryConfig::default(),
                Box::new(store.clone()),
            );
            state.select_template("button-animated").expect("select");
            state.set_property("text", text("Buy Now")).expect("edit");
        }

        let state = StudioState::with_store(
            Catalog::builtin(),
            HistoryConfig::default(),
            Box::new(store),
        );
        assert_eq!(state.history().len(), 2);
        assert_eq!(
            state.active_template().map(|t| t.id.as_str()),
            Some("button-animated")
        );
        assert_eq!(state.values().get("text"), Some(&text("Buy Now")));
    }

    #[test]
    fn export_counts_every_revision() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        for n in 0..4 {
            state.set_property("text", text(&format!("v{n}"))).expect("edit");
        }
        state.undo();

        let doc = state.export(Utc::now());
        assert_eq!(doc.revisions.len(), 5);
        assert_eq!(doc.current_revision, 3);
        assert_eq!(doc.component, "Animated Button");
    }

    #[test]
    fn failed_generation_leaves_state_unchanged() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        let catalog_len = state.catalog().len();
        let values = state.values().clone();

        let ticket = state.begin_generation();
        let err = state
            .complete_generation(ticket, &request(), GenerationResponse::failure("timeout"))
            .expect_err("failure");

        assert!(matches!(err, StudioError::Generation(ref m) if m == "timeout"));
        assert_eq!(state.catalog().len(), catalog_len);
        assert_eq!(
            state.active_template().map(|t| t.id.as_str()),
            Some("button-animated")
        );
        assert_eq!(state.values(), &values);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn successful_generation_adds_and_selects_template() {
        let mut state = studio();
        let ticket = state.begin_generation();
        let response = GenerationResponse {
            success: true,
            component: Some(
                r##"({ title = "Hi", accent = "#ff0000" }) => <div style="color: {accent}">{title}</div>"##
                    .into(),
            ),
            source: Some("test".into()),
            error: None,
        };

        let id = state
            .complete_generation(ticket, &request(), response)
            .expect("generated");
        assert_eq!(id, "generated-1");

        let template = state.active_template().expect("active");
        assert_eq!(template.id, "generated-1");
        assert_eq!(template.name, "Glowing card");
        assert_eq!(state.values().get("title"), Some(&text("Hi")));
        assert_eq!(
            state.history().current().map(|r| r.kind),
            Some(RevisionKind::Generated)
        );
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut state = studio();
        let first = state.begin_generation();
        let second = state.begin_generation();
        let response = GenerationResponse {
            success: true,
            component: Some("<p>late</p>".into()),
            source: None,
            error: None,
        };

        let err = state
            .complete_generation(first, &request(), response)
            .expect_err("stale");
        assert!(matches!(err, StudioError::StaleGeneration { ticket: 1, current: 2 }));
        assert!(state.active_template().is_none());
        assert_eq!(state.current_generation(), second);
    }

    fn generated(component: &str) -> GenerationResponse {
        GenerationResponse {
            success: true,
            component: Some(component.into()),
            source: None,
            error: None,
        }
    }

    #[test]
    fn selection_during_generation_wins_over_late_response() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        let ticket = state.begin_generation();
        state.select_template("card-profile").expect("select");
        let catalog_len = state.catalog().len();

        let err = state
            .complete_generation(ticket, &request(), generated("<p>late</p>"))
            .expect_err("superseded");
        assert!(matches!(err, StudioError::StaleGeneration { .. }));
        assert_eq!(
            state.active_template().map(|t| t.id.as_str()),
            Some("card-profile")
        );
        assert_eq!(state.catalog().len(), catalog_len);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn edits_and_undo_supersede_generation() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");

        let ticket = state.begin_generation();
        state.set_property("text", text("Buy Now")).expect("edit");
        assert!(state
            .complete_generation(ticket, &request(), generated("<p>late</p>"))
            .is_err());

        let ticket = state.begin_generation();
        assert!(state.undo());
        assert!(state
            .complete_generation(ticket, &request(), generated("<p>late</p>"))
            .is_err());
        assert_eq!(state.values().get("text"), Some(&text("Click Me")));

        // Starring does not move the selection.
        let ticket = state.begin_generation();
        state.star(0).expect("star");
        assert!(state
            .complete_generation(ticket, &request(), generated("<p>ok</p>"))
            .is_ok());
    }

    #[test]
    fn editing_after_undo_keeps_starred_revision() {
        let mut state = studio();
        state.select_template("button-animated").expect("select");
        state.set_property("text", text("A")).expect("edit");
        state.star(1).expect("star");
        assert!(state.undo());
        state.set_property("text", text("B")).expect("edit");

        let starred: Vec<_> = state
            .history()
            .revisions()
            .iter()
            .filter(|r| r.starred)
            .map(|r| r.snapshot.get("text").cloned())
            .collect();
        assert_eq!(starred, vec![Some(text("A"))]);
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.values().get("text"), Some(&text("B")));
        assert!(!state.history().can_redo());
    }

    #[test]
    fn reloaded_session_does_not_reuse_generated_ids() {
        let store = MemoryHistoryStore::new();
        {
            let mut state = StudioState::with_store(
                Catalog::builtin(),
                HistoryConfig::default(),
                Box::new(store.clone()),
            );
            let ticket = state.begin_generation();
            let id = state
                .complete_generation(ticket, &request(), generated("({ title }) => <h1>{title}</h1>"))
                .expect("generated");
            assert_eq!(id, "generated-1");
        }

        let mut state = StudioState::with_store(
            Catalog::builtin(),
            HistoryConfig::default(),
            Box::new(store),
        );
        // The generated template itself did not survive the reload.
        assert!(state.active_template().is_none());

        let ticket = state.begin_generation();
        let id = state
            .complete_generation(ticket, &request(), generated("({ count = 1 }) => <p>{count}</p>"))
            .expect("generated");
        assert_eq!(id, "generated-2");
        let keys: Vec<_> = state.values().keys().cloned().collect();
        assert_eq!(keys, vec!["count".to_string()]);

        state.restore(0).expect("restore");
        assert_eq!(
            state.active_template().map(|t| t.id.as_str()),
            Some("generated-2")
        );
        assert_eq!(state.values().keys().count(), 1);
    }

    #[test]
    fn snapshot_not_matching_schema_is_not_applied() {
        let mut snapshot = PropertyValueMap::new();
        snapshot.insert("bogus".into(), text("x"));
        let revision = Revision {
            id: 1,
            template_id: "button-animated".into(),
            snapshot,
            description: "Changed bogus".into(),
            changed_fields: BTreeMap::new(),
            starred: false,
            kind: RevisionKind::PropertyEdit,
        };

        let state = StudioState::with_store(
            Catalog::builtin(),
            HistoryConfig::default(),
            Box::new(MemoryHistoryStore::with_revisions(vec![revision])),
        );
        assert_eq!(state.history().len(), 1);
        assert!(state.active_template().is_none());
        assert!(state.values().is_empty());
    }
}
