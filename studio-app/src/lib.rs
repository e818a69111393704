//! # Component Studio WASM Application
//!
//! Browser bindings for the studio: the editing session from
//! `studio-core`, previews from `studio-renderer`, and the revision log
//! kept in `localStorage`.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web studio-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { StudioApp } from './pkg/studio_app.js';
//!
//! await init();
//! const app = new StudioApp('preview');
//! app.selectTemplate('button-animated');
//! app.setProperty('text', 'Buy Now');
//! app.render();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod storage;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use studio_core::{
    Catalog, Clock, GenerationRequest, GenerationResponse, GenerationTicket, HistoryConfig,
    HistoryStore, StudioState,
};
use studio_renderer::Preview;
use wasm_bindgen::prelude::*;

pub use storage::LocalStorageStore;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Component Studio WASM initialized");
}

/// Milliseconds since the epoch from the browser clock.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn browser_clock() -> u64 {
    js_sys::Date::now() as u64
}

/// A studio session bound to a preview container element.
#[wasm_bindgen]
pub struct StudioApp {
    container_id: String,
    studio: StudioState,
    preview: Arc<Mutex<Preview>>,
}

#[wasm_bindgen]
impl StudioApp {
    /// Create a session that mounts previews into the element `container_id`.
    ///
    /// Revisions saved by an earlier session are restored from
    /// `localStorage`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(container_id: &str) -> StudioApp {
        Self::with_store(
            container_id,
            Box::new(LocalStorageStore::new()),
            browser_clock,
        )
    }

    /// Select a template, resetting its properties to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error message if the template does not exist.
    #[wasm_bindgen(js_name = selectTemplate)]
    pub fn select_template(&mut self, id: &str) -> Result<(), String> {
        self.studio.select_template(id).map_err(|e| e.to_string())
    }

    /// Set a property from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error message if nothing is selected, the property is
    /// unknown, or the input does not fit the property's control.
    #[wasm_bindgen(js_name = setProperty)]
    pub fn set_property(&mut self, name: &str, raw: &str) -> Result<(), String> {
        let panel = self.studio.panel().ok_or("No template selected")?;
        let field = panel
            .field(name)
            .ok_or_else(|| format!("Property not found: {name}"))?;
        let value = field.parse_input(raw).map_err(|e| e.to_string())?;
        self.studio
            .set_property(name, value)
            .map_err(|e| e.to_string())
    }

    /// Reset every property to its default. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error message if nothing is selected.
    #[wasm_bindgen(js_name = resetProperties)]
    pub fn reset_properties(&mut self) -> Result<usize, String> {
        self.studio.reset_properties().map_err(|e| e.to_string())
    }

    /// Step back one revision.
    pub fn undo(&mut self) -> bool {
        self.studio.undo()
    }

    /// Step forward one revision.
    pub fn redo(&mut self) -> bool {
        self.studio.redo()
    }

    /// Jump to the revision at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error message if `index` is out of range.
    pub fn restore(&mut self, index: usize) -> Result<(), String> {
        self.studio.restore(index).map_err(|e| e.to_string())
    }

    /// Star the revision at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error message if `index` is out of range.
    pub fn star(&mut self, index: usize) -> Result<(), String> {
        self.studio.star(index).map_err(|e| e.to_string())
    }

    /// Remove the star from the revision at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error message if `index` is out of range.
    pub fn unstar(&mut self, index: usize) -> Result<(), String> {
        self.studio.unstar(index).map_err(|e| e.to_string())
    }

    /// Whether undo is possible.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.studio.history().can_undo()
    }

    /// Whether redo is possible.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.studio.history().can_redo()
    }

    /// Id of the selected template, if any.
    #[wasm_bindgen(js_name = activeTemplate)]
    #[must_use]
    pub fn active_template(&self) -> Option<String> {
        self.studio.active_template().map(|t| t.id.clone())
    }

    /// The property panel for the selected template as JSON, or `null`.
    #[wasm_bindgen(js_name = panelJson)]
    #[must_use]
    pub fn panel_json(&self) -> String {
        serde_json::to_string(&self.studio.panel()).unwrap_or_default()
    }

    /// Catalog entries as JSON.
    #[wasm_bindgen(js_name = catalogJson)]
    #[must_use]
    pub fn catalog_json(&self) -> String {
        serde_json::to_string(&self.studio.catalog().entries()).unwrap_or_default()
    }

    /// Revision list as JSON.
    #[wasm_bindgen(js_name = historyJson)]
    #[must_use]
    pub fn history_json(&self) -> String {
        serde_json::to_string(self.studio.history().revisions()).unwrap_or_default()
    }

    /// Export document for download.
    ///
    /// # Errors
    ///
    /// Returns an error message if serialization fails.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, String> {
        self.studio
            .export(Utc::now())
            .to_json()
            .map_err(|e| e.to_string())
    }

    /// Suggested file name for [`StudioApp::export_json`].
    #[wasm_bindgen(js_name = exportFileName)]
    #[must_use]
    pub fn export_file_name(&self) -> String {
        self.studio.export(Utc::now()).file_name()
    }

    /// Latest preview as mountable HTML. Empty before the first selection.
    #[wasm_bindgen(js_name = previewHtml)]
    #[must_use]
    pub fn preview_html(&self) -> String {
        self.preview
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .output()
            .map(studio_renderer::PreviewOutput::to_html)
            .unwrap_or_default()
    }

    /// Mount the latest preview into the container element.
    ///
    /// # Errors
    ///
    /// Returns an error if the document or container is missing.
    pub fn render(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;
        let container = document
            .get_element_by_id(&self.container_id)
            .ok_or_else(|| {
                JsValue::from_str(&format!("Container element '{}' not found", self.container_id))
            })?;

        container.set_inner_html(&self.preview_html());
        Ok(())
    }

    /// Start a generation request. Pass the returned ticket to
    /// `completeGeneration` once the AI service answers.
    #[wasm_bindgen(js_name = beginGeneration)]
    pub fn begin_generation(&mut self) -> u64 {
        self.studio.begin_generation().0
    }

    /// Apply an AI service response. Returns the new template id.
    ///
    /// # Errors
    ///
    /// Returns an error message if either JSON body is malformed, the
    /// ticket has been superseded, or the service reported a failure.
    #[wasm_bindgen(js_name = completeGeneration)]
    pub fn complete_generation(
        &mut self,
        ticket: u64,
        request_json: &str,
        response_json: &str,
    ) -> Result<String, String> {
        let request: GenerationRequest =
            serde_json::from_str(request_json).map_err(|e| e.to_string())?;
        let response: GenerationResponse =
            serde_json::from_str(response_json).map_err(|e| e.to_string())?;
        self.studio
            .complete_generation(GenerationTicket(ticket), &request, response)
            .map_err(|e| e.to_string())
    }
}

impl StudioApp {
    /// Create a session over an explicit store and clock.
    #[must_use]
    pub fn with_store(container_id: &str, store: Box<dyn HistoryStore>, clock: Clock) -> Self {
        let mut studio = StudioState::with_store(Catalog::builtin(), HistoryConfig::default(), store)
            .with_clock(clock);
        let preview = Arc::new(Mutex::new(Preview::default()));

        if let Some(template) = studio.active_template() {
            preview
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .render(template, studio.values());
        }

        let sink = Arc::clone(&preview);
        studio.set_on_change(move |template, values| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .render(template, values);
        });

        Self {
            container_id: container_id.to_string(),
            studio,
            preview,
        }
    }

    /// The underlying session.
    #[must_use]
    pub fn studio(&self) -> &StudioState {
        &self.studio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::MemoryHistoryStore;

    fn fixed_clock() -> u64 {
        1_700_000_000_000
    }

    fn app() -> StudioApp {
        StudioApp::with_store("preview", Box::new(MemoryHistoryStore::new()), fixed_clock)
    }

    #[test]
    fn preview_is_empty_before_selection() {
        let app = app();
        assert!(app.preview_html().is_empty());
        assert_eq!(app.panel_json(), "null");
        assert_eq!(app.active_template(), None);
    }

    #[test]
    fn raw_edits_update_preview_and_undo() {
        let mut app = app();
        app.select_template("button-animated").expect("select");
        assert!(app.preview_html().contains("Click Me"));

        app.set_property("text", "Buy Now").expect("edit");
        assert!(app.preview_html().contains("Buy Now"));
        assert!(app.can_undo());

        assert!(app.undo());
        assert!(app.preview_html().contains("Click Me"));
        assert!(app.can_redo());
    }

    #[test]
    fn invalid_raw_input_is_rejected() {
        let mut app = app();
        app.select_template("button-animated").expect("select");
        assert!(app.set_property("size", "huge").is_err());
        assert!(app.set_property("missing", "x").is_err());
        assert_eq!(app.studio().history().len(), 1);
    }

    #[test]
    fn unknown_template_is_an_error() {
        let mut app = app();
        let err = app.select_template("nope").expect_err("should fail");
        assert!(err.contains("nope"));
    }

    #[test]
    fn restored_session_has_a_preview() {
        let store = MemoryHistoryStore::new();
        {
            let mut first =
                StudioApp::with_store("preview", Box::new(store.clone()), fixed_clock);
            first.select_template("card-profile").expect("select");
        }

        let second = StudioApp::with_store("preview", Box::new(store), fixed_clock);
        assert_eq!(second.active_template().as_deref(), Some("card-profile"));
        assert!(!second.preview_html().is_empty());
    }

    #[test]
    fn export_uses_selected_template_name() {
        let mut app = app();
        app.select_template("alert-banner").expect("select");
        app.star(0).expect("star");

        let export: serde_json::Value =
            serde_json::from_str(&app.export_json().expect("export")).expect("json");
        assert_eq!(export["component"], "Alert Banner");
        assert_eq!(export["revisions"][0]["starred"], true);
        assert_eq!(app.export_file_name(), "alert-banner-revisions.json");
    }

    #[test]
    fn generation_round_trip_through_json() {
        let mut app = app();
        let stale = app.begin_generation();
        let ticket = app.begin_generation();

        let request = r#"{"description": "soft badge"}"#;
        let response = r#"{"success": true, "component": "({ label = \"New\" }) => <span>{label}</span>"}"#;

        assert!(app.complete_generation(stale, request, response).is_err());
        let id = app
            .complete_generation(ticket, request, response)
            .expect("generate");
        assert_eq!(id, "generated-1");
        assert!(app.preview_html().contains("New"));
    }

    #[test]
    fn catalog_json_lists_builtins() {
        let catalog: serde_json::Value =
            serde_json::from_str(&app().catalog_json()).expect("json");
        assert_eq!(catalog.as_array().map(Vec::len), Some(11));
    }
}
