//! # Component Studio Server Library
//!
//! Shared types and the API router for the studio server.
//! This library is used by both the binary and integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    routing::{get, post},
    Router,
};
use studio_core::StudioState;
use studio_renderer::Preview;

pub mod config;
pub mod error;
pub mod generator;
pub mod health;
pub mod routes;

pub use config::{CliArgs, ServerConfig};
pub use error::ApiError;
pub use generator::{GeneratorClient, GeneratorError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The editing session. Every mutation happens under this lock.
    pub studio: Arc<tokio::sync::Mutex<StudioState>>,
    /// Latest preview, re-rendered on every session change.
    pub preview: Arc<Mutex<Preview>>,
    /// Optional AI generator client.
    pub generator: Option<GeneratorClient>,
}

impl AppState {
    /// Wrap a session, wiring its change notifications to the preview.
    #[must_use]
    pub fn new(mut studio: StudioState, generator: Option<GeneratorClient>) -> Self {
        let preview = Arc::new(Mutex::new(Preview::default()));

        // A session restored from disk already has a selection.
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
            studio: Arc::new(tokio::sync::Mutex::new(studio)),
            preview,
            generator,
        }
    }

    /// Get a reference to the optional generator client.
    #[must_use]
    pub fn generator(&self) -> Option<&GeneratorClient> {
        self.generator.as_ref()
    }
}

/// Build the API and health router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (Kubernetes probes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        // Library
        .route("/api/catalog", get(routes::list_catalog))
        .route("/api/catalog/{id}", get(routes::get_template))
        // Selection and editing
        .route("/api/select", post(routes::select_template))
        .route("/api/property", post(routes::set_property))
        .route("/api/reset", post(routes::reset_properties))
        .route("/api/panel", get(routes::get_panel))
        .route("/api/preview", get(routes::get_preview))
        .route("/api/state", get(routes::get_state))
        // History
        .route("/api/undo", post(routes::undo))
        .route("/api/redo", post(routes::redo))
        .route("/api/history", get(routes::get_history))
        .route("/api/history/{index}/restore", post(routes::restore_revision))
        .route(
            "/api/history/{index}/star",
            post(routes::star_revision).delete(routes::unstar_revision),
        )
        .route("/api/export", get(routes::export_history))
        // AI bridge
        .route("/api/generate", post(routes::generate))
        .route("/api/enhance", post(routes::enhance))
        .with_state(state)
}
