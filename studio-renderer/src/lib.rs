//! # Component Studio Renderer
//!
//! Produces the live preview for the selected template.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Preview                    │
//! │   catches backend errors and panics,        │
//! │   keeps only the latest output              │
//! ├─────────────────────────────────────────────┤
//! │            RenderBackend trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ MarkupBackend        │ external backends    │
//! │ ({name} binding)     │ (JSX runtimes, ...)  │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use studio_core::{ComponentTemplate, PropertyValueMap};

pub use backend::markup::{escape_html, MarkupBackend};
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};

/// Result of rendering one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewOutput {
    /// The template rendered; `markup` replaces the container contents.
    Mounted {
        /// Rendered template.
        template_id: String,
        /// Markup to mount.
        markup: String,
    },
    /// Rendering failed; the container shows an error panel instead.
    Error {
        /// Template that failed.
        template_id: String,
        /// Failure description.
        message: String,
    },
}

impl PreviewOutput {
    /// Template this output belongs to.
    #[must_use]
    pub fn template_id(&self) -> &str {
        match self {
            Self::Mounted { template_id, .. } | Self::Error { template_id, .. } => template_id,
        }
    }

    /// Whether rendering failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// HTML to place in the preview container.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Mounted { markup, .. } => markup.clone(),
            Self::Error {
                template_id,
                message,
            } => format!(
                "<div class=\"preview-error\" role=\"alert\">\
                 <strong>Failed to render {}</strong>\
                 <pre>{}</pre>\
                 </div>",
                escape_html(template_id),
                escape_html(message)
            ),
        }
    }
}

/// Live preview of the selected template.
pub struct Preview {
    backend: Box<dyn RenderBackend>,
    output: Option<PreviewOutput>,
    render_count: u64,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("backend", &self.backend.name())
            .field("output", &self.output)
            .field("render_count", &self.render_count)
            .finish()
    }
}

impl Default for Preview {
    fn default() -> Self {
        Self::new(Box::new(MarkupBackend::new()))
    }
}

impl Preview {
    /// Create a preview using `backend`.
    #[must_use]
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            output: None,
            render_count: 0,
        }
    }

    /// Render `template` with `values`, replacing the previous output.
    ///
    /// Backend errors and panics are caught and turned into
    /// [`PreviewOutput::Error`].
    pub fn render(
        &mut self,
        template: &ComponentTemplate,
        values: &PropertyValueMap,
    ) -> &PreviewOutput {
        let backend = &self.backend;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            backend.render(&template.body, values)
        }));

        let output = match result {
            Ok(Ok(markup)) => PreviewOutput::Mounted {
                template_id: template.id.clone(),
                markup,
            },
            Ok(Err(e)) => {
                tracing::warn!("Preview of {} failed: {e}", template.id);
                PreviewOutput::Error {
                    template_id: template.id.clone(),
                    message: e.to_string(),
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("Render backend panicked on {}: {message}", template.id);
                PreviewOutput::Error {
                    template_id: template.id.clone(),
                    message: format!("renderer panicked: {message}"),
                }
            }
        };

        self.render_count += 1;
        self.output.insert(output)
    }

    /// The latest output, if anything has been rendered.
    #[must_use]
    pub fn output(&self) -> Option<&PreviewOutput> {
        self.output.as_ref()
    }

    /// Clear the preview.
    pub fn clear(&mut self) {
        self.output = None;
    }

    /// Number of renders performed.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
