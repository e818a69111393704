//! Rendering backend implementations.

pub mod markup;

use studio_core::PropertyValueMap;

use crate::RenderResult;

/// Trait for rendering backends.
///
/// A backend turns a template body plus the current property values into
/// markup that can be mounted in the preview container.
pub trait RenderBackend: Send {
    /// Short backend name for logs and status output.
    fn name(&self) -> &'static str;

    /// Render a template body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be parsed or references a value
    /// that is not bound.
    fn render(&self, body: &str, values: &PropertyValueMap) -> RenderResult<String>;
}
