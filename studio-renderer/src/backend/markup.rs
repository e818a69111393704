//! Placeholder interpolation backend.
//!
//! Understands the `({ name = default, ... }) => markup` body form. Every
//! `{name}` in the markup is replaced by the HTML-escaped property value;
//! `{{` and `}}` produce literal braces.

use studio_core::{infer, PropertyValueMap};

use crate::{RenderError, RenderResult};

use super::RenderBackend;

/// Built-in backend that binds property values into markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupBackend;

impl MarkupBackend {
    /// Create a new markup backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for MarkupBackend {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn render(&self, body: &str, values: &PropertyValueMap) -> RenderResult<String> {
        let body = infer::split_body(body).map_err(|e| RenderError::Syntax(e.to_string()))?;
        let markup = body.markup;

        let mut out = String::with_capacity(markup.len());
        let mut rest = markup;
        while let Some(open) = rest.find(['{', '}']) {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                let offset = markup.len() - tail.len();
                return Err(RenderError::Syntax(format!(
                    "unmatched '}}' at byte {offset}"
                )));
            }

            let Some(close) = tail.find('}') else {
                let offset = markup.len() - tail.len();
                return Err(RenderError::Syntax(format!(
                    "unclosed '{{' at byte {offset}"
                )));
            };
            let name = tail[1..close].trim();
            let value = values
                .get(name)
                .ok_or_else(|| RenderError::UnboundParameter(name.to_string()))?;
            out.push_str(&escape_html(&value.to_string()));
            rest = &tail[close + 1..];
        }
        out.push_str(rest);

        tracing::trace!("Rendered {} bytes of markup", out.len());
        Ok(out)
    }
}

/// Escape text for inclusion in HTML content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
