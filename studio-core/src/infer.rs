//! Best-effort property inference for component source.
//!
//! Generated components arrive as `({ name = default, ... }) => markup`
//! source with no schema. The default values in the parameter list are
//! classified into property kinds to build one.

use regex::Regex;

use crate::{
    ComponentTemplate, PropertyDescriptor, PropertySchema, StudioError, StudioResult,
    TemplateCategory,
};

/// A component body split into its parameter list and markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBody<'a> {
    /// Text between `({` and `})`, if the body declares parameters.
    pub params: Option<&'a str>,
    /// Markup to render.
    pub markup: &'a str,
}

/// One declared parameter and its raw default expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefault {
    /// Parameter name.
    pub name: String,
    /// Default expression as written, if any.
    pub raw: Option<String>,
}

/// Kind inferred from a default value, carrying the parsed default.
#[derive(Debug, Clone, PartialEq)]
pub enum InferredKind {
    /// Plain text.
    String(String),
    /// CSS color literal.
    Color(String),
    /// Boolean literal.
    Boolean(bool),
    /// Numeric literal.
    Number(f64),
}

impl InferredKind {
    /// Descriptor for a property of this kind.
    #[must_use]
    pub fn into_descriptor(self) -> PropertyDescriptor {
        match self {
            Self::String(s) => PropertyDescriptor::string(s).in_section("Content"),
            Self::Color(c) => PropertyDescriptor::color(c).in_section("Colors"),
            Self::Boolean(b) => PropertyDescriptor::checkbox(b).in_section("Options"),
            Self::Number(n) => PropertyDescriptor::number(n).in_section("Dimensions"),
        }
    }
}

/// Split a body into its parameter list and markup. Bodies without a
/// `({ ... }) =>` header are treated as bare markup.
///
/// # Errors
///
/// Returns [`StudioError::Parse`] if the header pattern cannot be compiled.
pub fn split_body(body: &str) -> StudioResult<ComponentBody<'_>> {
    let header = Regex::new(r"(?s)^\s*\(\s*\{(?P<params>.*?)\}\s*\)\s*=>\s*(?P<markup>.*)$")
        .map_err(|e| StudioError::Parse(format!("header pattern: {e}")))?;

    let Some(captures) = header.captures(body) else {
        return Ok(ComponentBody {
            params: None,
            markup: body.trim(),
        });
    };

    let params = captures.name("params").map(|m| m.as_str());
    let mut markup = captures.name("markup").map_or("", |m| m.as_str()).trim();
    // Arrow bodies are often wrapped in parentheses.
    if markup.starts_with('(') && markup.ends_with(')') {
        markup = markup[1..markup.len() - 1].trim();
    }

    Ok(ComponentBody { params, markup })
}

/// Declared parameters of a component body, in order.
///
/// # Errors
///
/// Returns [`StudioError::Parse`] if a parameter is not a valid identifier.
pub fn extract_defaults(source: &str) -> StudioResult<Vec<ParamDefault>> {
    let Some(params) = split_body(source)?.params else {
        return Ok(Vec::new());
    };

    let item = Regex::new(r"(?s)^(?P<name>[A-Za-z_$][\w$]*)\s*(?:=\s*(?P<value>.+))?$")
        .map_err(|e| StudioError::Parse(format!("parameter pattern: {e}")))?;

    split_params(params)
        .into_iter()
        .map(|part| {
            let captures = item
                .captures(part)
                .ok_or_else(|| StudioError::Parse(format!("invalid parameter: {part}")))?;
            Ok(ParamDefault {
                name: captures["name"].to_string(),
                raw: captures.name("value").map(|v| v.as_str().trim().to_string()),
            })
        })
        .collect()
}

/// Split a parameter list on top-level commas.
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in params.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Classify a raw default expression.
#[must_use]
pub fn classify(raw: &str) -> InferredKind {
    let raw = raw.trim();
    if let Some(text) = unquote(raw) {
        return if is_color(text) {
            InferredKind::Color(text.to_string())
        } else {
            InferredKind::String(text.to_string())
        };
    }

    match raw {
        "true" => InferredKind::Boolean(true),
        "false" => InferredKind::Boolean(false),
        _ => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or_else(|| InferredKind::String(raw.to_string()), InferredKind::Number),
    }
}

fn unquote(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if first == last && matches!(first, '"' | '\'' | '`') {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

fn is_color(text: &str) -> bool {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = text.to_ascii_lowercase();
    ["rgb(", "rgba(", "hsl(", "hsla("]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
        && lower.ends_with(')')
}

/// Build a property schema from a body's parameter defaults.
///
/// Parameters without a default become empty text properties.
///
/// # Errors
///
/// Returns [`StudioError::Parse`] for malformed parameter lists, or a
/// descriptor error for duplicate parameter names.
pub fn infer_schema(source: &str) -> StudioResult<PropertySchema> {
    let mut schema = PropertySchema::new();
    for param in extract_defaults(source)? {
        let kind = param
            .raw
            .as_deref()
            .map_or_else(|| InferredKind::String(String::new()), classify);
        schema.insert(param.name, kind.into_descriptor())?;
    }
    Ok(schema)
}

/// Build a `generated` template from component source.
///
/// # Errors
///
/// Returns an error if the source's parameter list cannot be parsed.
pub fn template_from_source(
    id: impl Into<String>,
    name: impl Into<String>,
    description: impl Into<String>,
    source: &str,
) -> StudioResult<ComponentTemplate> {
    let schema = infer_schema(source)?;
    Ok(
        ComponentTemplate::new(id, name, TemplateCategory::Generated, source)
            .with_description(description)
            .with_schema(schema),
    )
}
