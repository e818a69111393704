//! Component template definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PropertySchema, StudioResult};

/// Library category a template is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Buttons and call-to-action controls.
    Buttons,
    /// Content cards.
    Cards,
    /// Forms and inputs.
    Forms,
    /// Navigation bars, breadcrumbs, menus.
    Navigation,
    /// Alerts, progress and status indicators.
    Feedback,
    /// Page sections and layout blocks.
    Layout,
    /// Templates produced by the AI generator.
    Generated,
}

impl TemplateCategory {
    /// All categories in library display order.
    pub const ALL: [Self; 7] = [
        Self::Buttons,
        Self::Cards,
        Self::Forms,
        Self::Navigation,
        Self::Feedback,
        Self::Layout,
        Self::Generated,
    ];

    /// Lowercase category name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buttons => "buttons",
            Self::Cards => "cards",
            Self::Forms => "forms",
            Self::Navigation => "navigation",
            Self::Feedback => "feedback",
            Self::Layout => "layout",
            Self::Generated => "generated",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, parameterized UI component definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Library category.
    pub category: TemplateCategory,
    /// Short description shown in the library.
    #[serde(default)]
    pub description: String,
    /// Renderable body handed to the render backend.
    pub body: String,
    /// Editable properties.
    #[serde(default)]
    pub schema: PropertySchema,
}

impl ComponentTemplate {
    /// Create a template with an empty schema.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: TemplateCategory,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
            body: body.into(),
            schema: PropertySchema::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the property schema.
    #[must_use]
    pub fn with_schema(mut self, schema: PropertySchema) -> Self {
        self.schema = schema;
        self
    }

    /// Check the template's schema invariants.
    ///
    /// # Errors
    ///
    /// Returns the first invalid descriptor error.
    pub fn validate(&self) -> StudioResult<()> {
        self.schema.validate()
    }
}
