//! The template library.
//!
//! A [`Catalog`] is loaded once with the built-in templates and is read-only
//! afterwards, except for the `generated` category that the AI bridge
//! appends to.

use serde::Serialize;

use crate::builtin;
use crate::{ComponentTemplate, StudioError, StudioResult, TemplateCategory};

/// Ordered collection of component templates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    templates: Vec<ComponentTemplate>,
    #[serde(skip)]
    generated_count: u64,
}

/// Library listing entry, without the template body.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry<'a> {
    /// Template id.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Library category.
    pub category: TemplateCategory,
    /// Short description.
    pub description: &'a str,
    /// Number of editable properties.
    pub property_count: usize,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the built-in template library.
    ///
    /// A built-in definition that fails validation is logged and skipped.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for build in builtin::TEMPLATES {
            match build().and_then(|template| catalog.insert(template)) {
                Ok(()) => {}
                Err(e) => tracing::error!("Skipping built-in template: {e}"),
            }
        }
        tracing::debug!("Loaded {} built-in templates", catalog.len());
        catalog
    }

    /// Add a template.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::DuplicateTemplate`] if the id is taken, or the
    /// schema validation error if the template's schema is invalid.
    pub fn insert(&mut self, template: ComponentTemplate) -> StudioResult<()> {
        if self.contains(&template.id) {
            return Err(StudioError::DuplicateTemplate(template.id));
        }
        template.validate()?;
        self.templates.push(template);
        Ok(())
    }

    /// Reserve the next id for a generated template.
    pub fn next_generated_id(&mut self) -> String {
        loop {
            self.generated_count += 1;
            let id = format!("generated-{}", self.generated_count);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Keep [`next_generated_id`](Self::next_generated_id) from handing out
    /// `id` again. Ids outside the `generated-<n>` scheme are ignored.
    pub fn reserve_generated_id(&mut self, id: &str) {
        if let Some(n) = id
            .strip_prefix("generated-")
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.generated_count = self.generated_count.max(n);
        }
    }

    /// Look up a template by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComponentTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Whether a template with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.templates.iter().any(|t| t.id == id)
    }

    /// Iterate templates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentTemplate> {
        self.templates.iter()
    }

    /// Templates in one category.
    pub fn by_category(
        &self,
        category: TemplateCategory,
    ) -> impl Iterator<Item = &ComponentTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Categories that have at least one template, in library order.
    #[must_use]
    pub fn categories(&self) -> Vec<TemplateCategory> {
        TemplateCategory::ALL
            .into_iter()
            .filter(|c| self.templates.iter().any(|t| t.category == *c))
            .collect()
    }

    /// Case-insensitive search over id, name and description.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ComponentTemplate> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.templates.iter().collect();
        }
        self.templates
            .iter()
            .filter(|t| {
                t.id.to_lowercase().contains(&needle)
                    || t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Listing entries for the library view.
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry<'_>> {
        self.templates
            .iter()
            .map(|t| CatalogEntry {
                id: &t.id,
                name: &t.name,
                category: t.category,
                description: &t.description,
                property_count: t.schema.len(),
            })
            .collect()
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
