//! Typed component properties: kinds, values, descriptors and schemas.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{StudioError, StudioResult};

/// Section used when a descriptor does not name one.
pub const DEFAULT_SECTION: &str = "General";

/// Current value of every property of the selected template, keyed by name.
pub type PropertyValueMap = BTreeMap<String, PropertyValue>;

/// The kind of editor a property is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Single-line free text.
    String,
    /// Multi-line free text.
    Text,
    /// CSS color.
    Color,
    /// One of a fixed list of options.
    Select,
    /// Boolean toggle.
    Checkbox,
    /// Numeric value.
    Number,
}

impl PropertyKind {
    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Color => "color",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value, tagged with the kind it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// Single-line text.
    String(String),
    /// Multi-line text.
    Text(String),
    /// CSS color string.
    Color(String),
    /// Selected option.
    Select(String),
    /// Boolean toggle.
    Checkbox(bool),
    /// Number.
    Number(f64),
}

impl PropertyValue {
    /// The kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::Text(_) => PropertyKind::Text,
            Self::Color(_) => PropertyKind::Color,
            Self::Select(_) => PropertyKind::Select,
            Self::Checkbox(_) => PropertyKind::Checkbox,
            Self::Number(_) => PropertyKind::Number,
        }
    }

    /// Borrow the textual payload, if this is a text-like value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Text(s) | Self::Color(s) | Self::Select(s) => Some(s),
            Self::Checkbox(_) | Self::Number(_) => None,
        }
    }

    /// The boolean payload of a checkbox value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Checkbox(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Text(s) | Self::Color(s) | Self::Select(s) => f.write_str(s),
            Self::Checkbox(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Declaration of one editable property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Editor kind.
    pub kind: PropertyKind,
    /// Value used when the template is selected.
    pub default: PropertyValue,
    /// Allowed values, for `select` properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Panel group this property is shown in.
    #[serde(default = "default_section")]
    pub section: String,
    /// Human readable label; the property name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

impl PropertyDescriptor {
    fn with_default(kind: PropertyKind, default: PropertyValue) -> Self {
        Self {
            kind,
            default,
            options: Vec::new(),
            section: default_section(),
            label: None,
        }
    }

    /// Single-line text property.
    #[must_use]
    pub fn string(default: impl Into<String>) -> Self {
        Self::with_default(PropertyKind::String, PropertyValue::String(default.into()))
    }

    /// Multi-line text property.
    #[must_use]
    pub fn text(default: impl Into<String>) -> Self {
        Self::with_default(PropertyKind::Text, PropertyValue::Text(default.into()))
    }

    /// Color property.
    #[must_use]
    pub fn color(default: impl Into<String>) -> Self {
        Self::with_default(PropertyKind::Color, PropertyValue::Color(default.into()))
    }

    /// Boolean property.
    #[must_use]
    pub fn checkbox(default: bool) -> Self {
        Self::with_default(PropertyKind::Checkbox, PropertyValue::Checkbox(default))
    }

    /// Numeric property.
    #[must_use]
    pub fn number(default: f64) -> Self {
        Self::with_default(PropertyKind::Number, PropertyValue::Number(default))
    }

    /// Select property. `default` must be one of `options`; this is checked
    /// when the descriptor is added to a [`PropertySchema`].
    #[must_use]
    pub fn select<I, S>(options: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut descriptor =
            Self::with_default(PropertyKind::Select, PropertyValue::Select(default.into()));
        descriptor.options = options.into_iter().map(Into::into).collect();
        descriptor
    }

    /// Place the property in a panel section.
    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Give the property a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check the descriptor invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidDescriptor`] if the default's kind does not
    /// match, or a select default is not one of its options.
    pub fn validate(&self, name: &str) -> StudioResult<()> {
        let invalid = |reason: String| StudioError::InvalidDescriptor {
            name: name.to_string(),
            reason,
        };

        if self.default.kind() != self.kind {
            return Err(invalid(format!(
                "default is a {} value but kind is {}",
                self.default.kind(),
                self.kind
            )));
        }

        if self.kind == PropertyKind::Select {
            if self.options.is_empty() {
                return Err(invalid("select property has no options".to_string()));
            }
            let default = self.default.as_str().unwrap_or_default();
            if !self.options.iter().any(|o| o == default) {
                return Err(invalid(format!("default '{default}' is not an option")));
            }
        } else if !self.options.is_empty() {
            return Err(invalid(format!("options given for {} property", self.kind)));
        }

        Ok(())
    }
}

/// One named entry of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Property name.
    pub name: String,
    /// Property declaration.
    #[serde(flatten)]
    pub descriptor: PropertyDescriptor,
}

/// Ordered set of named property descriptors.
///
/// Deserialization validates every entry, so a schema read from JSON upholds
/// the same invariants as one built with [`PropertySchema::from_entries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SchemaEntry>", into = "Vec<SchemaEntry>")]
pub struct PropertySchema {
    entries: Vec<SchemaEntry>,
}

impl PropertySchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, descriptor)` pairs, validating each.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidDescriptor`] on the first invalid or
    /// duplicate entry.
    pub fn from_entries<I, N>(entries: I) -> StudioResult<Self>
    where
        I: IntoIterator<Item = (N, PropertyDescriptor)>,
        N: Into<String>,
    {
        let mut schema = Self::new();
        for (name, descriptor) in entries {
            schema.insert(name, descriptor)?;
        }
        Ok(schema)
    }

    /// Append a property.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidDescriptor`] if the descriptor is invalid
    /// or the name is already declared.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        descriptor: PropertyDescriptor,
    ) -> StudioResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(StudioError::InvalidDescriptor {
                name,
                reason: "duplicate property name".to_string(),
            });
        }
        descriptor.validate(&name)?;
        self.entries.push(SchemaEntry { name, descriptor });
        Ok(())
    }

    /// Check every entry's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`StudioError::InvalidDescriptor`] found.
    pub fn validate(&self) -> StudioResult<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(StudioError::InvalidDescriptor {
                    name: entry.name.clone(),
                    reason: "duplicate property name".to_string(),
                });
            }
            entry.descriptor.validate(&entry.name)?;
        }
        Ok(())
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.descriptor)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDescriptor)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), &e.descriptor))
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default value for every declared property.
    #[must_use]
    pub fn defaults(&self) -> PropertyValueMap {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.descriptor.default.clone()))
            .collect()
    }

    /// Whether `values` holds exactly the declared property names.
    #[must_use]
    pub fn matches(&self, values: &PropertyValueMap) -> bool {
        values.len() == self.entries.len() && values.keys().all(|name| self.contains(name))
    }
}

impl TryFrom<Vec<SchemaEntry>> for PropertySchema {
    type Error = StudioError;

    fn try_from(entries: Vec<SchemaEntry>) -> StudioResult<Self> {
        Self::from_entries(entries.into_iter().map(|e| (e.name, e.descriptor)))
    }
}

impl From<PropertySchema> for Vec<SchemaEntry> {
    fn from(schema: PropertySchema) -> Self {
        schema.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_default_must_be_an_option() {
        let ok = PropertyDescriptor::select(["sm", "md", "lg"], "md");
        assert!(ok.validate("size").is_ok());

        let bad = PropertyDescriptor::select(["sm", "md", "lg"], "xl");
        let err = bad.validate("size").expect_err("xl is not an option");
        assert!(err.to_string().contains("xl"));
    }

    #[test]
    fn select_without_options_is_rejected() {
        let bad = PropertyDescriptor::select(Vec::<String>::new(), "a");
        assert!(bad.validate("variant").is_err());
    }

    #[test]
    fn mismatched_default_kind_is_rejected() {
        let mut descriptor = PropertyDescriptor::color("#fff");
        descriptor.default = PropertyValue::Checkbox(true);
        assert!(descriptor.validate("bg").is_err());
    }

    #[test]
    fn schema_rejects_duplicate_names() {
        let result = PropertySchema::from_entries([
            ("text", PropertyDescriptor::string("a")),
            ("text", PropertyDescriptor::string("b")),
        ]);
        assert!(matches!(
            result,
            Err(StudioError::InvalidDescriptor { ref name, .. }) if name == "text"
        ));
    }

    #[test]
    fn schema_preserves_declaration_order() {
        let schema = PropertySchema::from_entries([
            ("zeta", PropertyDescriptor::string("z")),
            ("alpha", PropertyDescriptor::checkbox(false)),
            ("mid", PropertyDescriptor::number(3.0)),
        ])
        .expect("valid schema");

        let names: Vec<_> = schema.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn defaults_cover_every_property() {
        let schema = PropertySchema::from_entries([
            ("text", PropertyDescriptor::string("Click Me")),
            ("rounded", PropertyDescriptor::checkbox(true)),
        ])
        .expect("valid schema");

        let defaults = schema.defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(
            defaults.get("text"),
            Some(&PropertyValue::String("Click Me".into()))
        );
        assert_eq!(defaults.get("rounded"), Some(&PropertyValue::Checkbox(true)));
    }

    #[test]
    fn value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&PropertyValue::Color("#ff0000".into()))
            .expect("should serialize");
        assert_eq!(json, r##"{"kind":"color","value":"#ff0000"}"##);
    }

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(PropertyValue::Number(12.0).to_string(), "12");
        assert_eq!(PropertyValue::Number(0.5).to_string(), "0.5");
    }

    #[test]
    fn schema_roundtrips_through_json() {
        let schema = PropertySchema::from_entries([(
            "size",
            PropertyDescriptor::select(["sm", "lg"], "sm").in_section("Style"),
        )])
        .expect("valid schema");
        let json = serde_json::to_string(&schema).expect("serialize");
        let back: PropertySchema = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, schema);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn schema_json_is_validated_on_load() {
        let bad_default = r#"[{"name": "size", "kind": "select", "default": {"kind": "select", "value": "xl"}, "options": ["sm", "lg"], "section": "Style"}]"#;
        assert!(serde_json::from_str::<PropertySchema>(bad_default).is_err());

        let duplicate = r#"[
            {"name": "a", "kind": "string", "default": {"kind": "string", "value": ""}},
            {"name": "a", "kind": "string", "default": {"kind": "string", "value": ""}}
        ]"#;
        assert!(serde_json::from_str::<PropertySchema>(duplicate).is_err());
    }

    #[test]
    fn schema_matches_only_its_own_keys() {
        let schema = PropertySchema::from_entries([
            ("title", PropertyDescriptor::string("Hi")),
            ("count", PropertyDescriptor::number(1.0)),
        ])
        .expect("valid schema");
        assert!(schema.matches(&schema.defaults()));

        let mut extra = schema.defaults();
        extra.insert("other".into(), PropertyValue::String(String::new()));
        assert!(!schema.matches(&extra));

        let mut missing = schema.defaults();
        missing.remove("count");
        assert!(!schema.matches(&missing));
    }
}
