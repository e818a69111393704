//! Property panel generation.
//!
//! Turns the selected template's schema into grouped form fields. Sections
//! appear in the order their first property was declared; fields keep
//! schema order within a section.

use serde::Serialize;

use crate::{
    ComponentTemplate, PropertyDescriptor, PropertyKind, PropertyValue, PropertyValueMap,
    StudioError, StudioResult,
};

/// Form control used to edit a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// Single-line text input.
    TextInput,
    /// Multi-line text area.
    TextArea,
    /// Color picker.
    ColorPicker,
    /// Drop-down with fixed options.
    Select {
        /// Allowed options in display order.
        options: Vec<String>,
    },
    /// Checkbox.
    Checkbox,
    /// Numeric input.
    NumberInput,
}

impl Control {
    fn for_descriptor(descriptor: &PropertyDescriptor) -> Self {
        match descriptor.kind {
            PropertyKind::String => Self::TextInput,
            PropertyKind::Text => Self::TextArea,
            PropertyKind::Color => Self::ColorPicker,
            PropertyKind::Select => Self::Select {
                options: descriptor.options.clone(),
            },
            PropertyKind::Checkbox => Self::Checkbox,
            PropertyKind::Number => Self::NumberInput,
        }
    }
}

/// One editable field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelField {
    /// Property name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Property kind.
    pub kind: PropertyKind,
    /// Control to render.
    pub control: Control,
    /// Current value, falling back to the default.
    pub value: PropertyValue,
    /// Schema default.
    pub default: PropertyValue,
}

impl PanelField {
    /// Whether the current value equals the default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Convert raw form input into a typed value for this field.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidValue`] if the input cannot be converted,
    /// or is not one of a select field's options.
    pub fn parse_input(&self, raw: &str) -> StudioResult<PropertyValue> {
        let invalid = |reason: String| StudioError::InvalidValue {
            name: self.name.clone(),
            reason,
        };

        match &self.control {
            Control::TextInput => Ok(PropertyValue::String(raw.to_string())),
            Control::TextArea => Ok(PropertyValue::Text(raw.to_string())),
            Control::ColorPicker => Ok(PropertyValue::Color(raw.trim().to_string())),
            Control::Select { options } => {
                if options.iter().any(|o| o == raw) {
                    Ok(PropertyValue::Select(raw.to_string()))
                } else {
                    Err(invalid(format!(
                        "'{raw}' is not one of {}",
                        options.join(", ")
                    )))
                }
            }
            Control::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Ok(PropertyValue::Checkbox(true)),
                "false" | "off" | "0" | "no" | "" => Ok(PropertyValue::Checkbox(false)),
                other => Err(invalid(format!("'{other}' is not a boolean"))),
            },
            Control::NumberInput => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(PropertyValue::Number)
                .ok_or_else(|| invalid(format!("'{raw}' is not a number"))),
        }
    }
}

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSection {
    /// Section label.
    pub title: String,
    /// Fields in schema order.
    pub fields: Vec<PanelField>,
}

/// The generated property panel for one template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Template the panel edits.
    pub template_id: String,
    /// Sections in first-occurrence order.
    pub sections: Vec<PanelSection>,
}

impl Panel {
    /// Find a field by property name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&PanelField> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }

    /// Total number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}

/// Build the property panel for `template` showing `values`.
#[must_use]
pub fn generate_panel(template: &ComponentTemplate, values: &PropertyValueMap) -> Panel {
    let mut sections: Vec<PanelSection> = Vec::new();

    for (name, descriptor) in template.schema.iter() {
        let field = PanelField {
            name: name.to_string(),
            label: descriptor
                .label
                .clone()
                .unwrap_or_else(|| name.to_string()),
            kind: descriptor.kind,
            control: Control::for_descriptor(descriptor),
            value: values
                .get(name)
                .cloned()
                .unwrap_or_else(|| descriptor.default.clone()),
            default: descriptor.default.clone(),
        };

        match sections.iter_mut().find(|s| s.title == descriptor.section) {
            Some(section) => section.fields.push(field),
            None => sections.push(PanelSection {
                title: descriptor.section.clone(),
                fields: vec![field],
            }),
        }
    }

    Panel {
        template_id: template.id.clone(),
        sections,
    }
}
