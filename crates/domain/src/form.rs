use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::FieldType;

/// One field cell of a detail layout row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCell {
    name: String,
    #[serde(default)]
    full_width: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_label: Option<String>,
    #[serde(default)]
    no_label: bool,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    type_override: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,
}

impl LayoutCell {
    /// Creates a cell for the named field.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_width: false,
            custom_label: None,
            no_label: false,
            type_override: None,
            read_only: None,
        }
    }

    /// Makes the cell span the whole row.
    #[must_use]
    pub fn with_full_width(mut self) -> Self {
        self.full_width = true;
        self
    }

    /// Replaces the field label.
    #[must_use]
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    /// Suppresses the label.
    #[must_use]
    pub fn without_label(mut self) -> Self {
        self.no_label = true;
        self
    }

    /// Renders the field as another kind.
    #[must_use]
    pub fn with_type_override(mut self, field_type: FieldType) -> Self {
        self.type_override = Some(field_type);
        self
    }

    /// Forces the read-only flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether the cell spans the row.
    #[must_use]
    pub fn is_full_width(&self) -> bool {
        self.full_width
    }

    /// Returns the label override.
    #[must_use]
    pub fn custom_label(&self) -> Option<&str> {
        self.custom_label.as_deref()
    }

    /// Returns whether the label is suppressed.
    #[must_use]
    pub fn hides_label(&self) -> bool {
        self.no_label
    }

    /// Returns the kind override.
    #[must_use]
    pub fn type_override(&self) -> Option<&FieldType> {
        self.type_override.as_ref()
    }

    /// Returns the explicit read-only flag.
    #[must_use]
    pub fn read_only(&self) -> Option<bool> {
        self.read_only
    }
}

/// One slot of a detail layout row: a field cell or an empty placeholder (`false`).
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSlot {
    /// Field cell.
    Cell(LayoutCell),
    /// Empty slot.
    Placeholder,
}

impl LayoutSlot {
    /// Returns the cell, if this slot has one.
    #[must_use]
    pub fn cell(&self) -> Option<&LayoutCell> {
        match self {
            Self::Cell(cell) => Some(cell),
            Self::Placeholder => None,
        }
    }
}

impl From<LayoutCell> for LayoutSlot {
    fn from(cell: LayoutCell) -> Self {
        Self::Cell(cell)
    }
}

impl Serialize for LayoutSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Cell(cell) => cell.serialize(serializer),
            Self::Placeholder => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for LayoutSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match raw {
            Value::Bool(false) | Value::Null => Ok(Self::Placeholder),
            other => match LayoutCell::deserialize(other) {
                Ok(cell) => Ok(Self::Cell(cell)),
                Err(error) => {
                    warn!(error = %error, "treating unreadable layout cell as placeholder");
                    Ok(Self::Placeholder)
                }
            },
        }
    }
}

/// A titled group of rows in a detail layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default = "default_panel_style")]
    style: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    rows: Vec<Vec<LayoutSlot>>,
}

fn default_panel_style() -> String {
    "default".to_owned()
}

impl LayoutPanel {
    /// Creates a visible panel with the default style.
    #[must_use]
    pub fn new(label: Option<String>, rows: Vec<Vec<LayoutSlot>>) -> Self {
        Self {
            name: None,
            label,
            style: default_panel_style(),
            hidden: false,
            rows,
        }
    }

    /// Sets the name used to look up panel dynamic logic.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the style tag.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets the static hidden flag.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Returns the panel name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the panel label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the style tag.
    #[must_use]
    pub fn style(&self) -> &str {
        self.style.as_str()
    }

    /// Returns whether the panel is statically hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<LayoutSlot>] {
        &self.rows
    }
}

/// Ordered panels of a record detail/edit view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailLayout {
    panels: Vec<LayoutPanel>,
}

impl DetailLayout {
    /// Creates a layout from panels.
    #[must_use]
    pub fn new(panels: Vec<LayoutPanel>) -> Self {
        Self { panels }
    }

    /// Returns the panels.
    #[must_use]
    pub fn panels(&self) -> &[LayoutPanel] {
        &self.panels
    }
}
