use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ConditionGroup;

/// Conditional rules attached to one field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDynamicLogic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    required: Option<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read_only: Option<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invalid: Option<ConditionGroup>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    options: BTreeMap<String, ConditionGroup>,
}

impl FieldDynamicLogic {
    /// Creates logic with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the visibility rule.
    #[must_use]
    pub fn with_visible(mut self, rule: ConditionGroup) -> Self {
        self.visible = Some(rule);
        self
    }

    /// Sets the requiredness rule.
    #[must_use]
    pub fn with_required(mut self, rule: ConditionGroup) -> Self {
        self.required = Some(rule);
        self
    }

    /// Sets the read-only rule.
    #[must_use]
    pub fn with_read_only(mut self, rule: ConditionGroup) -> Self {
        self.read_only = Some(rule);
        self
    }

    /// Sets the invalid rule.
    #[must_use]
    pub fn with_invalid(mut self, rule: ConditionGroup) -> Self {
        self.invalid = Some(rule);
        self
    }

    /// Adds a rule deciding whether one option is offered.
    #[must_use]
    pub fn with_option_rule(mut self, option: impl Into<String>, rule: ConditionGroup) -> Self {
        self.options.insert(option.into(), rule);
        self
    }

    /// Returns the visibility rule.
    #[must_use]
    pub fn visible(&self) -> Option<&ConditionGroup> {
        self.visible.as_ref()
    }

    /// Returns the requiredness rule.
    #[must_use]
    pub fn required(&self) -> Option<&ConditionGroup> {
        self.required.as_ref()
    }

    /// Returns the read-only rule.
    #[must_use]
    pub fn read_only(&self) -> Option<&ConditionGroup> {
        self.read_only.as_ref()
    }

    /// Returns the invalid rule.
    #[must_use]
    pub fn invalid(&self) -> Option<&ConditionGroup> {
        self.invalid.as_ref()
    }

    /// Returns per-option rules keyed by option value.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, ConditionGroup> {
        &self.options
    }
}

/// Conditional rules attached to one panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelDynamicLogic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<ConditionGroup>,
}

impl PanelDynamicLogic {
    /// Creates panel logic with a visibility rule.
    #[must_use]
    pub fn new(visible: Option<ConditionGroup>) -> Self {
        Self { visible }
    }

    /// Returns the visibility rule.
    #[must_use]
    pub fn visible(&self) -> Option<&ConditionGroup> {
        self.visible.as_ref()
    }
}

/// All dynamic logic declared for one entity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityDynamicLogic {
    #[serde(default)]
    fields: BTreeMap<String, FieldDynamicLogic>,
    #[serde(default)]
    panels: BTreeMap<String, PanelDynamicLogic>,
}

impl EntityDynamicLogic {
    /// Creates empty entity logic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one field's logic.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, logic: FieldDynamicLogic) -> Self {
        self.fields.insert(name.into(), logic);
        self
    }

    /// Adds or replaces one panel's logic.
    #[must_use]
    pub fn with_panel(mut self, name: impl Into<String>, logic: PanelDynamicLogic) -> Self {
        self.panels.insert(name.into(), logic);
        self
    }

    /// Returns field logic keyed by field name.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldDynamicLogic> {
        &self.fields
    }

    /// Returns panel logic keyed by panel name.
    #[must_use]
    pub fn panels(&self) -> &BTreeMap<String, PanelDynamicLogic> {
        &self.panels
    }
}

/// Evaluated state of one field against the current record and form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldState {
    /// Whether the field is shown.
    pub visible: bool,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Whether the field is locked.
    pub read_only: bool,
    /// Whether the current value is flagged invalid.
    pub invalid: bool,
    /// Options currently offered, when option rules apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_options: Option<Vec<String>>,
}

impl Default for DynamicFieldState {
    fn default() -> Self {
        Self {
            visible: true,
            required: false,
            read_only: false,
            invalid: false,
            filtered_options: None,
        }
    }
}
