use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use crmdesk_domain::{ConditionGroup, DynamicFieldState, EntityDynamicLogic, FieldDynamicLogic};
use serde::Serialize;
use serde_json::Value;

use crate::condition_evaluator::evaluate_at;

/// Evaluated dynamic logic of one entity against the current record and form data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EntityDynamicState {
    /// Field states keyed by field name; only fields with declared logic appear.
    pub fields: BTreeMap<String, DynamicFieldState>,
    /// Panel visibility keyed by panel name; only panels with declared logic appear.
    pub panels: BTreeMap<String, bool>,
}

impl EntityDynamicState {
    /// Returns a field's state, defaulting when the field has no logic.
    #[must_use]
    pub fn field(&self, name: &str) -> DynamicFieldState {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Returns whether a panel is visible, defaulting to visible.
    #[must_use]
    pub fn panel_visible(&self, name: &str) -> bool {
        self.panels.get(name).copied().unwrap_or(true)
    }
}

/// Evaluates one field's rules using the wall clock.
#[must_use]
pub fn evaluate_field(
    logic: &FieldDynamicLogic,
    data: &Value,
    all_options: Option<&[String]>,
) -> DynamicFieldState {
    evaluate_field_at(logic, data, all_options, Local::now())
}

/// Evaluates one field's rules relative to `now`.
///
/// A field that is not visible is never required. Options without a rule stay
/// offered.
#[must_use]
pub fn evaluate_field_at(
    logic: &FieldDynamicLogic,
    data: &Value,
    all_options: Option<&[String]>,
    now: DateTime<Local>,
) -> DynamicFieldState {
    let holds = |rule: Option<&ConditionGroup>| {
        rule.map(|group| evaluate_at(group, data, now))
    };

    let visible = holds(logic.visible()).unwrap_or(true);
    let required = visible && holds(logic.required()).unwrap_or(false);
    let read_only = holds(logic.read_only()).unwrap_or(false);
    let invalid = holds(logic.invalid()).unwrap_or(false);

    let filtered_options = (!logic.options().is_empty()).then(|| {
        let offered = |option: &String| {
            logic
                .options()
                .get(option)
                .is_none_or(|rule| evaluate_at(rule, data, now))
        };
        match all_options {
            Some(options) => options.iter().filter(|option| offered(option)).cloned().collect(),
            None => logic
                .options()
                .keys()
                .filter(|option| offered(option))
                .cloned()
                .collect(),
        }
    });

    DynamicFieldState {
        visible,
        required,
        read_only,
        invalid,
        filtered_options,
    }
}

/// Evaluates every field and panel rule of an entity using the wall clock.
#[must_use]
pub fn evaluate_entity(
    logic: &EntityDynamicLogic,
    data: &Value,
    field_options: &BTreeMap<String, Vec<String>>,
) -> EntityDynamicState {
    evaluate_entity_at(logic, data, field_options, Local::now())
}

/// Evaluates every field and panel rule of an entity relative to `now`.
#[must_use]
pub fn evaluate_entity_at(
    logic: &EntityDynamicLogic,
    data: &Value,
    field_options: &BTreeMap<String, Vec<String>>,
    now: DateTime<Local>,
) -> EntityDynamicState {
    let fields = logic
        .fields()
        .iter()
        .map(|(name, field_logic)| {
            let options = field_options.get(name).map(Vec::as_slice);
            (
                name.clone(),
                evaluate_field_at(field_logic, data, options, now),
            )
        })
        .collect();

    let panels = logic
        .panels()
        .iter()
        .map(|(name, panel_logic)| {
            let visible = panel_logic
                .visible()
                .is_none_or(|rule| evaluate_at(rule, data, now));
            (name.clone(), visible)
        })
        .collect();

    EntityDynamicState { fields, panels }
}
