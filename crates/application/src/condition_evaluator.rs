use std::cmp::Ordering;

use chrono::{DateTime, Local};
use crmdesk_domain::{Condition, ConditionGroup, ConditionNode, ConditionOperator, LogicalOperator};
use serde_json::Value;
use tracing::warn;

mod dates;
mod values;


pub use values::{is_empty_value, value_by_path};

use dates::locate;
use values::{compare_numbers, stringify_scalar, values_equal};

/// Evaluates a condition tree against record data using the wall clock for date operators.
#[must_use]
pub fn evaluate(group: &ConditionGroup, data: &Value) -> bool {
    evaluate_at(group, data, Local::now())
}

/// Evaluates a condition tree against record data relative to `now`.
#[must_use]
pub fn evaluate_at(group: &ConditionGroup, data: &Value, now: DateTime<Local>) -> bool {
    let context = EvaluationContext { data, now };
    context.group(group)
}

#[derive(Clone, Copy)]
struct EvaluationContext<'a> {
    data: &'a Value,
    now: DateTime<Local>,
}

impl EvaluationContext<'_> {
    fn group(self, group: &ConditionGroup) -> bool {
        match group.logical() {
            LogicalOperator::And => group.children().iter().all(|child| self.node(child)),
            LogicalOperator::Or => group.children().iter().any(|child| self.node(child)),
            // only the first child counts; an empty `not` holds
            LogicalOperator::Not => group
                .children()
                .first()
                .is_none_or(|child| !self.node(child)),
            LogicalOperator::Unknown(name) => {
                warn!(logical = %name, "unknown condition group type evaluates to false");
                false
            }
        }
    }

    fn node(self, node: &ConditionNode) -> bool {
        match node {
            ConditionNode::Condition(condition) => self.condition(condition),
            ConditionNode::Group(group) => self.group(group),
        }
    }

    fn condition(self, condition: &Condition) -> bool {
        let actual = condition
            .attribute()
            .and_then(|path| value_by_path(self.data, path));
        let expected = condition.value();

        match condition.operator() {
            ConditionOperator::Equals => values_equal(actual, expected),
            ConditionOperator::NotEquals => !values_equal(actual, expected),
            ConditionOperator::IsEmpty => is_empty_value(actual),
            ConditionOperator::IsNotEmpty => !is_empty_value(actual),
            ConditionOperator::IsTrue => matches!(actual, Some(Value::Bool(true))),
            ConditionOperator::IsFalse => {
                matches!(actual, None | Some(Value::Null) | Some(Value::Bool(false)))
            }
            ConditionOperator::GreaterThan => {
                compare_numbers(actual, expected).is_some_and(Ordering::is_gt)
            }
            ConditionOperator::LessThan => {
                compare_numbers(actual, expected).is_some_and(Ordering::is_lt)
            }
            ConditionOperator::GreaterThanOrEquals => {
                compare_numbers(actual, expected).is_some_and(Ordering::is_ge)
            }
            ConditionOperator::LessThanOrEquals => {
                compare_numbers(actual, expected).is_some_and(Ordering::is_le)
            }
            ConditionOperator::Contains => contains(actual, expected).unwrap_or(false),
            ConditionOperator::NotContains => {
                contains(actual, expected).is_some_and(|found| !found)
            }
            ConditionOperator::StartsWith => {
                string_pair(actual, expected).is_some_and(|(text, prefix)| text.starts_with(prefix))
            }
            ConditionOperator::EndsWith => {
                string_pair(actual, expected).is_some_and(|(text, suffix)| text.ends_with(suffix))
            }
            ConditionOperator::In => membership(actual, expected).unwrap_or(false),
            ConditionOperator::NotIn => membership(actual, expected).is_some_and(|found| !found),
            ConditionOperator::IsToday => {
                locate(actual, self.now).is_some_and(|position| position.same_day)
            }
            ConditionOperator::InFuture => locate(actual, self.now)
                .is_some_and(|position| position.ordering == Ordering::Greater),
            ConditionOperator::InPast => locate(actual, self.now)
                .is_some_and(|position| position.ordering == Ordering::Less),
            ConditionOperator::Unknown(name) => {
                warn!(
                    operator = %name,
                    attribute = condition.attribute().unwrap_or_default(),
                    "unknown condition operator evaluates to false"
                );
                false
            }
        }
    }
}

/// `None` when the operand shapes do not support containment.
fn contains(actual: Option<&Value>, expected: Option<&Value>) -> Option<bool> {
    match (actual?, expected?) {
        (Value::String(text), needle) => {
            let needle = stringify_scalar(needle)?;
            Some(text.contains(needle.as_str()))
        }
        (Value::Array(items), needle) => {
            Some(items.iter().any(|item| values_equal(Some(item), Some(needle))))
        }
        _ => None,
    }
}

fn membership(actual: Option<&Value>, expected: Option<&Value>) -> Option<bool> {
    let Some(Value::Array(candidates)) = expected else {
        return None;
    };

    Some(
        candidates
            .iter()
            .any(|candidate| values_equal(actual, Some(candidate))),
    )
}

fn string_pair<'a>(
    actual: Option<&'a Value>,
    expected: Option<&'a Value>,
) -> Option<(&'a str, &'a str)> {
    Some((actual?.as_str()?, expected?.as_str()?))
}
