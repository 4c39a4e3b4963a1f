use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Comparison operators understood by dynamic-logic conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    /// Value equality.
    Equals,
    /// Value inequality.
    NotEquals,
    /// Null, missing, empty string, empty array, or empty object.
    IsEmpty,
    /// Negation of [`ConditionOperator::IsEmpty`].
    IsNotEmpty,
    /// Boolean true.
    IsTrue,
    /// Boolean false or unset.
    IsFalse,
    /// Numeric greater-than.
    GreaterThan,
    /// Numeric less-than.
    LessThan,
    /// Numeric greater-than-or-equal.
    GreaterThanOrEquals,
    /// Numeric less-than-or-equal.
    LessThanOrEquals,
    /// Substring or array membership.
    Contains,
    /// Negation of [`ConditionOperator::Contains`] on strings and arrays.
    NotContains,
    /// String prefix.
    StartsWith,
    /// String suffix.
    EndsWith,
    /// Membership in the comparison array.
    In,
    /// Non-membership in the comparison array.
    NotIn,
    /// Date falls on the current local day.
    IsToday,
    /// Date lies after now.
    InFuture,
    /// Date lies before now.
    InPast,
    /// Operator name this client does not know.
    Unknown(String),
}

impl ConditionOperator {
    /// Parses an operator name in camelCase (`notEquals`) or kebab-case (`not-equals`).
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|character| !matches!(character, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "equals" => Self::Equals,
            "notequals" => Self::NotEquals,
            "isempty" => Self::IsEmpty,
            "isnotempty" => Self::IsNotEmpty,
            "istrue" => Self::IsTrue,
            "isfalse" => Self::IsFalse,
            "greaterthan" => Self::GreaterThan,
            "lessthan" => Self::LessThan,
            "greaterthanorequals" | "greaterorequal" => Self::GreaterThanOrEquals,
            "lessthanorequals" | "lessorequal" => Self::LessThanOrEquals,
            "contains" => Self::Contains,
            "notcontains" => Self::NotContains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "in" => Self::In,
            "notin" => Self::NotIn,
            "istoday" => Self::IsToday,
            "infuture" => Self::InFuture,
            "inpast" => Self::InPast,
            _ => Self::Unknown(value.to_owned()),
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::IsTrue => "isTrue",
            Self::IsFalse => "isFalse",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterThanOrEquals => "greaterThanOrEquals",
            Self::LessThanOrEquals => "lessThanOrEquals",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::IsToday => "isToday",
            Self::InFuture => "inFuture",
            Self::InPast => "inPast",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

/// Logical combinator of a condition group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Every child must hold.
    And,
    /// Any child must hold.
    Or,
    /// Negates the first child.
    Not,
    /// Group type this client does not know.
    Unknown(String),
}

impl LogicalOperator {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

/// One leaf comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    operator: ConditionOperator,
    attribute: Option<String>,
    value: Option<Value>,
}

impl Condition {
    /// Creates a leaf condition.
    #[must_use]
    pub fn new(
        operator: ConditionOperator,
        attribute: Option<&str>,
        value: Option<Value>,
    ) -> Self {
        Self {
            operator,
            attribute: attribute.map(str::to_owned),
            value,
        }
    }

    /// Returns the operator.
    #[must_use]
    pub fn operator(&self) -> &ConditionOperator {
        &self.operator
    }

    /// Returns the dot-separated attribute path.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Returns the comparison value.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn malformed(raw: &Value) -> Self {
        Self {
            operator: ConditionOperator::Unknown(format!("malformed node {raw}")),
            attribute: None,
            value: None,
        }
    }
}

/// A node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// Leaf comparison.
    Condition(Condition),
    /// Nested group.
    Group(ConditionGroup),
}

impl ConditionNode {
    /// Shorthand for a leaf node.
    #[must_use]
    pub fn condition(operator: ConditionOperator, attribute: &str, value: Option<Value>) -> Self {
        Self::Condition(Condition::new(operator, Some(attribute), value))
    }

    /// Parses one node. Never fails: malformed input becomes an unknown-operator leaf.
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return Self::Condition(Condition::malformed(raw));
        };
        let Some(node_type) = object.get("type").and_then(Value::as_str) else {
            return Self::Condition(Condition::malformed(raw));
        };

        if let Some(logical) = LogicalOperator::parse(node_type) {
            return Self::Group(ConditionGroup::new(
                logical,
                parse_children(object.get("value")),
            ));
        }

        Self::Condition(Condition {
            operator: ConditionOperator::parse(node_type),
            attribute: object
                .get("attribute")
                .and_then(Value::as_str)
                .map(str::to_owned),
            value: object.get("value").cloned(),
        })
    }
}

/// A logical combination of condition nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    logical: LogicalOperator,
    children: Vec<ConditionNode>,
}

impl ConditionGroup {
    /// Creates a group.
    #[must_use]
    pub fn new(logical: LogicalOperator, children: Vec<ConditionNode>) -> Self {
        Self { logical, children }
    }

    /// Creates an `and` group.
    #[must_use]
    pub fn and(children: Vec<ConditionNode>) -> Self {
        Self::new(LogicalOperator::And, children)
    }

    /// Creates an `or` group.
    #[must_use]
    pub fn or(children: Vec<ConditionNode>) -> Self {
        Self::new(LogicalOperator::Or, children)
    }

    /// Creates a `not` group.
    #[must_use]
    pub fn not(children: Vec<ConditionNode>) -> Self {
        Self::new(LogicalOperator::Not, children)
    }

    /// Returns the combinator.
    #[must_use]
    pub fn logical(&self) -> &LogicalOperator {
        &self.logical
    }

    /// Returns the ordered children.
    #[must_use]
    pub fn children(&self) -> &[ConditionNode] {
        &self.children
    }

    /// Parses a top-level rule.
    ///
    /// Accepts `{"conditionGroup": [...]}` (implicit `and`), a typed group node, a bare
    /// array of nodes (implicit `and`), or a single leaf (wrapped in `and`). An object
    /// with an unrecognized type and array value becomes a group with an unknown
    /// combinator.
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        match raw {
            Value::Array(_) => Self::and(parse_children(Some(raw))),
            Value::Object(object) => Self::from_object(object, raw),
            _ => Self::new(LogicalOperator::Unknown(raw.to_string()), Vec::new()),
        }
    }

    fn from_object(object: &Map<String, Value>, raw: &Value) -> Self {
        if let Some(children) = object.get("conditionGroup") {
            return Self::and(parse_children(Some(children)));
        }

        let node_type = object.get("type").and_then(Value::as_str);
        if let Some(logical) = node_type.and_then(LogicalOperator::parse) {
            return Self::new(logical, parse_children(object.get("value")));
        }

        match node_type {
            Some(name)
                if matches!(ConditionOperator::parse(name), ConditionOperator::Unknown(_))
                    && object.get("value").is_some_and(Value::is_array) =>
            {
                Self::new(
                    LogicalOperator::Unknown(name.to_owned()),
                    parse_children(object.get("value")),
                )
            }
            _ => Self::and(vec![ConditionNode::from_value(raw)]),
        }
    }
}

fn parse_children(raw: Option<&Value>) -> Vec<ConditionNode> {
    match raw {
        Some(Value::Array(items)) => items.iter().map(ConditionNode::from_value).collect(),
        _ => Vec::new(),
    }
}

impl<'de> Deserialize<'de> for ConditionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

impl<'de> Deserialize<'de> for ConditionGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

impl Serialize for ConditionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Group(group) => group.serialize(serializer),
            Self::Condition(condition) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", condition.operator.as_str())?;
                if let Some(attribute) = &condition.attribute {
                    map.serialize_entry("attribute", attribute)?;
                }
                if let Some(value) = &condition.value {
                    map.serialize_entry("value", value)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for ConditionGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.logical.as_str())?;
        map.serialize_entry("value", &self.children)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::{ConditionGroup, ConditionNode, ConditionOperator, LogicalOperator};

    #[test]
    fn operator_names_accept_both_spellings() {
        assert_eq!(
            ConditionOperator::parse("greaterThanOrEquals"),
            ConditionOperator::GreaterThanOrEquals
        );
        assert_eq!(
            ConditionOperator::parse("greater-or-equal"),
            ConditionOperator::GreaterThanOrEquals
        );
        assert_eq!(
            ConditionOperator::parse("not-in"),
            ConditionOperator::NotIn
        );
        assert_eq!(
            ConditionOperator::parse("isToday"),
            ConditionOperator::IsToday
        );
    }

    #[test]
    fn condition_group_wrapper_parses_as_and() {
        let group = serde_json::from_value::<ConditionGroup>(json!({
            "conditionGroup": [
                {"type": "equals", "attribute": "status", "value": "Dead"},
                {"type": "or", "value": [
                    {"type": "isEmpty", "attribute": "reason"},
                    {"type": "isTrue", "attribute": "doNotCall"}
                ]}
            ]
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(group.logical(), &LogicalOperator::And);
        assert_eq!(group.children().len(), 2);
        let ConditionNode::Group(nested) = &group.children()[1] else {
            unreachable!()
        };
        assert_eq!(nested.logical(), &LogicalOperator::Or);
        assert_eq!(nested.children().len(), 2);
    }

    #[test]
    fn malformed_children_become_unknown_leaves() {
        let group = ConditionGroup::from_value(&json!({
            "type": "and",
            "value": [42, {"attribute": "missingType"}, {"type": "between", "attribute": "a"}]
        }));

        assert_eq!(group.children().len(), 3);
        for child in group.children() {
            let ConditionNode::Condition(condition) = child else {
                unreachable!()
            };
            assert!(matches!(
                condition.operator(),
                ConditionOperator::Unknown(_)
            ));
        }
    }

    #[test]
    fn unknown_top_level_group_type_is_preserved() {
        let group = ConditionGroup::from_value(&json!({
            "type": "xor",
            "value": [{"type": "isTrue", "attribute": "a"}]
        }));

        assert_eq!(group.logical(), &LogicalOperator::Unknown("xor".to_owned()));
        assert_eq!(group.children().len(), 1);
    }

    #[test]
    fn in_leaf_at_top_level_is_wrapped_not_mistaken_for_a_group() {
        let group = ConditionGroup::from_value(&json!({
            "type": "in", "attribute": "stage", "value": ["Won", "Lost"]
        }));

        assert_eq!(group.logical(), &LogicalOperator::And);
        assert!(matches!(
            group.children(),
            [ConditionNode::Condition(condition)] if condition.operator() == &ConditionOperator::In
        ));
    }

    #[test]
    fn serialization_uses_wire_shape() {
        let group = ConditionGroup::not(vec![ConditionNode::condition(
            ConditionOperator::NotEquals,
            "status",
            Some(json!("New")),
        )]);

        let serialized = serde_json::to_value(&group).unwrap_or_default();
        assert_eq!(
            serialized,
            json!({"type": "not", "value": [
                {"type": "notEquals", "attribute": "status", "value": "New"}
            ]})
        );
        assert_eq!(ConditionGroup::from_value(&serialized), group);
    }

    proptest! {
        #[test]
        fn unrecognized_operator_names_never_fail_to_parse(name in "[a-z]{1,12}") {
            let node = ConditionNode::from_value(&json!({"type": name.clone(), "attribute": "a"}));
            let parsed_ok = match node {
                ConditionNode::Condition(condition) => match condition.operator() {
                    ConditionOperator::Unknown(raw) => raw == &name,
                    known => &ConditionOperator::parse(known.as_str()) == known,
                },
                ConditionNode::Group(group) => group.logical().as_str() == name,
            };
            prop_assert!(parsed_ok);
        }
    }
}
