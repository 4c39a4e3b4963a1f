use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record actions governed by the scope table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclAction {
    /// Create records.
    Create,
    /// Read records.
    Read,
    /// Edit records.
    Edit,
    /// Delete records.
    Delete,
    /// Follow the activity stream.
    Stream,
}

impl AclAction {
    /// Returns the key used in the scope table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Stream => "stream",
        }
    }
}

/// Record-aware permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Unconditional grant.
    Yes,
    /// Every record.
    All,
    /// Records sharing a team with the user.
    Team,
    /// Records assigned to or created by the user.
    Own,
    /// No records.
    No,
}

/// One cell of the scope table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionValue {
    /// Flat grant or denial.
    Flag(bool),
    /// Record-aware level.
    Level(AccessLevel),
    /// Level string this client does not know.
    Other(String),
    /// Any other JSON shape.
    Unrecognized(Value),
}

/// Scope table entry for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeEntry {
    /// Scope enabled or disabled wholesale.
    Enabled(bool),
    /// Per-action permissions.
    Actions(BTreeMap<String, PermissionValue>),
    /// Any other JSON shape.
    Unrecognized(Value),
}

/// Field-level access grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    /// Read and edit.
    Yes,
    /// Read only.
    Read,
    /// Neither.
    No,
    /// Grade this client does not know.
    #[serde(other)]
    Unknown,
}

/// Actions checked at field level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAction {
    /// View the value.
    Read,
    /// Change the value.
    Edit,
}

impl FieldAction {
    /// Returns the scope action this field action falls back to.
    #[must_use]
    pub fn scope_action(&self) -> AclAction {
        match self {
            Self::Read => AclAction::Read,
            Self::Edit => AclAction::Edit,
        }
    }
}

/// Permission tables of the authenticated session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclData {
    #[serde(default)]
    table: BTreeMap<String, ScopeEntry>,
    #[serde(default)]
    field_table: BTreeMap<String, BTreeMap<String, FieldAccess>>,
}

impl AclData {
    /// Creates empty tables, which deny everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scope entry.
    #[must_use]
    pub fn with_scope(mut self, entity_type: impl Into<String>, entry: ScopeEntry) -> Self {
        self.table.insert(entity_type.into(), entry);
        self
    }

    /// Sets one action permission, turning a boolean scope entry into a per-action one.
    #[must_use]
    pub fn with_action(
        mut self,
        entity_type: impl Into<String>,
        action: AclAction,
        value: PermissionValue,
    ) -> Self {
        let entry = self
            .table
            .entry(entity_type.into())
            .or_insert_with(|| ScopeEntry::Actions(BTreeMap::new()));
        if !matches!(entry, ScopeEntry::Actions(_)) {
            *entry = ScopeEntry::Actions(BTreeMap::new());
        }
        if let ScopeEntry::Actions(actions) = entry {
            actions.insert(action.as_str().to_owned(), value);
        }
        self
    }

    /// Sets one field access grade.
    #[must_use]
    pub fn with_field_access(
        mut self,
        entity_type: impl Into<String>,
        field: impl Into<String>,
        access: FieldAccess,
    ) -> Self {
        self.field_table
            .entry(entity_type.into())
            .or_default()
            .insert(field.into(), access);
        self
    }

    /// Returns the scope entry of an entity type.
    #[must_use]
    pub fn scope(&self, entity_type: &str) -> Option<&ScopeEntry> {
        self.table.get(entity_type)
    }

    /// Returns the explicit access grade of one field.
    #[must_use]
    pub fn field_access(&self, entity_type: &str, field: &str) -> Option<FieldAccess> {
        self.field_table
            .get(entity_type)
            .and_then(|fields| fields.get(field))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AccessLevel, AclData, FieldAccess, PermissionValue, ScopeEntry};

    #[test]
    fn acl_payload_parses_flags_levels_and_unknown_values() {
        let acl = serde_json::from_value::<AclData>(json!({
            "table": {
                "Account": {"read": "all", "edit": "team", "delete": false, "stream": "maybe"},
                "Calendar": true,
                "Broken": null
            },
            "fieldTable": {
                "Account": {"sicCode": "read", "rating": "hidden"}
            }
        }))
        .unwrap_or_default();

        let Some(ScopeEntry::Actions(actions)) = acl.scope("Account") else {
            unreachable!()
        };
        assert_eq!(
            actions.get("read"),
            Some(&PermissionValue::Level(AccessLevel::All))
        );
        assert_eq!(actions.get("delete"), Some(&PermissionValue::Flag(false)));
        assert_eq!(
            actions.get("stream"),
            Some(&PermissionValue::Other("maybe".to_owned()))
        );
        assert_eq!(acl.scope("Calendar"), Some(&ScopeEntry::Enabled(true)));
        assert!(matches!(
            acl.scope("Broken"),
            Some(ScopeEntry::Unrecognized(_))
        ));
        assert_eq!(
            acl.field_access("Account", "sicCode"),
            Some(FieldAccess::Read)
        );
        assert_eq!(
            acl.field_access("Account", "rating"),
            Some(FieldAccess::Unknown)
        );
        assert_eq!(acl.field_access("Account", "name"), None);
    }
}
