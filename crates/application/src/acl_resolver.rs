use std::collections::BTreeMap;

use crmdesk_core::CurrentUser;
use crmdesk_domain::{
    AccessLevel, AclAction, AclData, FieldAccess, FieldAction, PermissionValue, ScopeEntry,
};
use serde::Serialize;
use serde_json::Value;


/// Effective read/edit access to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldPermissions {
    /// Whether the value may be shown.
    pub read: bool,
    /// Whether the value may be changed.
    pub edit: bool,
}

/// Resolved permission for one entity type and action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    Flag(bool),
    Level(AccessLevel),
    Other,
    Unrecognized,
}

/// Resolves scope, record and field permissions for one session.
///
/// Administrators pass every check. Anything absent from the tables is denied.
#[derive(Debug, Clone, Copy)]
pub struct AclResolver<'a> {
    user: &'a CurrentUser,
    acl: &'a AclData,
}

impl<'a> AclResolver<'a> {
    /// Creates a resolver over the session identity and permission tables.
    #[must_use]
    pub fn new(user: &'a CurrentUser, acl: &'a AclData) -> Self {
        Self { user, acl }
    }

    /// Returns whether the action is allowed on the entity type at all.
    #[must_use]
    pub fn check_scope(&self, entity_type: &str, action: AclAction) -> bool {
        if self.user.is_admin() {
            return true;
        }

        match self.grant(entity_type, action) {
            Some(Grant::Flag(allowed)) => allowed,
            Some(Grant::Level(level)) => level != AccessLevel::No,
            Some(Grant::Other) => true,
            Some(Grant::Unrecognized) | None => false,
        }
    }

    /// Returns whether the action is allowed on one record.
    #[must_use]
    pub fn check_model(&self, entity_type: &str, record: &Value, action: AclAction) -> bool {
        if self.user.is_admin() {
            return true;
        }

        match self.grant(entity_type, action) {
            Some(Grant::Flag(allowed)) => allowed,
            Some(Grant::Level(AccessLevel::All | AccessLevel::Yes)) => true,
            Some(Grant::Level(AccessLevel::Own)) => self.owns(record),
            Some(Grant::Level(AccessLevel::Team)) => self.shares_team(record),
            Some(Grant::Level(AccessLevel::No) | Grant::Other | Grant::Unrecognized) | None => {
                false
            }
        }
    }

    /// Returns whether the field may be read or edited.
    ///
    /// Without an explicit field entry the scope permission for the matching action applies.
    #[must_use]
    pub fn check_field(&self, entity_type: &str, field: &str, action: FieldAction) -> bool {
        if self.user.is_admin() {
            return true;
        }

        match (self.acl.field_access(entity_type, field), action) {
            (None, action) => self.check_scope(entity_type, action.scope_action()),
            (Some(access), FieldAction::Read) => access != FieldAccess::No,
            (Some(access), FieldAction::Edit) => access == FieldAccess::Yes,
        }
    }

    /// Returns whether the entity type's scope is enabled for the session.
    #[must_use]
    pub fn check_scope_enabled(&self, entity_type: &str) -> bool {
        if self.user.is_admin() {
            return true;
        }

        self.acl
            .scope(entity_type)
            .is_some_and(|entry| entry != &ScopeEntry::Enabled(false))
    }

    /// Resolves read and edit access for each named field.
    #[must_use]
    pub fn field_permissions<'f>(
        &self,
        entity_type: &str,
        fields: impl IntoIterator<Item = &'f str>,
    ) -> BTreeMap<String, FieldPermissions> {
        fields
            .into_iter()
            .map(|field| {
                let permissions = FieldPermissions {
                    read: self.check_field(entity_type, field, FieldAction::Read),
                    edit: self.check_field(entity_type, field, FieldAction::Edit),
                };
                (field.to_owned(), permissions)
            })
            .collect()
    }

    fn grant(&self, entity_type: &str, action: AclAction) -> Option<Grant> {
        match self.acl.scope(entity_type)? {
            ScopeEntry::Enabled(enabled) => Some(Grant::Flag(*enabled)),
            ScopeEntry::Actions(actions) => {
                let grant = match actions.get(action.as_str())? {
                    PermissionValue::Flag(allowed) => Grant::Flag(*allowed),
                    PermissionValue::Level(level) => Grant::Level(*level),
                    PermissionValue::Other(_) => Grant::Other,
                    PermissionValue::Unrecognized(_) => Grant::Unrecognized,
                };
                Some(grant)
            }
            ScopeEntry::Unrecognized(_) => Some(Grant::Unrecognized),
        }
    }

    fn owns(&self, record: &Value) -> bool {
        ["assignedUserId", "createdById"].iter().any(|key| {
            record
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|owner| owner == self.user.id())
        })
    }

    // only `teamsIds` is consulted
    fn shares_team(&self, record: &Value) -> bool {
        let Some(record_teams) = record.get("teamsIds").and_then(Value::as_array) else {
            return false;
        };

        record_teams
            .iter()
            .filter_map(Value::as_str)
            .any(|team| self.user.teams_ids().iter().any(|own| own == team))
    }
}
