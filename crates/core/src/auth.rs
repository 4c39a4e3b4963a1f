use serde::{Deserialize, Serialize};

/// Account kinds reported by the server for the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    /// Ordinary user bound by the permission table.
    #[default]
    Regular,
    /// Administrator.
    Admin,
    /// Super administrator.
    SuperAdmin,
    /// Customer portal user.
    Portal,
    /// API-only user.
    Api,
    /// Any type this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// User information carried by the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    id: String,
    #[serde(default)]
    user_name: String,
    #[serde(default, rename = "type")]
    user_type: UserType,
    #[serde(default)]
    teams_ids: Vec<String>,
}

impl CurrentUser {
    /// Creates a user identity from session data.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_name: impl Into<String>,
        user_type: UserType,
        teams_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
            user_type,
            teams_ids,
        }
    }

    /// Returns the stable user record id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the login name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Returns the account kind.
    #[must_use]
    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    /// Returns the ids of the teams the user belongs to.
    #[must_use]
    pub fn teams_ids(&self) -> &[String] {
        &self.teams_ids
    }

    /// Returns whether the user bypasses the permission table.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.user_type, UserType::Admin | UserType::SuperAdmin)
    }
}
