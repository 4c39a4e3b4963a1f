use async_trait::async_trait;
use crmdesk_core::{AppResult, CurrentUser};
use crmdesk_domain::{AclData, DetailLayout, EntityMetadata, ListLayout};
use serde::{Deserialize, Serialize};

/// Layout flavours served per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Record detail/edit panels.
    Detail,
    /// Record list columns.
    List,
}

impl LayoutKind {
    /// Returns the stable name used in storage paths.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::List => "list",
        }
    }
}

/// A layout returned by a metadata source.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityLayout {
    /// Detail panels.
    Detail(DetailLayout),
    /// List columns.
    List(ListLayout),
}

impl EntityLayout {
    /// Returns the layout flavour.
    #[must_use]
    pub fn kind(&self) -> LayoutKind {
        match self {
            Self::Detail(_) => LayoutKind::Detail,
            Self::List(_) => LayoutKind::List,
        }
    }
}

/// Identity and permission tables of the authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Signed-in user.
    pub user: CurrentUser,
    /// Permission tables.
    #[serde(default)]
    pub acl: AclData,
}

/// Port for entity metadata and layouts.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches metadata for every entity type visible to the session.
    async fn fetch_metadata(&self) -> AppResult<EntityMetadata>;

    /// Fetches a declared layout; `None` means the caller synthesizes one.
    async fn fetch_layout(
        &self,
        entity_type: &str,
        kind: LayoutKind,
    ) -> AppResult<Option<EntityLayout>>;
}

/// Port for the authenticated session.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetches the current user and permission tables.
    async fn fetch_session(&self) -> AppResult<SessionPayload>;
}
