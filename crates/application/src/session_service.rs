use std::sync::Arc;

use crmdesk_core::{AppResult, CurrentUser};
use crmdesk_domain::{AclData, EntityMetadata};
use tracing::info;

use crate::AclResolver;
use crate::view_ports::{MetadataSource, SessionSource};

/// Immutable per-session state injected into permission checks and composition.
///
/// Refreshing means loading a new snapshot; a snapshot is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    user: CurrentUser,
    acl: AclData,
    metadata: EntityMetadata,
}

impl SessionSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(user: CurrentUser, acl: AclData, metadata: EntityMetadata) -> Self {
        Self {
            user,
            acl,
            metadata,
        }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Returns the permission tables.
    #[must_use]
    pub fn acl(&self) -> &AclData {
        &self.acl
    }

    /// Returns the entity metadata.
    #[must_use]
    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    /// Returns a permission resolver bound to this session.
    #[must_use]
    pub fn acl_resolver(&self) -> AclResolver<'_> {
        AclResolver::new(&self.user, &self.acl)
    }
}

/// Application service building session snapshots from the session and metadata ports.
#[derive(Clone)]
pub struct SessionService {
    session_source: Arc<dyn SessionSource>,
    metadata_source: Arc<dyn MetadataSource>,
}

impl SessionService {
    /// Creates a new session service from port implementations.
    #[must_use]
    pub fn new(
        session_source: Arc<dyn SessionSource>,
        metadata_source: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            session_source,
            metadata_source,
        }
    }

    /// Loads a fresh snapshot.
    pub async fn load_snapshot(&self) -> AppResult<SessionSnapshot> {
        let session = self.session_source.fetch_session().await?;
        let metadata = self.metadata_source.fetch_metadata().await?;

        info!(
            user = %session.user.user_name(),
            entity_types = metadata.entity_types().count(),
            "session snapshot loaded"
        );

        Ok(SessionSnapshot::new(session.user, session.acl, metadata))
    }
}
