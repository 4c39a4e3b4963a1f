use std::collections::HashMap;

use async_trait::async_trait;
use crmdesk_application::{EntityLayout, LayoutKind, MetadataSource};
use crmdesk_core::AppResult;
use crmdesk_domain::EntityMetadata;
use tokio::sync::RwLock;

/// In-memory metadata source implementation.
#[derive(Debug, Default)]
pub struct InMemoryMetadataSource {
    metadata: RwLock<EntityMetadata>,
    layouts: RwLock<HashMap<(String, LayoutKind), EntityLayout>>,
}

impl InMemoryMetadataSource {
    /// Creates a source serving the given metadata and no declared layouts.
    #[must_use]
    pub fn new(metadata: EntityMetadata) -> Self {
        Self {
            metadata: RwLock::new(metadata),
            layouts: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the served metadata.
    pub async fn replace_metadata(&self, metadata: EntityMetadata) {
        *self.metadata.write().await = metadata;
    }

    /// Declares a layout for an entity type, replacing any previous one of the same kind.
    pub async fn save_layout(&self, entity_type: impl Into<String>, layout: EntityLayout) {
        let key = (entity_type.into(), layout.kind());
        self.layouts.write().await.insert(key, layout);
    }
}

#[async_trait]
impl MetadataSource for InMemoryMetadataSource {
    async fn fetch_metadata(&self) -> AppResult<EntityMetadata> {
        Ok(self.metadata.read().await.clone())
    }

    async fn fetch_layout(
        &self,
        entity_type: &str,
        kind: LayoutKind,
    ) -> AppResult<Option<EntityLayout>> {
        Ok(self
            .layouts
            .read()
            .await
            .get(&(entity_type.to_owned(), kind))
            .cloned())
    }
}
