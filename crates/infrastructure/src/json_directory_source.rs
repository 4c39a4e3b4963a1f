use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crmdesk_application::{
    EntityLayout, LayoutKind, MetadataSource, SessionPayload, SessionSource,
};
use crmdesk_core::{AppError, AppResult};
use crmdesk_domain::{DetailLayout, EntityMetadata, ListLayout};
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

#[cfg(test)]
mod tests;

/// Snapshot source backed by a directory of exported JSON payloads.
///
/// ```text
/// <root>/metadata.json
/// <root>/session.json
/// <root>/layouts/<Entity>/detail.json
/// <root>/layouts/<Entity>/list.json
/// ```
///
/// Layout files are optional.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    /// Creates a source reading from the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the snapshot directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn layout_path(&self, entity_type: &str, kind: LayoutKind) -> AppResult<PathBuf> {
        let safe = !entity_type.is_empty()
            && entity_type
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || character == '_');
        if !safe {
            return Err(AppError::Validation(format!(
                "entity type '{entity_type}' is not a valid layout directory name"
            )));
        }

        Ok(self
            .root
            .join("layouts")
            .join(entity_type)
            .join(format!("{}.json", kind.as_str())))
    }
}

#[async_trait]
impl MetadataSource for JsonDirectorySource {
    async fn fetch_metadata(&self) -> AppResult<EntityMetadata> {
        read_json_file(&self.root.join("metadata.json")).await
    }

    async fn fetch_layout(
        &self,
        entity_type: &str,
        kind: LayoutKind,
    ) -> AppResult<Option<EntityLayout>> {
        let path = self.layout_path(entity_type, kind)?;
        let exists = fs::try_exists(&path).await.map_err(|error| {
            AppError::Internal(format!("failed to stat '{}': {error}", path.display()))
        })?;
        if !exists {
            debug!(entity_type, kind = kind.as_str(), "no layout file");
            return Ok(None);
        }

        let layout = match kind {
            LayoutKind::Detail => EntityLayout::Detail(read_json_file::<DetailLayout>(&path).await?),
            LayoutKind::List => EntityLayout::List(read_json_file::<ListLayout>(&path).await?),
        };

        Ok(Some(layout))
    }
}

#[async_trait]
impl SessionSource for JsonDirectorySource {
    async fn fetch_session(&self) -> AppResult<SessionPayload> {
        read_json_file(&self.root.join("session.json")).await
    }
}

/// Reads and parses one JSON file.
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = fs::read_to_string(path).await.map_err(|error| {
        if error.kind() == ErrorKind::NotFound {
            AppError::NotFound(format!("'{}' does not exist", path.display()))
        } else {
            AppError::Internal(format!("failed to read '{}': {error}", path.display()))
        }
    })?;

    serde_json::from_str(&raw).map_err(|error| {
        AppError::Internal(format!("failed to parse '{}': {error}", path.display()))
    })
}
