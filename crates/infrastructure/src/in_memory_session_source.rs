use async_trait::async_trait;
use crmdesk_application::{SessionPayload, SessionSource};
use crmdesk_core::{AppError, AppResult};
use tokio::sync::RwLock;

/// In-memory session source; empty until a session is signed in.
#[derive(Debug, Default)]
pub struct InMemorySessionSource {
    session: RwLock<Option<SessionPayload>>,
}

impl InMemorySessionSource {
    /// Creates a source holding the given session.
    #[must_use]
    pub fn new(session: SessionPayload) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }

    /// Replaces the held session.
    pub async fn sign_in(&self, session: SessionPayload) {
        *self.session.write().await = Some(session);
    }

    /// Clears the held session.
    pub async fn sign_out(&self) {
        self.session.write().await.take();
    }
}

#[async_trait]
impl SessionSource for InMemorySessionSource {
    async fn fetch_session(&self) -> AppResult<SessionPayload> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Forbidden("no active session".to_owned()))
    }
}
