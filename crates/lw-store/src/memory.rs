//! Reference in-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use lw_core::{Session, SessionId};
use tokio::sync::RwLock;

use crate::store::{SessionStore, StoreError};

/// A session store backed by a process-local table.
///
/// Construct one explicitly and inject it where needed; there is no
/// global instance. The table is guarded by an async `RwLock`, so
/// concurrent operations on one store serialize against each other.
/// Operations never fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn register(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), StoreError> {
        // Whole-session replacement, same as register.
        self.register(session).await
    }

    async fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }
}
