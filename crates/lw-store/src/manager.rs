//! Create-or-resume tracking orchestration over a session store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lw_core::{Session, SessionError, SessionId};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::store::{SessionStore, StoreError};

/// Manager-level errors, stable across storage implementations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Tracking was already started for this identifier.
    #[error("session {id} is already being tracked")]
    AlreadyTracking { id: SessionId },
    /// A session-level transition failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The storage backend failed; propagated verbatim.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The time-tracking capability consumed by external callers.
#[async_trait]
pub trait TimeTracking: Send + Sync {
    async fn start_tracking(&self, id: &SessionId) -> Result<(), ManagerError>;
    async fn stop_tracking(&self, id: &SessionId) -> Result<(), ManagerError>;
}

/// Orchestrates "start or resume" semantics against a [`SessionStore`].
///
/// The manager is a stateless coordinator: it holds no session data of
/// its own, only the storage collaborator and a per-identifier lock table
/// that spans each load → mutate → persist sequence. Two concurrent
/// `start_tracking` calls for the same identifier therefore serialize,
/// and exactly one of them wins.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionManager {
    /// Creates a manager over the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The lock guarding read-modify-write sequences for one identifier.
    async fn lock_for(&self, id: &SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id.clone()).or_default().clone()
    }

    /// Starts tracking for the identifier.
    ///
    /// Loads the existing session (a miss yields a fresh idle session with
    /// that identifier), starts it now, and persists it back regardless of
    /// whether it was new. Fails with [`ManagerError::AlreadyTracking`]
    /// when the session was already started; store errors propagate
    /// unchanged.
    pub async fn start_tracking(&self, id: &SessionId) -> Result<(), ManagerError> {
        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .store
            .find_by_id(id)
            .await?
            .unwrap_or_else(|| Session::new(id.clone()));

        session.start().map_err(|err| match err {
            SessionError::AlreadyStarted => ManagerError::AlreadyTracking { id: id.clone() },
            other => ManagerError::Session(other),
        })?;

        self.store.register(&session).await?;
        tracing::debug!(%id, "tracking started");
        Ok(())
    }

    /// Stops tracking for the identifier.
    ///
    /// A miss behaves like stopping a session that was never started and
    /// fails with [`SessionError::NotStarted`].
    pub async fn stop_tracking(&self, id: &SessionId) -> Result<(), ManagerError> {
        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        let Some(mut session) = self.store.find_by_id(id).await? else {
            return Err(ManagerError::Session(SessionError::NotStarted));
        };

        session.stop()?;
        self.store.update(&session).await?;
        tracing::debug!(%id, "tracking stopped");
        Ok(())
    }

    /// Pure passthrough read; `Ok(None)` when the identifier is unknown.
    pub async fn session(&self, id: &SessionId) -> Result<Option<Session>, ManagerError> {
        Ok(self.store.find_by_id(id).await?)
    }
}

#[async_trait]
impl TimeTracking for SessionManager {
    async fn start_tracking(&self, id: &SessionId) -> Result<(), ManagerError> {
        Self::start_tracking(self, id).await
    }

    async fn stop_tracking(&self, id: &SessionId) -> Result<(), ManagerError> {
        Self::stop_tracking(self, id).await
    }
}
