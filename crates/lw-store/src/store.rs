//! The session storage capability.

use async_trait::async_trait;
use lw_core::{Session, SessionId};
use thiserror::Error;

/// An implementation-defined storage failure.
///
/// The manager propagates these verbatim; it never inspects or wraps the
/// underlying backend error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Asynchronous create/read/update/delete of sessions keyed by identifier.
///
/// A store holds sessions by value, at most one entry per identifier, and
/// mutates by whole-session replacement only (last write wins — no
/// optimistic concurrency token). Implementations are responsible for
/// serializing concurrent access to their underlying table. These four
/// operations are the designated suspension points of the system; callers
/// own cancellation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or replaces the stored session for its identifier.
    async fn register(&self, session: &Session) -> Result<(), StoreError>;

    /// Replaces the stored session with the given value.
    async fn update(&self, session: &Session) -> Result<(), StoreError>;

    /// Deletes the stored session for the identifier, if any. Idempotent.
    async fn remove(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Reads the session for the identifier.
    ///
    /// A miss is `Ok(None)`, never an error — callers must not conflate
    /// "not found" with failure.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;
}
