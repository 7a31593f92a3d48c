//! Session storage capability and tracking orchestration.
//!
//! This crate defines the asynchronous [`SessionStore`] capability that
//! persistence backends implement, ships the reference in-memory backend,
//! and layers the [`SessionManager`] create-or-resume orchestration on
//! top of any store.

mod manager;
mod memory;
mod store;

pub use manager::{ManagerError, SessionManager, TimeTracking};
pub use memory::MemoryStore;
pub use store::{SessionStore, StoreError};
