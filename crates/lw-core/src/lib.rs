//! Core domain logic for lapwatch.
//!
//! This crate contains the fundamental types and state machines:
//! - Session: the top-level tracked time interval for one identifier
//! - Lap: a sub-interval nested inside a session, addressed by position
//!
//! Everything here is synchronous and free of I/O. Storage and
//! orchestration live in `lw-store` and `lw-db`.

mod lap;
mod session;
mod types;

pub use lap::{Lap, LapError, LapStatus};
pub use session::{Session, SessionError, SessionStatus};
pub use types::{SessionId, ValidationError};
