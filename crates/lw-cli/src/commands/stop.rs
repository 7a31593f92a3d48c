//! `lw stop` - stop a running session.

use anyhow::{Context, Result};
use lw_core::SessionId;
use lw_store::SessionManager;

use super::status::format_delta;

pub async fn run(manager: &SessionManager, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    manager
        .stop_tracking(&id)
        .await
        .with_context(|| format!("failed to stop tracking {id}"))?;

    match manager.session(&id).await? {
        Some(session) => match session.duration() {
            Ok(duration) => println!("stopped tracking {id} after {}", format_delta(duration)),
            Err(_) => println!("stopped tracking {id}"),
        },
        None => println!("stopped tracking {id}"),
    }
    Ok(())
}
