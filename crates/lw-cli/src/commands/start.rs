//! `lw start` - begin tracking a session.

use anyhow::{Context, Result};
use lw_core::SessionId;
use lw_store::SessionManager;

pub async fn run(manager: &SessionManager, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    manager
        .start_tracking(&id)
        .await
        .with_context(|| format!("failed to start tracking {id}"))?;
    println!("started tracking {id}");
    Ok(())
}
