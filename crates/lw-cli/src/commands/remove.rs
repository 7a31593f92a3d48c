//! `lw remove` - delete a session from storage.

use anyhow::{Context, Result};
use lw_core::SessionId;
use lw_store::SessionStore;

pub async fn run(store: &dyn SessionStore, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    store
        .remove(&id)
        .await
        .with_context(|| format!("failed to remove session {id}"))?;
    println!("removed {id}");
    Ok(())
}
