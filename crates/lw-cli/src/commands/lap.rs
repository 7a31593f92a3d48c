//! `lw lap` - manage laps inside a session.
//!
//! Laps are mutated on a loaded session value and the result is persisted
//! back through the store as a whole-session replacement.

use anyhow::{Context, Result, bail};
use lw_core::SessionId;
use lw_store::SessionStore;

pub async fn add(store: &dyn SessionStore, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    let Some(mut session) = store.find_by_id(&id).await? else {
        bail!("no session for {id}");
    };

    session.add_lap()?;
    store
        .update(&session)
        .await
        .with_context(|| format!("failed to persist session {id}"))?;
    println!(
        "added lap {} to {id}",
        session.laps().len().saturating_sub(1)
    );
    Ok(())
}

pub async fn stop(store: &dyn SessionStore, id: &str, position: usize) -> Result<()> {
    let id = SessionId::new(id)?;
    let Some(mut session) = store.find_by_id(&id).await? else {
        bail!("no session for {id}");
    };

    session
        .stop_lap(position)
        .with_context(|| format!("failed to stop lap {position} of {id}"))?;
    store
        .update(&session)
        .await
        .with_context(|| format!("failed to persist session {id}"))?;
    println!("stopped lap {position} of {id}");
    Ok(())
}
