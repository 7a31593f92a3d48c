//! `lw status` - show the derived status of a session.

use anyhow::Result;
use chrono::TimeDelta;
use lw_core::{SessionId, SessionStatus};
use lw_store::SessionManager;

pub async fn run(manager: &SessionManager, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    let Some(session) = manager.session(&id).await? else {
        println!("no session for {id}");
        return Ok(());
    };

    match session.status() {
        SessionStatus::Idle => println!("{id}: idle"),
        SessionStatus::Running => {
            // Running implies a start time by construction.
            if let Some(start) = session.start_time() {
                println!("{id}: running since {start}");
            }
        }
        SessionStatus::Completed => {
            let duration = session.duration()?;
            println!("{id}: completed after {}", format_delta(duration));
        }
        SessionStatus::Invalid => {
            println!("{id}: invalid (start time is after end time)");
        }
    }

    if !session.laps().is_empty() {
        println!("laps: {}", session.laps().len());
    }
    Ok(())
}

/// Formats a non-negative delta as `HHh MMm SSs`.
pub(crate) fn format_delta(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h {minutes:02}m {seconds:02}s")
}
