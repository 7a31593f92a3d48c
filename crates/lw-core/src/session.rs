//! Session state machine: the top-level tracked time interval.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lap::{Lap, LapError};
use crate::types::SessionId;

/// Session state machine errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `start` was called on a session that is not idle. Sessions can only
    /// be started once across their lifetime; there is no restart path.
    #[error("session already started")]
    AlreadyStarted,
    /// The operation needs a running session and there is no start time.
    #[error("session has not been started")]
    NotStarted,
    /// `duration` was queried before the session was stopped.
    #[error("session has not been stopped")]
    NotStopped,
    /// The recorded start time is after the recorded end time.
    #[error("session start time {start} is after end time {end}")]
    StartAfterEnd {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A lap-level transition failed.
    #[error(transparent)]
    Lap(#[from] LapError),
}

/// Derived lifecycle state of a [`Session`].
///
/// Recomputed from the two timestamps on every call so it cannot
/// desynchronize from the underlying fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No start time. Initial state.
    Idle,
    /// Start time set, end time absent.
    Running,
    /// Both timestamps set, start ≤ end. Terminal.
    Completed,
    /// Both timestamps set, start after end. Terminal.
    Invalid,
}

/// A tracked time interval for one identifier, owning an ordered sequence
/// of laps.
///
/// Sessions are plain values with no internal synchronization; callers
/// must not mutate the same session concurrently without their own
/// locking. Removal is a storage-layer operation, not a session one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    laps: Vec<Lap>,
}

impl Session {
    /// Creates an idle session: no timestamps, no laps.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            start_time: None,
            end_time: None,
            laps: Vec::new(),
        }
    }

    /// The identifier, immutable after construction.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// The laps in insertion order.
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Derives the status from the two timestamps. Never cached.
    pub fn status(&self) -> SessionStatus {
        match (self.start_time, self.end_time) {
            (None, _) => SessionStatus::Idle,
            (Some(_), None) => SessionStatus::Running,
            (Some(start), Some(end)) if start <= end => SessionStatus::Completed,
            (Some(_), Some(_)) => SessionStatus::Invalid,
        }
    }

    /// Starts the session now. See [`Session::start_at`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_at(Utc::now())
    }

    /// Starts the session at the given instant. Legal only from idle.
    pub fn start_at(&mut self, at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.status() != SessionStatus::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        self.start_time = Some(at);
        Ok(())
    }

    /// Stops the session now. See [`Session::stop_at`].
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.stop_at(Utc::now())
    }

    /// Stops the session at the given instant. Legal only while running.
    pub fn stop_at(&mut self, at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.status() != SessionStatus::Running {
            return Err(SessionError::NotStarted);
        }
        self.end_time = Some(at);
        Ok(())
    }

    /// Elapsed time between start and end.
    ///
    /// Requires a completed session: fails with
    /// [`SessionError::NotStarted`] when the start time is absent,
    /// [`SessionError::NotStopped`] when the end time is absent, and
    /// [`SessionError::StartAfterEnd`] when the timestamps are out of
    /// order. The result is never negative; zero is valid when the two
    /// timestamps are equal.
    pub fn duration(&self) -> Result<TimeDelta, SessionError> {
        let start = self.start_time.ok_or(SessionError::NotStarted)?;
        let end = self.end_time.ok_or(SessionError::NotStopped)?;
        if start > end {
            return Err(SessionError::StartAfterEnd { start, end });
        }
        Ok(end - start)
    }

    /// Creates a lap starting now. See [`Session::add_lap_at`].
    pub fn add_lap(&mut self) -> Result<Lap, SessionError> {
        self.add_lap_at(Utc::now())
    }

    /// Creates a lap started at the given instant, appends it, and returns
    /// a copy of it.
    ///
    /// The error branch is unreachable in practice: a freshly constructed
    /// lap is always startable.
    pub fn add_lap_at(&mut self, at: DateTime<Utc>) -> Result<Lap, SessionError> {
        let mut lap = Lap::new();
        lap.start_at(at)?;
        self.laps.push(lap.clone());
        Ok(lap)
    }

    /// The lap at the given zero-based position, or `None` outside
    /// `[0, len)`. Read-only.
    pub fn lap_at(&self, position: usize) -> Option<&Lap> {
        self.laps.get(position)
    }

    /// Stops the lap at `position` now. See [`Session::stop_lap_at`].
    pub fn stop_lap(&mut self, position: usize) -> Result<(), SessionError> {
        self.stop_lap_at(position, Utc::now())
    }

    /// Stops the lap at `position` at the given instant.
    ///
    /// An out-of-range position is absorbed as a no-op rather than
    /// rejected. Stopping an already-stopped lap propagates
    /// [`LapError::AlreadyStopped`].
    pub fn stop_lap_at(&mut self, position: usize, at: DateTime<Utc>) -> Result<(), SessionError> {
        let Some(lap) = self.laps.get_mut(position) else {
            return Ok(());
        };
        lap.stop_at(at)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lap::LapStatus;
    use chrono::TimeZone;

    fn sid(token: &str) -> SessionId {
        SessionId::new(token).unwrap()
    }

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, secs).unwrap()
    }

    #[test]
    fn new_session_is_idle() {
        let session = Session::new(sid("s1"));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.start_time().is_none());
        assert!(session.end_time().is_none());
        assert!(session.laps().is_empty());
    }

    #[test]
    fn status_is_pure_function_of_timestamps() {
        let mut session = Session::new(sid("s1"));
        assert_eq!(session.status(), session.status());

        session.start_at(ts(0)).unwrap();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.status(), SessionStatus::Running);

        session.stop_at(ts(10)).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn start_twice_fails_for_any_timestamps() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();
        assert_eq!(session.start_at(ts(1)), Err(SessionError::AlreadyStarted));
        // Also once stopped: there is no restart path.
        session.stop_at(ts(2)).unwrap();
        assert_eq!(session.start_at(ts(3)), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn stop_before_start_fails() {
        let mut session = Session::new(sid("s1"));
        assert_eq!(session.stop_at(ts(0)), Err(SessionError::NotStarted));
    }

    #[test]
    fn stop_twice_fails() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();
        session.stop_at(ts(5)).unwrap();
        assert_eq!(session.stop_at(ts(6)), Err(SessionError::NotStarted));
    }

    #[test]
    fn duration_of_equal_timestamps_is_zero() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(7)).unwrap();
        session.stop_at(ts(7)).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.duration().unwrap(), TimeDelta::zero());
    }

    #[test]
    fn duration_errors_map_to_missing_fields() {
        let mut session = Session::new(sid("s1"));
        assert_eq!(session.duration(), Err(SessionError::NotStarted));

        session.start_at(ts(0)).unwrap();
        assert_eq!(session.duration(), Err(SessionError::NotStopped));
    }

    #[test]
    fn duration_rejects_out_of_order_timestamps() {
        let mut session = Session::new(sid("s2"));
        session.start_at(ts(30)).unwrap();
        session.stop_at(ts(10)).unwrap();

        assert_eq!(session.status(), SessionStatus::Invalid);
        assert_eq!(
            session.duration(),
            Err(SessionError::StartAfterEnd {
                start: ts(30),
                end: ts(10),
            })
        );
    }

    #[test]
    fn add_lap_appends_started_lap() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();

        let lap = session.add_lap_at(ts(1)).unwrap();
        assert_eq!(lap.start_time(), Some(ts(1)));
        assert_eq!(lap.status(), LapStatus::Active);

        assert_eq!(session.laps().len(), 1);
        assert_eq!(session.lap_at(0), Some(&lap));
        assert!(session.lap_at(1).is_none());
    }

    #[test]
    fn laps_keep_insertion_order() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();
        session.add_lap_at(ts(1)).unwrap();
        session.add_lap_at(ts(2)).unwrap();
        session.add_lap_at(ts(3)).unwrap();

        let starts: Vec<_> = session.laps().iter().map(Lap::start_time).collect();
        assert_eq!(starts, vec![Some(ts(1)), Some(ts(2)), Some(ts(3))]);
    }

    #[test]
    fn stop_lap_out_of_range_is_noop() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();
        session.add_lap_at(ts(1)).unwrap();

        assert!(session.stop_lap_at(5, ts(2)).is_ok());
        assert_eq!(session.lap_at(0).unwrap().status(), LapStatus::Active);
    }

    #[test]
    fn stop_same_lap_twice_fails() {
        let mut session = Session::new(sid("s1"));
        session.start_at(ts(0)).unwrap();
        session.add_lap_at(ts(1)).unwrap();

        session.stop_lap_at(0, ts(2)).unwrap();
        assert_eq!(
            session.stop_lap_at(0, ts(3)),
            Err(SessionError::Lap(LapError::AlreadyStopped))
        );
    }

    #[test]
    fn full_tracking_scenario() {
        // S1: idle → start(t0) → running → add_lap → stop(t1) → completed
        let mut session = Session::new(sid("s1"));
        assert_eq!(session.status(), SessionStatus::Idle);

        session.start_at(ts(0)).unwrap();
        assert_eq!(session.status(), SessionStatus::Running);

        session.add_lap_at(ts(10)).unwrap();

        session.stop_at(ts(45)).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.duration().unwrap(), TimeDelta::seconds(45));
    }

    #[test]
    fn invalid_scenario_blocks_duration() {
        // S2: start in the future, stop in the past.
        let mut session = Session::new(sid("s2"));
        session.start_at(ts(50)).unwrap();
        session.stop_at(ts(5)).unwrap();

        assert_eq!(session.status(), SessionStatus::Invalid);
        assert!(session.duration().is_err());
    }

    #[test]
    fn session_serde_roundtrip() {
        let mut session = Session::new(sid("round-trip"));
        session.start_at(ts(0)).unwrap();
        session.add_lap_at(ts(1)).unwrap();
        session.stop_lap_at(0, ts(2)).unwrap();
        session.stop_at(ts(3)).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
        assert_eq!(parsed.status(), SessionStatus::Completed);
    }

    #[test]
    fn idle_session_serde_defaults() {
        let parsed: Session = serde_json::from_str(r#"{"id":"bare"}"#).unwrap();
        assert_eq!(parsed.status(), SessionStatus::Idle);
        assert!(parsed.laps().is_empty());
    }
}
