//! Lap state machine: a timed sub-interval inside a session.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lap state machine errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LapError {
    /// `start` was called on a lap that already carries a start time.
    #[error("lap already started")]
    AlreadyStarted,
    /// `stop` was called on a lap that is already inactive.
    #[error("lap already stopped")]
    AlreadyStopped,
    /// `duration` was queried before the lap ended.
    #[error("lap has not been stopped")]
    NotStopped,
}

/// Derived lifecycle state of a [`Lap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapStatus {
    /// No end time recorded yet. Initial state.
    Active,
    /// End time recorded. Terminal: laps cannot be restarted.
    Inactive,
}

/// A timed sub-interval owned by a session.
///
/// Laps have no identity of their own; a session addresses them by their
/// zero-based position in insertion order. All mutation goes through
/// [`Session`](crate::Session), which starts every lap it creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<DateTime<Utc>>,
}

impl Lap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Derived from `end_time` on every call, never stored.
    pub fn status(&self) -> LapStatus {
        if self.end_time.is_none() {
            LapStatus::Active
        } else {
            LapStatus::Inactive
        }
    }

    /// Records the start time.
    ///
    /// Fails with [`LapError::AlreadyStarted`] when a start time is
    /// already present. Since every lap inside a session is started the
    /// moment it is created, this also rules out restarting a stopped lap.
    pub(crate) fn start_at(&mut self, at: DateTime<Utc>) -> Result<(), LapError> {
        if self.start_time.is_some() {
            return Err(LapError::AlreadyStarted);
        }
        self.start_time = Some(at);
        Ok(())
    }

    /// Records the end time. Legal only while the lap is active.
    pub(crate) fn stop_at(&mut self, at: DateTime<Utc>) -> Result<(), LapError> {
        if self.status() == LapStatus::Inactive {
            return Err(LapError::AlreadyStopped);
        }
        self.end_time = Some(at);
        Ok(())
    }

    /// Elapsed time between start and end.
    ///
    /// Unlike [`Session::duration`](crate::Session::duration), no ordering
    /// check is performed: a caller-supplied out-of-order stop time yields
    /// a negative delta. The asymmetry is intentional.
    pub fn duration(&self) -> Result<TimeDelta, LapError> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Ok(end - start),
            _ => Err(LapError::NotStopped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, secs).unwrap()
    }

    #[test]
    fn fresh_lap_is_active_after_start() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        assert_eq!(lap.status(), LapStatus::Active);
        assert_eq!(lap.start_time(), Some(ts(0)));
        assert!(lap.end_time().is_none());
    }

    #[test]
    fn start_twice_fails() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        assert_eq!(lap.start_at(ts(1)), Err(LapError::AlreadyStarted));
    }

    #[test]
    fn stopped_lap_cannot_restart() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        lap.stop_at(ts(5)).unwrap();
        assert_eq!(lap.start_at(ts(10)), Err(LapError::AlreadyStarted));
    }

    #[test]
    fn stop_twice_fails() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        lap.stop_at(ts(5)).unwrap();
        assert_eq!(lap.status(), LapStatus::Inactive);
        assert_eq!(lap.stop_at(ts(6)), Err(LapError::AlreadyStopped));
    }

    #[test]
    fn duration_requires_end_time() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        assert_eq!(lap.duration(), Err(LapError::NotStopped));

        lap.stop_at(ts(30)).unwrap();
        assert_eq!(lap.duration().unwrap(), TimeDelta::seconds(30));
    }

    #[test]
    fn duration_may_be_negative() {
        // No ordering check at the lap level.
        let mut lap = Lap::new();
        lap.start_at(ts(30)).unwrap();
        lap.stop_at(ts(10)).unwrap();
        assert_eq!(lap.duration().unwrap(), TimeDelta::seconds(-20));
    }

    #[test]
    fn lap_serde_roundtrip() {
        let mut lap = Lap::new();
        lap.start_at(ts(0)).unwrap();
        lap.stop_at(ts(42)).unwrap();

        let json = serde_json::to_string(&lap).unwrap();
        let parsed: Lap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lap);
    }
}
