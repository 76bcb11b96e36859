//! Serializable projections of timer state

use serde::{Deserialize, Serialize};

use super::format::TimerStatus;

/// Point-in-time view of the timer, sent to display and persistence sinks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub duration: u64,
    pub time_remaining: u64,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_completed: bool,
    pub progress: f64,
}

impl Snapshot {
    /// Which of the four timer modes this snapshot is in
    pub fn status(&self) -> TimerStatus {
        if self.is_completed {
            TimerStatus::Completed
        } else if !self.is_running {
            TimerStatus::Stopped
        } else if self.is_paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Running
        }
    }
}

/// Snapshot as read back from storage. Every field is optional so that a
/// partially written or older file still restores what it can.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedState {
    pub duration: Option<u64>,
    pub time_remaining: Option<u64>,
    pub is_running: Option<bool>,
    pub is_paused: Option<bool>,
    pub is_completed: Option<bool>,
}

impl SavedState {
    /// True when the saved timer was neither running nor completed
    pub fn is_stopped(&self) -> bool {
        !self.is_running.unwrap_or(false) && !self.is_completed.unwrap_or(false)
    }
}

impl From<Snapshot> for SavedState {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            duration: Some(snapshot.duration),
            time_remaining: Some(snapshot.time_remaining),
            is_running: Some(snapshot.is_running),
            is_paused: Some(snapshot.is_paused),
            is_completed: Some(snapshot.is_completed),
        }
    }
}
