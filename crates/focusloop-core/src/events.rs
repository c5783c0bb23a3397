use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionStatus, SessionType, Settings};

/// Every state change in the store produces an Event.
/// Hosts log them, print them, or forward them to integrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        remaining: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_type: SessionType,
        remaining: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        duration: u64,
        at: DateTime<Utc>,
    },
    RemainingUpdated {
        remaining: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completed: SessionType,
        next: SessionType,
        next_duration: u64,
        completed_count: usize,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_type: SessionType,
        status: SessionStatus,
        remaining: u64,
        duration: u64,
        progress: f64,
        completed_pomodoros: usize,
        pomodoros_until_long_break: u32,
        at: DateTime<Utc>,
    },
}
