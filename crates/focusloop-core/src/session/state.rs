//! Session cycle state and its pure transitions.
//!
//! Every transition borrows the current [`TimerState`] and returns a fresh
//! value; nothing is mutated in place. [`super::SessionStore`] swaps the
//! returned value in and notifies listeners.
//!
//! ## Cycle
//!
//! ```text
//! Pomodoro -> ShortBreak -> Pomodoro -> ... -> Pomodoro -> LongBreak -> Pomodoro
//!                                         (every `long_break_interval` pomodoros)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn is_break(self) -> bool {
        !matches!(self, SessionType::Pomodoro)
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Pomodoro => "Pomodoro",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
}

/// One timed interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Total seconds allotted, fixed when the session is created.
    pub duration: u64,
    /// Seconds left.
    pub remaining: u64,
    pub status: SessionStatus,
    /// Set only once the session is archived into history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A fresh idle session at full length.
    pub fn new(session_type: SessionType, settings: &Settings) -> Self {
        let duration = settings.duration_for(session_type);
        Self {
            session_type,
            duration,
            remaining: duration,
            status: SessionStatus::Idle,
            completed_at: None,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.duration.saturating_sub(self.remaining)
    }

    /// 0.0 .. 1.0 progress within the session.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.elapsed() as f64 / self.duration as f64).clamp(0.0, 1.0)
    }

    fn with_status(&self, status: SessionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// The whole session cycle: the active session, archived history and
/// the settings in force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub current_session: Session,
    /// Append-only, in completion order.
    pub completed_sessions: Vec<Session>,
    pub settings: Settings,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl TimerState {
    /// Idle pomodoro at full length with empty history.
    pub fn new(settings: Settings) -> Self {
        Self {
            current_session: Session::new(SessionType::Pomodoro, &settings),
            completed_sessions: Vec::new(),
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn completed_pomodoros(&self) -> usize {
        self.completed_sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Pomodoro)
            .count()
    }

    /// Seconds spent in archived pomodoros.
    pub fn focused_seconds(&self) -> u64 {
        self.completed_sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Pomodoro)
            .map(|s| s.duration)
            .sum()
    }

    /// Pomodoros still to complete (including a current one) before the
    /// next long break.
    pub fn pomodoros_until_long_break(&self) -> u32 {
        let interval = self.settings.long_break_interval;
        if interval == 0 {
            return 0;
        }
        let into_cycle = (self.completed_pomodoros() % interval as usize) as u32;
        interval - into_cycle
    }

    /// Type that follows the current session once it completes.
    pub fn next_session_type(&self) -> SessionType {
        match self.current_session.session_type {
            SessionType::Pomodoro => {
                let count = self.completed_pomodoros() + 1;
                let interval = self.settings.long_break_interval as usize;
                // A zero interval never schedules a long break.
                if interval != 0 && count % interval == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Pomodoro,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn started(&self) -> Self {
        self.with_current(self.current_session.with_status(SessionStatus::Running))
    }

    pub fn paused(&self) -> Self {
        self.with_current(self.current_session.with_status(SessionStatus::Paused))
    }

    /// Back to full length and idle; progress is dropped, not archived.
    pub fn reset(&self) -> Self {
        let session = Session {
            remaining: self.current_session.duration,
            status: SessionStatus::Idle,
            ..self.current_session.clone()
        };
        self.with_current(session)
    }

    /// Overwrite the countdown. Values above `duration` are clamped.
    ///
    /// Reaching zero does not complete the session; the tick source calls
    /// [`TimerState::completed`] for that.
    pub fn with_remaining(&self, seconds: u64) -> Self {
        let duration = self.current_session.duration;
        let remaining = if seconds > duration {
            tracing::warn!(
                seconds,
                duration,
                "remaining exceeds session duration, clamping"
            );
            duration
        } else {
            seconds
        };
        let session = Session {
            remaining,
            ..self.current_session.clone()
        };
        self.with_current(session)
    }

    /// Archive the current session and line up the next one.
    pub fn completed(&self, at: DateTime<Utc>) -> Self {
        let archived = Session {
            status: SessionStatus::Idle,
            completed_at: Some(at),
            ..self.current_session.clone()
        };
        let next = Session::new(self.next_session_type(), &self.settings);

        let mut completed_sessions = Vec::with_capacity(self.completed_sessions.len() + 1);
        completed_sessions.extend(self.completed_sessions.iter().cloned());
        completed_sessions.push(archived);

        Self {
            current_session: next,
            completed_sessions,
            settings: self.settings,
        }
    }

    /// Install new settings and restart the current session from its new
    /// full length. History is left untouched.
    ///
    /// Callers are expected to have validated `settings`.
    pub fn with_settings(&self, settings: Settings) -> Self {
        let session_type = self.current_session.session_type;
        let duration = settings.duration_for(session_type);
        Self {
            current_session: Session {
                session_type,
                duration,
                remaining: duration,
                status: SessionStatus::Idle,
                completed_at: None,
            },
            completed_sessions: self.completed_sessions.clone(),
            settings,
        }
    }

    fn with_current(&self, current_session: Session) -> Self {
        Self {
            current_session,
            completed_sessions: self.completed_sessions.clone(),
            settings: self.settings,
        }
    }
}
