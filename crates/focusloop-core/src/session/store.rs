//! Owned, observable holder of the session cycle.
//!
//! The store does not run a clock. The host drives it:
//!
//! ```ignore
//! let mut store = SessionStore::new();
//! let id = store.subscribe(|state| render(state));
//! store.start_timer();
//! // On every tick of the host's clock:
//! store.update_remaining(remaining - 1);
//! // When remaining reaches zero:
//! store.complete_session();
//! ```

use chrono::Utc;

use super::settings::{Settings, SettingsPatch};
use super::state::TimerState;
use crate::error::Result;
use crate::events::Event;

/// Change listener. Called with the current state on subscribe and with
/// every new state afterwards.
pub type Listener = Box<dyn FnMut(&TimerState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct SessionStore {
    state: TimerState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionStore {
    /// Store with default settings and an idle full-length pomodoro.
    pub fn new() -> Self {
        Self::build(TimerState::default())
    }

    /// # Errors
    ///
    /// Returns a validation error for zero durations or a zero interval.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(TimerState::new(settings)))
    }

    /// Resume from a state the host persisted earlier.
    ///
    /// A countdown above the session duration is clamped.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the restored settings hold a zero
    /// duration or a zero interval.
    pub fn from_state(state: TimerState) -> Result<Self> {
        state.settings.validate()?;
        let remaining = state.current_session.remaining;
        let state = state.with_remaining(remaining);
        Ok(Self::build(state))
    }

    fn build(state: TimerState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let session = &self.state.current_session;
        Event::StateSnapshot {
            session_type: session.session_type,
            status: session.status,
            remaining: session.remaining,
            duration: session.duration,
            progress: session.progress(),
            completed_pomodoros: self.state.completed_pomodoros(),
            pomodoros_until_long_break: self.state.pomodoros_until_long_break(),
            at: Utc::now(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a listener; it is invoked immediately with the current state.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TimerState) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.state);
        self.listeners.push((id, listener));
        tracing::debug!(id = id.0, "listener subscribed");
        id
    }

    /// Returns `false` if the id was unknown or already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        let removed = self.listeners.len() != before;
        if removed {
            tracing::debug!(id = id.0, "listener unsubscribed");
        }
        removed
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Event {
        let next = self.state.started();
        self.commit(next);
        let session = &self.state.current_session;
        Event::TimerStarted {
            session_type: session.session_type,
            remaining: session.remaining,
            at: Utc::now(),
        }
    }

    pub fn pause_timer(&mut self) -> Event {
        let next = self.state.paused();
        self.commit(next);
        let session = &self.state.current_session;
        Event::TimerPaused {
            session_type: session.session_type,
            remaining: session.remaining,
            at: Utc::now(),
        }
    }

    pub fn reset_timer(&mut self) -> Event {
        let next = self.state.reset();
        self.commit(next);
        let session = &self.state.current_session;
        Event::TimerReset {
            session_type: session.session_type,
            duration: session.duration,
            at: Utc::now(),
        }
    }

    /// Set the countdown verbatim (clamped to the session duration).
    /// Reaching zero does not complete the session.
    pub fn update_remaining(&mut self, seconds: u64) -> Event {
        let next = self.state.with_remaining(seconds);
        self.commit(next);
        Event::RemainingUpdated {
            remaining: self.state.current_session.remaining,
            at: Utc::now(),
        }
    }

    /// Archive the current session and queue the next one.
    pub fn complete_session(&mut self) -> Event {
        let at = Utc::now();
        let completed = self.state.current_session.session_type;
        let next = self.state.completed(at);
        self.commit(next);

        let session = &self.state.current_session;
        tracing::debug!(
            ?completed,
            next = ?session.session_type,
            total = self.state.completed_sessions.len(),
            "session completed"
        );
        Event::SessionCompleted {
            completed,
            next: session.session_type,
            next_duration: session.duration,
            completed_count: self.state.completed_sessions.len(),
            at,
        }
    }

    /// Merge `patch` into the settings and restart the current session at
    /// its new full length.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the state untouched and
    /// listeners un-notified, if the merged settings are invalid.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<Event> {
        let settings = self.state.settings.merged(&patch);
        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "rejected settings update");
            return Err(e.into());
        }
        let next = self.state.with_settings(settings);
        self.commit(next);
        Ok(Event::SettingsUpdated {
            settings,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn commit(&mut self, next: TimerState) {
        tracing::debug!(
            session_type = ?next.current_session.session_type,
            status = ?next.current_session.status,
            remaining = next.current_session.remaining,
            "state replaced"
        );
        self.state = next;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }
}
