//! # Focusloop Core Library
//!
//! In-memory state for a Pomodoro session cycle: which session is active,
//! how far its countdown has run, what has been completed, and the
//! settings that decide what comes next.
//!
//! ## Architecture
//!
//! - **Session**: pure transitions over an immutable [`TimerState`] value,
//!   and an owned [`SessionStore`] that swaps states and notifies
//!   subscribers synchronously. The store never runs a clock; the host
//!   calls `update_remaining` from its own tick source and
//!   `complete_session` when the countdown reaches zero.
//! - **Events**: every command returns an [`Event`] describing the change.
//! - **Storage**: TOML configuration for session lengths. Session state
//!   itself is never written; it serializes with serde for hosts that
//!   want to keep it.
//!
//! ## Key Components
//!
//! - [`SessionStore`]: observable session-cycle holder
//! - [`TimerState`]: current session, history and settings
//! - [`Settings`]: durations and long-break cadence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use session::{
    duration_for, Session, SessionStatus, SessionStore, SessionType, Settings, SettingsPatch,
    SubscriptionId, TimerState,
};
pub use storage::{Config, SessionConfig};
