mod settings;
mod state;
mod store;

pub use settings::{duration_for, Settings, SettingsPatch};
pub use state::{Session, SessionStatus, SessionType, TimerState};
pub use store::{Listener, SessionStore, SubscriptionId};
