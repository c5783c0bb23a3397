//! Property tests over arbitrary command sequences.

use focusloop_core::{SessionStatus, SessionStore, SettingsPatch};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Command {
    Start,
    Pause,
    Reset,
    Remaining(u64),
    Complete,
    Settings(SettingsPatch),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Pause),
        Just(Command::Reset),
        (0u64..4000).prop_map(Command::Remaining),
        Just(Command::Complete),
        (
            proptest::option::of(0u64..3000),
            proptest::option::of(0u64..1000),
            proptest::option::of(0u32..8),
        )
            .prop_map(|(pomodoro, short, interval)| {
                Command::Settings(SettingsPatch {
                    pomodoro_duration: pomodoro,
                    short_break_duration: short,
                    long_break_duration: None,
                    long_break_interval: interval,
                })
            }),
    ]
}

fn apply(store: &mut SessionStore, cmd: &Command) {
    match cmd {
        Command::Start => {
            store.start_timer();
        }
        Command::Pause => {
            store.pause_timer();
        }
        Command::Reset => {
            store.reset_timer();
        }
        Command::Remaining(secs) => {
            store.update_remaining(*secs);
        }
        Command::Complete => {
            store.complete_session();
        }
        Command::Settings(patch) => {
            // Invalid patches are rejected; either outcome is fine here.
            let _ = store.update_settings(*patch);
        }
    }
}

proptest! {
    #[test]
    fn completed_sessions_are_append_only(cmds in proptest::collection::vec(command(), 0..60)) {
        let mut store = SessionStore::new();
        let mut previous = store.state().completed_sessions.clone();

        for cmd in &cmds {
            apply(&mut store, cmd);
            let current = &store.state().completed_sessions;
            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current.clone();
        }
    }

    #[test]
    fn remaining_never_exceeds_duration(cmds in proptest::collection::vec(command(), 0..60)) {
        let mut store = SessionStore::new();
        for cmd in &cmds {
            apply(&mut store, cmd);
            let session = &store.state().current_session;
            prop_assert!(session.remaining <= session.duration);
        }
    }

    #[test]
    fn reset_always_restores_full_idle_session(cmds in proptest::collection::vec(command(), 0..40)) {
        let mut store = SessionStore::new();
        for cmd in &cmds {
            apply(&mut store, cmd);
        }
        store.reset_timer();
        let session = &store.state().current_session;
        prop_assert_eq!(session.remaining, session.duration);
        prop_assert_eq!(session.status, SessionStatus::Idle);
    }

    #[test]
    fn settings_always_valid(cmds in proptest::collection::vec(command(), 0..60)) {
        let mut store = SessionStore::new();
        for cmd in &cmds {
            apply(&mut store, cmd);
            prop_assert!(store.settings().validate().is_ok());
        }
    }
}
