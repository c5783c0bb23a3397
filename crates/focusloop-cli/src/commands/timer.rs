use std::io::IsTerminal;
use std::time::Duration;

use clap::Subcommand;
use focusloop_core::storage::Config;
use focusloop_core::{Event, SessionStore, SettingsPatch, TimerState};
use tokio::time::MissedTickBehavior;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count sessions down in real time, printing events as JSON lines
    Run {
        /// Stop after this many completed sessions
        #[arg(long, default_value = "1")]
        sessions: usize,
        /// Milliseconds per countdown second
        #[arg(long, default_value = "1000")]
        tick_ms: u64,
        /// Start every next session without waiting (overrides config)
        #[arg(long)]
        auto_start: bool,
        /// Also print an event for every tick
        #[arg(long)]
        print_ticks: bool,
        #[command(flatten)]
        overrides: SettingsOverrides,
    },
    /// Complete sessions instantly and print the resulting state as JSON
    Simulate {
        #[arg(long, default_value = "4")]
        completions: usize,
        #[command(flatten)]
        overrides: SettingsOverrides,
    },
    /// Print the initial state for the current configuration
    Status,
}

/// One-off overrides of the configured lengths, in seconds.
#[derive(clap::Args, Debug, Default)]
pub struct SettingsOverrides {
    #[arg(long)]
    pomodoro_secs: Option<u64>,
    #[arg(long)]
    short_break_secs: Option<u64>,
    #[arg(long)]
    long_break_secs: Option<u64>,
    /// Pomodoros before a long break
    #[arg(long)]
    interval: Option<u32>,
}

impl From<&SettingsOverrides> for SettingsPatch {
    fn from(o: &SettingsOverrides) -> Self {
        SettingsPatch {
            pomodoro_duration: o.pomodoro_secs,
            short_break_duration: o.short_break_secs,
            long_break_duration: o.long_break_secs,
            long_break_interval: o.interval,
        }
    }
}

struct RunOptions {
    sessions: usize,
    tick: Duration,
    auto_start_breaks: bool,
    auto_start_pomodoros: bool,
    print_ticks: bool,
}

fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Store built from the config file plus any command-line overrides.
fn build_store(
    config: &Config,
    overrides: &SettingsOverrides,
) -> Result<SessionStore, Box<dyn std::error::Error>> {
    let mut store = SessionStore::with_settings(config.settings()?)?;
    let patch = SettingsPatch::from(overrides);
    if !patch.is_empty() {
        let event = store.update_settings(patch)?;
        tracing::info!(?event, "applied command-line overrides");
    }
    Ok(store)
}

fn render_status(state: &TimerState) {
    let session = &state.current_session;
    eprint!(
        "\r{:<11} {:02}:{:02} {:<7} [{} done]   ",
        session.session_type.label(),
        session.remaining / 60,
        session.remaining % 60,
        format!("{:?}", session.status).to_lowercase(),
        state.completed_sessions.len(),
    );
}

async fn drive(
    store: &mut SessionStore,
    opts: &RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(opts.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately.
    ticker.tick().await;

    emit(&store.start_timer())?;
    let mut completed = 0;
    loop {
        ticker.tick().await;
        let remaining = store.state().current_session.remaining.saturating_sub(1);
        let event = store.update_remaining(remaining);
        if opts.print_ticks {
            emit(&event)?;
        }
        if remaining > 0 {
            continue;
        }

        emit(&store.complete_session())?;
        completed += 1;
        if completed >= opts.sessions {
            break;
        }

        let next = store.state().current_session.session_type;
        let auto = if next.is_break() {
            opts.auto_start_breaks
        } else {
            opts.auto_start_pomodoros
        };
        if !auto {
            tracing::info!(?next, "auto-start disabled, stopping");
            break;
        }
        emit(&store.start_timer())?;
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Run {
            sessions,
            tick_ms,
            auto_start,
            print_ticks,
            overrides,
        } => {
            if sessions == 0 {
                return Err("--sessions must be at least 1".into());
            }
            if tick_ms == 0 {
                return Err("--tick-ms must be at least 1".into());
            }
            let mut store = build_store(&config, &overrides)?;
            if std::io::stderr().is_terminal() {
                store.subscribe(render_status);
            }

            let opts = RunOptions {
                sessions,
                tick: Duration::from_millis(tick_ms),
                auto_start_breaks: auto_start || config.session.auto_start_breaks,
                auto_start_pomodoros: auto_start || config.session.auto_start_pomodoros,
                print_ticks,
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(drive(&mut store, &opts))?;

            if std::io::stderr().is_terminal() {
                eprintln!();
            }
            emit(&store.snapshot())?;
        }
        TimerAction::Simulate {
            completions,
            overrides,
        } => {
            let mut store = build_store(&config, &overrides)?;
            for _ in 0..completions {
                store.complete_session();
            }
            println!("{}", serde_json::to_string_pretty(store.state())?);
        }
        TimerAction::Status => {
            let store = build_store(&config, &SettingsOverrides::default())?;
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
    }
    Ok(())
}
