//! Process-level plumbing: logging setup, loop sleeping and the session clock.

use std::time::Instant;

use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::error::{GameError, GameResult};
use crate::formatter::TickFormatter;

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info` (`debug` with `verbose`).
pub fn init_tracing(verbose: bool) -> GameResult<()> {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).event_format(TickFormatter))
        .with(filter)
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::InvalidArgument(format!("Failed to set tracing subscriber: {e}")))
}

/// Sleeps for `duration`, spinning near the deadline when the window has focus.
#[cfg(feature = "desktop")]
pub fn sleep(duration: std::time::Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

/// Monotonic seconds since the clock was created; the time base handed to `Game::tick`.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
