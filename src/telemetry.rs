//! Logging initialization.
//!
//! Diagnostics go to stderr through `tracing`:
//! - `JJWS_LOG` sets the filter (EnvFilter syntax, default `warn`)
//! - `JJWS_LOG_FORMAT=json` switches to JSON lines, one event per line
//!
//! Results meant for the user (paths, listings) are printed to stdout by the
//! binary and never pass through here.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "JJWS_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "JJWS_LOG_FORMAT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Call once, early in `main()`.
pub fn init() {
    let format = LogFormat::from_env(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("warning: logging already initialized: {e}");
    }
}
