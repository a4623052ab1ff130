//! Structured logging for the compiler and its tools
//!
//! Events go to stderr so that stdout stays free for JSON documents, reports
//! and JSONL batches.
//!
//! ```rust,no_run
//! use flowsmith::core::logging::init_logging;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! init_logging(Some("debug"), Some("pretty"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Levels
//!
//! - `trace`: every statement line and every scanned file
//! - `debug`: per-document and per-directory summaries
//! - `info`: one event per completed operation
//! - `warn`: skipped lines and unreadable documents
//! - `error`: failed operations
//!
//! # Environment
//!
//! When no argument is given, the level comes from `FLOWSMITH_LOG_LEVEL`, then
//! `RUST_LOG`, then `info`. The format comes from `FLOWSMITH_LOG_FORMAT`, then
//! `compact`. Level strings accept full filter directives:
//!
//! ```bash
//! RUST_LOG="info,flowsmith::plugins::crossref=debug" flowsmith cross-ref ...
//! ```

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output shape of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, no source locations
    Compact,
    /// Multi-line, colored, with span enter/exit events
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }

    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }

    fn layer(self) -> BoxedLayer {
        let base = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        match self {
            LogFormat::Compact => base.with_target(false).compact().boxed(),
            LogFormat::Pretty => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .json()
                .boxed(),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown log format: {}", s))
    }
}

fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var("FLOWSMITH_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

fn resolve_format(format: Option<&str>) -> String {
    format
        .map(str::to_string)
        .or_else(|| std::env::var("FLOWSMITH_LOG_FORMAT").ok())
        .unwrap_or_else(|| LogFormat::Compact.as_str().to_string())
}

/// Install the global subscriber
///
/// An unparseable level falls back to `info`. Fails on an unknown format or
/// when a global subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(resolve_level(level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = LogFormat::from_str(&resolve_format(format))
        .map_err(|e| format!("Invalid log format: {}", e))?;

    Registry::default()
        .with(format.layer())
        .with(filter)
        .try_init()?;
    Ok(())
}

/// Install the global subscriber from the environment alone
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for format in LogFormat::ALL {
            assert_eq!(LogFormat::from_str(format.as_str()), Ok(format));
        }
        assert_eq!(LogFormat::from_str("Json"), Ok(LogFormat::Json));
        assert!(LogFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("json")), "json");
    }
}
