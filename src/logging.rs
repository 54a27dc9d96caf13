//! # Logging
//!
//! Structured `tracing` output for the explorer and its CLI.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `EDMX_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `EDMX_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `EDMX_LOG_TARGETS` | unset | extra comma-separated filter directives |
//! | `EDMX_LOG_LOCATION` | `false` | include file and line |
//!
//! `RUST_LOG`, when set, replaces the level. Output goes to stderr so that
//! command output on stdout stays machine readable.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Extra filter directives, comma-separated (`edm_explorer::router=debug`).
    pub targets: Option<String>,
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            targets: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            level: lookup("EDMX_LOG_LEVEL")
                .map(|v| parse_level(&v))
                .unwrap_or(Level::INFO),
            format: lookup("EDMX_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Json),
            targets: lookup("EDMX_LOG_TARGETS").filter(|v| !v.trim().is_empty()),
            include_location: lookup("EDMX_LOG_LOCATION")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
        }
    }

    /// Same settings with the level raised to `debug` (`--verbose`).
    pub fn verbose(mut self) -> Self {
        if self.level < Level::DEBUG {
            self.level = Level::DEBUG;
        }
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));
        if let Some(targets) = &self.targets {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                filter = filter.add_directive(
                    directive
                        .parse()
                        .with_context(|| format!("invalid log filter directive '{directive}'"))?,
                );
            }
        }
        Ok(filter)
    }
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, which leaves
/// the existing one in place.
pub fn init_logging(config: &LogConfig) -> Result<bool> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    Ok(tracing_subscriber::registry()
        .with(config.filter()?)
        .with(fmt_layer)
        .try_init()
        .is_ok())
}
