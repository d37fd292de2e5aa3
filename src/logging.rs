//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a JSON or
//! pretty `fmt` layer. Logs go to stderr so console-strategy output on stdout
//! stays clean.
//!
//! | Variable                     | Default | Meaning                               |
//! |------------------------------|---------|---------------------------------------|
//! | `BRRTK_LOG_LEVEL`            | `info`  | trace/debug/info/warn/error           |
//! | `BRRTK_LOG_FORMAT`           | `json`  | `json` or `pretty`                    |
//! | `BRRTK_LOG_TARGET_FILTER`    | unset   | extra comma-separated directives      |
//! | `BRRTK_LOG_INCLUDE_LOCATION` | `false` | include file and line                 |
//! | `BRRTK_LOG_ASYNC`            | `false` | buffered writer via `tracing-appender` |
//!
//! `RUST_LOG`, when set, replaces the level from `BRRTK_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log line format: JSON for machines, pretty for a developer terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` is JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Write through a background thread
    pub async_logging: bool,
    /// Extra `EnvFilter` directives, e.g. `brrtkernel::dispatcher=trace`
    pub directives: Vec<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            async_logging: false,
            directives: Vec::new(),
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read `BRRTK_LOG_*`, falling back to [`LogConfig::default`] per field.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("BRRTK_LOG_LEVEL")
                .map(|s| parse_level(&s))
                .unwrap_or(defaults.level),
            format: env::var("BRRTK_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            async_logging: env_flag("BRRTK_LOG_ASYNC").unwrap_or(defaults.async_logging),
            directives: env::var("BRRTK_LOG_TARGET_FILTER")
                .map(|s| split_directives(&s))
                .unwrap_or_default(),
            include_location: env_flag("BRRTK_LOG_INCLUDE_LOCATION")
                .unwrap_or(defaults.include_location),
        }
    }

    /// Debug-level pretty output with source locations.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            include_location: true,
            ..Self::default()
        }
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));
        for directive in &self.directives {
            let parsed: Directive = directive
                .parse()
                .with_context(|| format!("invalid log filter directive '{directive}'"))?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }
}

/// Unknown level names fall back to `info`.
fn parse_level(s: &str) -> Level {
    s.trim().parse().unwrap_or(Level::INFO)
}

fn split_directives(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Install the global subscriber.
///
/// With async logging the returned guard must be held until exit so buffered
/// lines are flushed. Fails on an invalid directive or when a global
/// subscriber is already installed.
///
/// ```no_run
/// use brrtkernel::logging::{init_logging_with_config, LogConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// let _guard = init_logging_with_config(&LogConfig::from_env())?;
/// # Ok(())
/// # }
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = config.env_filter()?;
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let base = tracing_subscriber::fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(writer);
    let fmt_layer = match config.format {
        LogFormat::Json => base.json().with_current_span(true).with_span_list(true).boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(" PRETTY "), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Json);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_split_directives_skips_blanks() {
        assert_eq!(
            split_directives("brrtkernel=debug, ,hyper=warn,"),
            vec!["brrtkernel=debug", "hyper=warn"]
        );
    }

    #[test]
    fn test_pretty_preset() {
        let config = LogConfig::pretty();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.include_location);
        assert!(!config.async_logging);
    }

    #[test]
    fn test_invalid_directive_is_an_error() {
        let config = LogConfig {
            directives: vec!["brrtkernel=[".to_string()],
            ..LogConfig::default()
        };
        let err = init_logging_with_config(&config).unwrap_err();
        assert!(err.to_string().contains("invalid log filter directive"));
    }

    #[test]
    fn test_double_init_fails() {
        let config = LogConfig::default();
        let _first = init_logging_with_config(&config);
        assert!(init_logging_with_config(&config).is_err());
    }
}
