//! Logging setup for the feedsync binaries
//!
//! [`init_logging`] installs one global `tracing` subscriber. Lines go to
//! stderr, to a daily-rotated file, or to both, as text or JSON. Library
//! code logs with structured fields and never prints:
//!
//! ```rust,ignore
//! info!(source = %job.source, destination = %job.destination, "Converting feed");
//! error!(source = %job.source, kind = err.kind(), error = %err, "Job failed");
//! ```
//!
//! ```no_run
//! use feedsync_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! let config = LogConfig::new("feedsync").with_level(LogLevel::Debug).merge_env()?;
//! let _guard = init_logging(&config)?;
//! # Ok::<(), feedsync_common::FeedError>(())
//! ```

use crate::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            other => return Err(FeedError::config(format!("unknown log level '{}'", other))),
        })
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// stderr; stdout is reserved for converted documents
    #[default]
    Console,
    File,
    Both,
}

impl FromStr for LogOutput {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "console" | "stderr" => Self::Console,
            "file" => Self::File,
            "both" => Self::Both,
            other => return Err(FeedError::config(format!("unknown log output '{}'", other))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "json" => Self::Json,
            other => return Err(FeedError::config(format!("unknown log format '{}'", other))),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub output: LogOutput,
    pub format: LogFormat,
    /// Used only when `output` includes the file
    pub log_dir: PathBuf,
    /// Rotated files are named `<prefix>.<date>`
    pub file_prefix: String,
    /// Extra `EnvFilter` directives, e.g. `suppaftp=warn,reqwest=info`
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("feedsync")
    }
}

impl LogConfig {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            output: LogOutput::Console,
            format: LogFormat::Text,
            log_dir: PathBuf::from("logs"),
            file_prefix: file_prefix.into(),
            filter: None,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Overlay `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`,
    /// `LOG_FILE_PREFIX` and `LOG_FILTER`. Set variables win over the
    /// current values.
    pub fn merge_env(mut self) -> Result<Self> {
        if let Some(level) = env_value("LOG_LEVEL")? {
            self.level = level;
        }
        if let Some(output) = env_value("LOG_OUTPUT")? {
            self.output = output;
        }
        if let Some(format) = env_value("LOG_FORMAT")? {
            self.format = format;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.log_dir = dir.into();
        }
        if let Ok(prefix) = std::env::var("LOG_FILE_PREFIX") {
            self.file_prefix = prefix;
        }
        if let Ok(filter) = std::env::var("LOG_FILTER") {
            self.filter = Some(filter);
        }
        Ok(self)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::builder()
            .with_default_directive(Level::from(self.level).into())
            .from_env_lossy();

        let extra = self.filter.as_deref().unwrap_or_default();
        for directive in extra.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let parsed = directive.parse().map_err(|e| {
                FeedError::config(format!("bad log filter directive '{}': {}", directive, e))
            })?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }
}

fn env_value<T: FromStr<Err = FeedError>>(key: &str) -> Result<Option<T>> {
    std::env::var(key).ok().map(|raw| raw.parse()).transpose()
}

fn fmt_layer<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Flushes buffered file output when dropped; keep it alive in `main`.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        let ansi = std::io::stderr().is_terminal();
        layers.push(fmt_layer(std::io::stderr, config.format, ansi));
    }

    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);
        layers.push(fmt_layer(writer, config.format, false));
    }

    tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(layers)
        .try_init()
        .map_err(|e| FeedError::config(format!("logging already initialized: {}", e)))?;

    Ok(LoggingGuard { _file: file_guard })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const LOG_KEYS: [&str; 6] = [
        "LOG_LEVEL",
        "LOG_OUTPUT",
        "LOG_FORMAT",
        "LOG_DIR",
        "LOG_FILE_PREFIX",
        "LOG_FILTER",
    ];

    fn clear_env() {
        for key in LOG_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("stderr".parse::<LogOutput>().unwrap(), LogOutput::Console);
        assert_eq!(" json ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!("loud".parse::<LogLevel>(), Err(FeedError::Config(_))));
        assert!("syslog".parse::<LogOutput>().is_err());
    }

    #[test]
    fn test_chained_setters() {
        let config = LogConfig::new("nightly")
            .with_level(LogLevel::Debug)
            .with_output(LogOutput::File)
            .with_format(LogFormat::Json)
            .with_log_dir("/var/log/feedsync");

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.output, LogOutput::File);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/feedsync"));
        assert_eq!(config.file_prefix, "nightly");
        assert_eq!(LogConfig::default().file_prefix, "feedsync");
    }

    #[test]
    #[serial]
    fn test_merge_env_wins_over_code() {
        clear_env();
        std::env::set_var("LOG_LEVEL", "error");
        std::env::set_var("LOG_FORMAT", "json");

        let config = LogConfig::new("feedsync").with_level(LogLevel::Debug).merge_env();
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Console);
    }

    #[test]
    #[serial]
    fn test_merge_env_rejects_bad_level() {
        clear_env();
        std::env::set_var("LOG_LEVEL", "chatty");
        let result = LogConfig::default().merge_env();
        clear_env();
        assert!(matches!(result, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_bad_filter_directive() {
        let config = LogConfig {
            filter: Some("suppaftp=loudest".to_string()),
            ..LogConfig::default()
        };
        assert!(matches!(config.env_filter(), Err(FeedError::Config(_))));
    }
}
