//! Structured logging settings.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive that overrides the
/// configured level.
pub const LOG_FILTER_ENV: &str = "FILEIO_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name. Unknown names fall back to `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `FILEIO_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional file to append log lines to instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Enables debug output for this crate.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.level = format!("{DEFAULT_LEVEL},fileio=debug");
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a log file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Builds the filter, preferring `FILEIO_LOG` over the configured level.
    ///
    /// An unparseable configured level falls back to `info`.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_FILTER_ENV)
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}
