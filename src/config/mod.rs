//! Configuration management.
//!
//! Configuration is read from a TOML file:
//!
//! ```toml
//! default_mode = "write"
//! default_content_type = "csv"
//!
//! [row]
//! delimiter = ";"
//! quote = "'"
//! terminator = "crlf"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use crate::io::Mode;
use crate::observability::{LogFormat, LoggingConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FILEIO_CONFIG";

/// Main configuration for fileio.
#[derive(Debug, Clone)]
pub struct FileIoConfig {
    /// Mode used by handles built from this config.
    pub default_mode: Mode,
    /// Content type used by handles built from this config.
    pub default_content_type: String,
    /// Row encoding settings.
    pub row: RowFormat,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Row encoding settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFormat {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Line terminator written after each row.
    pub terminator: LineTerminator,
}

/// Line terminator for encoded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineTerminator {
    /// Parses a terminator name. Unknown names fall back to `Lf`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "crlf" | "\r\n" => Self::Crlf,
            _ => Self::Lf,
        }
    }

    /// Returns the terminator bytes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

impl Default for RowFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            terminator: LineTerminator::Lf,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Default mode name.
    pub default_mode: Option<String>,
    /// Default content type tag.
    pub default_content_type: Option<String>,
    /// Row section.
    pub row: Option<ConfigFileRow>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Row section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRow {
    /// Single-byte delimiter.
    pub delimiter: Option<String>,
    /// Single-byte quote character.
    pub quote: Option<String>,
    /// "lf" or "crlf".
    pub terminator: Option<String>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Filter directive, e.g. "info" or "fileio=debug".
    pub level: Option<String>,
    /// "pretty" or "json".
    pub format: Option<String>,
}

impl Default for FileIoConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Read,
            default_content_type: "text".to_string(),
            row: RowFormat::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FileIoConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::parse_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a row setting is not
    /// a single byte.
    pub fn parse_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. The file named by `FILEIO_CONFIG`
    /// 2. Platform-specific config dir (`~/Library/Application Support/fileio/` on macOS)
    /// 3. XDG config dir (`~/.config/fileio/`)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("fileio").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("fileio")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `FileIoConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(mode) = file.default_mode {
            config.default_mode = Mode::parse(&mode);
        }
        if let Some(content_type) = file.default_content_type {
            config.default_content_type = content_type;
        }
        if let Some(row) = file.row {
            if let Some(delimiter) = row.delimiter {
                config.row.delimiter = single_byte("row.delimiter", &delimiter)?;
            }
            if let Some(quote) = row.quote {
                config.row.quote = single_byte("row.quote", &quote)?;
            }
            if let Some(terminator) = row.terminator {
                config.row.terminator = LineTerminator::parse(&terminator);
            }
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
        }

        Ok(config)
    }

    /// Sets the default mode.
    #[must_use]
    pub const fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Sets the default content type.
    #[must_use]
    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = content_type.into();
        self
    }

    /// Sets the row format.
    #[must_use]
    pub const fn with_row_format(mut self, row: RowFormat) -> Self {
        self.row = row;
        self
    }
}

fn single_byte(key: &str, value: &str) -> crate::Result<u8> {
    match value.as_bytes() {
        [b] => Ok(*b),
        _ => Err(crate::Error::InvalidInput(format!(
            "{key} must be a single byte, got {value:?}"
        ))),
    }
}
