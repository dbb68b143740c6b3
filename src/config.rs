//! Configuration management and validation.
//!
//! Provides the configuration passed into a sync run: source decoding
//! settings, the remote command surface, upload batching and logging.
//! Values are layered as built-in defaults, then an optional TOML file, then
//! `FACILITY_SYNC_*` environment variables, then CLI flags. Credentials are
//! never stored here; only the name of the environment variable holding them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::app::services::encoding_resolver::lookup_encoding;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BATCH_SIZE, DEFAULT_CHILD_PATH,
    DEFAULT_CLEAR_TIMEOUT_SECS, DEFAULT_ENCODING_CANDIDATES, DEFAULT_FALLBACK_ENCODING,
    DEFAULT_HEADER_MARKERS, DEFAULT_INSERT_TIMEOUT_SECS, DEFAULT_INTER_BATCH_DELAY_MS,
    DEFAULT_LOG_LEVEL, DEFAULT_PROBE_LINES, DEFAULT_REMOTE_COMMAND, DEFAULT_TABLE,
    DEFAULT_TOKEN_ENV, ENV_PREFIX, LOG_LEVELS,
};
use crate::{Error, Result};

static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

static DATABASE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("static regex"));

/// Top-level configuration for a sync run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub remote: RemoteConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// How delimited text sources are decoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Candidate encodings in priority order
    pub encodings: Vec<String>,

    /// Encoding used when no probe matches
    pub fallback_encoding: String,

    /// Header keywords that identify a correct decoding
    pub header_markers: Vec<String>,

    /// Number of leading lines decoded per candidate
    pub probe_lines: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            encodings: to_strings(DEFAULT_ENCODING_CANDIDATES),
            fallback_encoding: DEFAULT_FALLBACK_ENCODING.to_string(),
            header_markers: to_strings(DEFAULT_HEADER_MARKERS),
            probe_lines: DEFAULT_PROBE_LINES,
        }
    }
}

/// The external database command and its environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Program followed by its leading arguments
    pub command: Vec<String>,

    /// Target database identifier
    pub database: Option<String>,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Working directory for the child process
    pub working_dir: Option<PathBuf>,

    /// `PATH` handed to the child process
    pub child_path: String,

    /// `HOME` handed to the child process (defaults to the user's home)
    pub home: Option<PathBuf>,

    pub insert_timeout_secs: u64,
    pub clear_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            command: to_strings(DEFAULT_REMOTE_COMMAND),
            database: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            working_dir: None,
            child_path: DEFAULT_CHILD_PATH.to_string(),
            home: None,
            insert_timeout_secs: DEFAULT_INSERT_TIMEOUT_SECS,
            clear_timeout_secs: DEFAULT_CLEAR_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn insert_timeout(&self) -> Duration {
        Duration::from_secs(self.insert_timeout_secs)
    }

    pub fn clear_timeout(&self) -> Duration {
        Duration::from_secs(self.clear_timeout_secs)
    }

    /// Home directory for the child, falling back to the current user's
    pub fn resolved_home(&self) -> Option<PathBuf> {
        self.home.clone().or_else(dirs::home_dir)
    }
}

/// Batching and pacing of the upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Destination table
    pub table: String,

    /// Records per INSERT statement
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    pub inter_batch_delay_ms: u64,

    /// Delete all rows before uploading
    pub replace: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay_ms: DEFAULT_INTER_BATCH_DELAY_MS,
            replace: false,
        }
    }
}

impl UploadConfig {
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}

/// Logging configuration
///
/// `level` applies unless `-v` or `-q` is given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// `~/.config/facility-sync/config.toml` or the platform equivalent
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::configuration(format!("{} ({})", e, path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))
    }

    /// Defaults, then the optional file, then process environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `FACILITY_SYNC_*` overrides from a variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(database) = var("DATABASE") {
            debug!("Database overridden from environment");
            self.remote.database = Some(database);
        }
        if let Some(table) = var("TABLE") {
            self.upload.table = table;
        }
        if let Some(batch_size) = var("BATCH_SIZE") {
            self.upload.batch_size = parse_env_number(&batch_size, "BATCH_SIZE")?;
        }
        if let Some(delay) = var("DELAY_MS") {
            self.upload.inter_batch_delay_ms = parse_env_number(&delay, "DELAY_MS")?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }

        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.upload.batch_size == 0 {
            return Err(Error::configuration("batch_size must be at least 1"));
        }

        if !SQL_IDENTIFIER.is_match(&self.upload.table) {
            return Err(Error::configuration(format!(
                "Table name '{}' is not a plain SQL identifier",
                self.upload.table
            )));
        }

        if let Some(database) = &self.remote.database {
            if !DATABASE_NAME.is_match(database) {
                return Err(Error::configuration(format!(
                    "Database name '{}' contains unsupported characters",
                    database
                )));
            }
        }

        if self.remote.command.is_empty() {
            return Err(Error::configuration("remote.command must name a program"));
        }

        if self.remote.insert_timeout_secs == 0 || self.remote.clear_timeout_secs == 0 {
            return Err(Error::configuration("remote timeouts must be positive"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if self.source.encodings.is_empty() {
            return Err(Error::configuration(
                "source.encodings must list at least one encoding",
            ));
        }

        for label in self
            .source
            .encodings
            .iter()
            .chain(std::iter::once(&self.source.fallback_encoding))
        {
            if lookup_encoding(label).is_none() {
                return Err(Error::configuration(format!(
                    "Unknown text encoding '{}'",
                    label
                )));
            }
        }

        Ok(())
    }
}

fn parse_env_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!(
            "{}{} must be a non-negative integer, got '{}'",
            ENV_PREFIX, name, value
        ))
    })
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upload.batch_size, 100);
        assert_eq!(config.upload.inter_batch_delay(), Duration::from_millis(500));
        assert_eq!(config.remote.insert_timeout(), Duration::from_secs(120));
        assert_eq!(config.remote.clear_timeout(), Duration::from_secs(60));
        assert_eq!(config.remote.token_env, "CLOUDFLARE_API_TOKEN");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[remote]
database = "carejoa-production"

[upload]
batch_size = 50
"#,
        )
        .unwrap();

        assert_eq!(config.remote.database.as_deref(), Some("carejoa-production"));
        assert_eq!(config.upload.batch_size, 50);
        assert_eq!(config.upload.table, "facilities");
        assert_eq!(config.source.fallback_encoding, "cp949");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nencodings = [\"euc-kr\"]").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.source.encodings, vec!["euc-kr".to_string()]);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let result = Config::from_toml("[upload]\nbatch_size = \"many\"");
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FACILITY_SYNC_DATABASE", "staging-db"),
            ("FACILITY_SYNC_BATCH_SIZE", "25"),
            ("FACILITY_SYNC_DELAY_MS", "0"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.remote.database.as_deref(), Some("staging-db"));
        assert_eq!(config.upload.batch_size, 25);
        assert_eq!(config.upload.inter_batch_delay_ms, 0);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| {
            (key == "FACILITY_SYNC_BATCH_SIZE").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.upload.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload.table = "facilities; DROP TABLE x".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.remote.database = Some("prod db".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.fallback_encoding = "latin-42".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.remote.command.clear();
        assert!(config.validate().is_err());
    }
}
