//! Watcher configuration: TOML file plus command-line overrides.
//!
//! Resolution order per key: CLI flag (or env var) > config file > default.
//! A missing config file is created with the default contents.

use std::path::{Path, PathBuf};
use std::time::Duration;

use plexwatch_aw::{DEFAULT_SERVER_URL, TESTING_SERVER_URL};
use plexwatch_plex::DEFAULT_BASE_URL;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

/// Table name in the config file; also the watcher's client name.
pub const SECTION: &str = "aw-watcher-plex";

pub const DEFAULT_POLL_TIME: f64 = 5.0;

pub const DEFAULT_CONFIG: &str = r#"[aw-watcher-plex]
poll_time = 5.0
base_url = "http://localhost:32400"
token = ""
log_pauses = true
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no token specified in config")]
    MissingToken,

    #[error("invalid poll_time {0}: expected a positive number of seconds")]
    InvalidPollTime(f64),

    #[error("cannot determine the user config directory")]
    NoConfigDir,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write default config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The `[aw-watcher-plex]` table as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub poll_time: f64,
    pub base_url: String,
    pub token: Option<String>,
    pub log_pauses: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            poll_time: DEFAULT_POLL_TIME,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            log_pauses: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "aw-watcher-plex", default)]
    watcher: FileConfig,
}

impl FileConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        let doc: ConfigDocument = toml::from_str(s)?;
        Ok(doc.watcher)
    }
}

/// Fully resolved, validated settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub poll_interval: Duration,
    pub base_url: String,
    pub token: String,
    pub log_pauses: bool,
    pub aw_server_url: String,
}

impl Settings {
    /// Merge file values with CLI overrides and validate the result.
    pub fn resolve(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let poll_time = cli.poll_time.unwrap_or(file.poll_time);
        if !poll_time.is_finite() || poll_time <= 0.0 {
            return Err(ConfigError::InvalidPollTime(poll_time));
        }
        let poll_interval = Duration::try_from_secs_f64(poll_time)
            .map_err(|_| ConfigError::InvalidPollTime(poll_time))?;

        let token = cli
            .token
            .clone()
            .or(file.token)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let aw_server_url = match (&cli.aw_url, cli.testing) {
            (Some(url), _) => url.clone(),
            (None, true) => TESTING_SERVER_URL.to_string(),
            (None, false) => DEFAULT_SERVER_URL.to_string(),
        };

        Ok(Self {
            poll_interval,
            base_url: cli.base_url.clone().unwrap_or(file.base_url),
            token,
            log_pauses: file.log_pauses && !cli.no_log_pauses,
            aw_server_url,
        })
    }
}

/// `<config dir>/activitywatch/aw-watcher-plex/aw-watcher-plex.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| {
            dir.join("activitywatch")
                .join(SECTION)
                .join(format!("{SECTION}.toml"))
        })
        .ok_or(ConfigError::NoConfigDir)
}

/// Read the config file, writing the default one first if it is missing.
pub fn load_or_create(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        write_default(path)?;
        tracing::info!(path = %path.display(), "created default config");
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FileConfig::from_toml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_default(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(write_err)
}

/// Load the config file named on the command line (or the default one) and
/// resolve it against the CLI overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let file = load_or_create(&path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Settings::resolve(file, cli)
}
