//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Anything missing falls
//! back to compiled defaults; a missing or broken file is logged and
//! ignored so the game always starts.
//!
//! Root folder priority:
//! 1. Command-line argument
//! 2. `FQ_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";
pub const DEFAULT_MEDIA_URL: &str = "/media/";
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

pub const ROOT_FOLDER_ENV: &str = "FQ_ROOT_FOLDER";
pub const CONFIG_FILE_ENV: &str = "FQ_CONFIG";

const DATABASE_FILE: &str = "framequiz.db";
const MEDIA_DIR: &str = "media";
const PERFORMANCE_FILE: &str = "performance_score.json";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the database, media and performance table
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    pub port: u16,

    pub bind_host: String,

    /// URL prefix under which stills are served
    pub media_url: String,

    /// Overrides `<root>/performance_score.json`
    pub performance_table: Option<PathBuf>,

    /// Inactivity window before a session may be purged
    pub session_retention_days: i64,

    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: DEFAULT_PORT,
            bind_host: DEFAULT_BIND_HOST.to_string(),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            performance_table: None,
            session_retention_days: DEFAULT_RETENTION_DAYS,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from `explicit`, `FQ_CONFIG` or the platform config locations.
    ///
    /// Never fails: problems are logged and defaults returned.
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = config_file_path(explicit) else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read config {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Could not parse config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("framequiz").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    let system_config = PathBuf::from("/etc/framequiz/config.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("framequiz"))
        .unwrap_or_else(|| PathBuf::from("./framequiz_data"))
}

/// Well-known locations inside the root folder
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ensure_exists(&self) -> Result<()> {
        std::fs::create_dir_all(self.media_dir())?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.path.join(DATABASE_FILE)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.path.join(MEDIA_DIR)
    }

    pub fn performance_table_path(&self, config: &TomlConfig) -> PathBuf {
        config
            .performance_table
            .clone()
            .unwrap_or_else(|| self.path.join(PERFORMANCE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str("port = 9000\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_host, DEFAULT_BIND_HOST);
        assert_eq!(config.media_url, DEFAULT_MEDIA_URL);
        assert_eq!(config.session_retention_days, DEFAULT_RETENTION_DAYS);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("port = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_root_folder_layout() {
        let root = RootFolder::new("/srv/fq");
        assert_eq!(root.database_path(), PathBuf::from("/srv/fq/framequiz.db"));
        assert_eq!(root.media_dir(), PathBuf::from("/srv/fq/media"));

        let mut config = TomlConfig::default();
        assert_eq!(
            root.performance_table_path(&config),
            PathBuf::from("/srv/fq/performance_score.json")
        );
        config.performance_table = Some(PathBuf::from("/etc/fq/perf.json"));
        assert_eq!(root.performance_table_path(&config), PathBuf::from("/etc/fq/perf.json"));
    }
}
