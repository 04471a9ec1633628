use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "liftlog.toml";
pub const DEFAULT_DB_PATH: &str = ".liftlog/workouts.sqlite";
pub const DEFAULT_TABLE: &str = "workout";
pub const DEFAULT_DRAFT_PATH: &str = ".liftlog/unsaved.csv";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Effective settings after layering defaults, the config file, and
/// command-line/environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub table: String,
    pub draft_path: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table: DEFAULT_TABLE.to_string(),
            draft_path: PathBuf::from(DEFAULT_DRAFT_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigFile {
    #[serde(default)]
    store: RawStore,
    #[serde(default)]
    logger: RawLogger,
    #[serde(default)]
    log: RawLog,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStore {
    path: Option<PathBuf>,
    table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogger {
    draft_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLog {
    filter: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

impl Settings {
    /// Resolves settings. An explicitly named config file must exist; the
    /// default `liftlog.toml` is optional.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let (path, required) = match overrides.config_path.as_deref() {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => None,
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut settings = match raw {
            Some(raw) => Self::from_toml(&raw)?,
            None => Self::default(),
        };
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: RawConfigFile = toml::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            db_path: file.store.path.unwrap_or(defaults.db_path),
            table: file.store.table.unwrap_or(defaults.table),
            draft_path: file.logger.draft_path.unwrap_or(defaults.draft_path),
            log_filter: file.log.filter.unwrap_or(defaults.log_filter),
        })
    }

    fn apply(&mut self, overrides: &Overrides) {
        if let Some(path) = overrides.db_path.as_ref() {
            self.db_path.clone_from(path);
        }
        if let Some(table) = overrides.table.as_ref() {
            self.table.clone_from(table);
        }
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        let table = self.table.trim();
        if table.is_empty() {
            return Err(ConfigError::Invalid("store table name is empty".to_string()));
        }
        let folded = table.to_ascii_lowercase();
        if folded.starts_with("sqlite_") || folded == "meta" {
            return Err(ConfigError::Invalid(format!(
                "store table name '{}' is reserved",
                table
            )));
        }
        self.table = table.to_string();

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store path is empty".to_string()));
        }
        Ok(())
    }

    pub fn db_path_str(&self) -> Result<&str, ConfigError> {
        self.db_path.to_str().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "store path {} is not valid UTF-8",
                self.db_path.display()
            ))
        })
    }
}
