//! Configuration for the jobboard shells.
//!
//! Read from `.jobboard/jobboard.toml` in the project directory, falling back
//! to `<user config dir>/jobboard/jobboard.toml`, then built-in defaults.
//! Layering is file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [storage]
//! data_file = ".jobboard/jobs.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3142
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! file = ".jobboard/logs/jobboard.log"
//!
//! [ids]
//! strategy = "uuid"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::ids::{IdGenerator, SequentialIds, UuidIds};
use crate::board::models::JobApplication;

pub const BOARD_DIR: &str = ".jobboard";
pub const CONFIG_FILE: &str = "jobboard.toml";

/// How new job ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    /// Build a generator that will not collide with `existing`.
    pub fn generator(&self, existing: &[JobApplication]) -> Box<dyn IdGenerator + Send> {
        match self {
            IdStrategy::Uuid => Box::new(UuidIds),
            IdStrategy::Sequential => Box::new(SequentialIds::after(existing.iter().map(|j| &j.id))),
        }
    }
}

impl std::fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdStrategy::Uuid => write!(f, "uuid"),
            IdStrategy::Sequential => write!(f, "sequential"),
        }
    }
}

impl std::str::FromStr for IdStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            _ => anyhow::bail!("Invalid id strategy '{}'. Valid values: uuid, sequential", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// Job collection file, relative to the project directory
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(BOARD_DIR).join("jobs.json")
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3142
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional log file, relative to the project directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IdsSection {
    #[serde(default)]
    pub strategy: IdStrategy,
}

/// Contents of `jobboard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardToml {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub ids: IdsSection,
}

impl BoardToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse jobboard.toml")
    }

    /// Load from the project's board directory, then the user config dir.
    /// Returns defaults if neither exists.
    pub fn load_or_default(board_dir: &Path) -> Result<Self> {
        let project_path = board_dir.join(CONFIG_FILE);
        if project_path.exists() {
            return Self::load(&project_path);
        }
        if let Some(user_path) = user_config_path()
            && user_path.exists()
        {
            return Self::load(&user_path);
        }
        Ok(Self::default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize jobboard.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `JOBBOARD_*` overrides using `lookup` for variable access.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(file) = lookup("JOBBOARD_DATA_FILE") {
            self.storage.data_file = PathBuf::from(file);
        }
        if let Some(port) = lookup("JOBBOARD_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid JOBBOARD_PORT '{}'", port))?;
        }
        if let Some(level) = lookup("JOBBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(strategy) = lookup("JOBBOARD_ID_STRATEGY") {
            self.ids.strategy = strategy.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            warnings.push(format!(
                "Invalid logging.level '{}': expected trace, debug, info, warn, error or off",
                self.logging.level
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "compact" | "json") {
            warnings.push(format!(
                "Invalid logging.format '{}': expected compact or json",
                self.logging.format
            ));
        }
        if self.server.port == 0 {
            warnings.push("server.port is 0: the OS will pick a random port".to_string());
        }
        if self.storage.data_file.as_os_str().is_empty() {
            warnings.push("storage.data_file is empty".to_string());
        }

        warnings
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jobboard").join(CONFIG_FILE))
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub project_dir: PathBuf,
    pub board_dir: PathBuf,
    pub toml: BoardToml,
    data_file_override: Option<PathBuf>,
}

impl BoardConfig {
    /// Load file and environment layers for `project_dir`.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let board_dir = project_dir.join(BOARD_DIR);
        let mut toml = BoardToml::load_or_default(&board_dir)?;
        toml.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(Self {
            project_dir,
            board_dir,
            toml,
            data_file_override: None,
        })
    }

    /// Apply CLI overrides on top.
    pub fn with_cli_args(project_dir: PathBuf, data_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.data_file_override = data_file;
        Ok(config)
    }

    pub fn config_file(&self) -> PathBuf {
        self.board_dir.join(CONFIG_FILE)
    }

    /// Absolute path of the job collection file (CLI → env → file → default).
    pub fn data_file(&self) -> PathBuf {
        let path = self
            .data_file_override
            .clone()
            .unwrap_or_else(|| self.toml.storage.data_file.clone());
        self.resolve(path)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.toml.logging.file.clone().map(|p| self.resolve(p))
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.toml.ids.strategy
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.project_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let toml = BoardToml::parse("").unwrap();
        assert_eq!(toml.storage.data_file, PathBuf::from(".jobboard/jobs.json"));
        assert_eq!(toml.server.port, 3142);
        assert_eq!(toml.server.host, "127.0.0.1");
        assert_eq!(toml.logging.level, "info");
        assert_eq!(toml.ids.strategy, IdStrategy::Uuid);
    }

    #[test]
    fn test_parse_full_file() {
        let toml = BoardToml::parse(
            r#"
            [storage]
            data_file = "data/applications.json"

            [server]
            port = 8080

            [logging]
            level = "debug"
            format = "json"
            file = "logs/board.log"

            [ids]
            strategy = "sequential"
            "#,
        )
        .unwrap();
        assert_eq!(toml.storage.data_file, PathBuf::from("data/applications.json"));
        assert_eq!(toml.server.port, 8080);
        assert_eq!(toml.server.host, "127.0.0.1");
        assert_eq!(toml.logging.format, "json");
        assert_eq!(toml.logging.file, Some(PathBuf::from("logs/board.log")));
        assert_eq!(toml.ids.strategy, IdStrategy::Sequential);
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(BoardToml::parse("[server\nport = 1").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("JOBBOARD_DATA_FILE", "/tmp/other.json"),
            ("JOBBOARD_PORT", "9000"),
            ("JOBBOARD_ID_STRATEGY", "sequential"),
        ]
        .into_iter()
        .collect();
        let mut toml = BoardToml::default();
        toml.apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(toml.storage.data_file, PathBuf::from("/tmp/other.json"));
        assert_eq!(toml.server.port, 9000);
        assert_eq!(toml.ids.strategy, IdStrategy::Sequential);
    }

    #[test]
    fn test_env_rejects_bad_port() {
        let mut toml = BoardToml::default();
        let result = toml.apply_env_with(|k| (k == "JOBBOARD_PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut toml = BoardToml::default();
        toml.logging.level = "loud".into();
        toml.logging.format = "xml".into();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("loud"));
        assert!(warnings[1].contains("xml"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = BoardToml::default();
        toml.server.port = 4000;
        toml.save(&path).unwrap();
        assert_eq!(BoardToml::load(&path).unwrap().server.port, 4000);
    }

    #[test]
    fn test_project_file_takes_precedence() {
        let dir = TempDir::new().unwrap();
        let board_dir = dir.path().join(BOARD_DIR);
        std::fs::create_dir_all(&board_dir).unwrap();
        std::fs::write(board_dir.join(CONFIG_FILE), "[server]\nport = 5555\n").unwrap();
        assert_eq!(BoardToml::load_or_default(&board_dir).unwrap().server.port, 5555);
    }

    #[test]
    fn test_relative_paths_resolve_against_project_dir() {
        let dir = TempDir::new().unwrap();
        let config = BoardConfig {
            project_dir: dir.path().to_path_buf(),
            board_dir: dir.path().join(BOARD_DIR),
            toml: BoardToml::default(),
            data_file_override: None,
        };
        assert_eq!(config.data_file(), dir.path().join(".jobboard/jobs.json"));
        assert_eq!(config.log_file(), None);

        let config = BoardConfig {
            data_file_override: Some(PathBuf::from("/abs/jobs.json")),
            ..config
        };
        assert_eq!(config.data_file(), PathBuf::from("/abs/jobs.json"));
    }

    #[test]
    fn test_id_strategy_parse() {
        assert_eq!("UUID".parse::<IdStrategy>().unwrap(), IdStrategy::Uuid);
        assert!("random".parse::<IdStrategy>().is_err());
        assert_eq!(IdStrategy::Sequential.to_string(), "sequential");
    }
}
