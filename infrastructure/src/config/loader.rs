//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `ENSEMBLE_CANARY__PERCENTAGE=25`
pub const ENV_PREFIX: &str = "ENSEMBLE_";

const PROJECT_FILES: [&str; 2] = ["ensemble.toml", ".ensemble.toml"];
const APP_DIR: &str = "model-ensemble";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Kind of configuration source, in priority order (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceKind {
    Environment,
    Explicit,
    Project,
    Global,
    Defaults,
}

impl ConfigSourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConfigSourceKind::Environment => "Env",
            ConfigSourceKind::Explicit => "Explicit",
            ConfigSourceKind::Project => "Project",
            ConfigSourceKind::Global => "Global",
            ConfigSourceKind::Defaults => "Default",
        }
    }
}

/// One place configuration may come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    /// File path, or a description for non-file sources
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ENSEMBLE_*` environment variables (`__` separates nested keys)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./ensemble.toml` or `./.ensemble.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/model-ensemble/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        Self::figment(config_path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load a single file over the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File-based layers, without environment overrides
    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/model-ensemble/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Every configuration source, highest priority first
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let env_vars: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();

        let mut sources = vec![ConfigSource {
            kind: ConfigSourceKind::Environment,
            location: if env_vars.is_empty() {
                format!("{}*", ENV_PREFIX)
            } else {
                env_vars.join(", ")
            },
            found: !env_vars.is_empty(),
        }];

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                kind: ConfigSourceKind::Explicit,
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(match Self::project_config_path() {
            Some(path) => ConfigSource {
                kind: ConfigSourceKind::Project,
                location: path.display().to_string(),
                found: true,
            },
            None => ConfigSource {
                kind: ConfigSourceKind::Project,
                location: format!("./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]),
                found: false,
            },
        });

        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                kind: ConfigSourceKind::Global,
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(ConfigSource {
            kind: ConfigSourceKind::Defaults,
            location: "built-in defaults".to_string(),
            found: true,
        });

        sources
    }
}
