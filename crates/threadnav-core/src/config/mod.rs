use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NavError, Result};

mod env;

pub const ADDR_ENV: &str = "THREADNAV_ADDR";
pub const DATABASE_PATH_ENV: &str = "THREADNAV_DATABASE_PATH";
pub const CORS_ORIGINS_ENV: &str = "THREADNAV_CORS_ORIGINS";

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DATABASE_PATH: &str = ".threadnav/threadnav.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub addr: String,
    /// Origins allowed by CORS; empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl NavConfig {
    /// Defaults, then the optional TOML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|err| NavError::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn apply_env(&mut self) {
        if let Some(addr) = env::read_non_empty_env(ADDR_ENV) {
            self.server.addr = addr;
        }
        if let Some(path) = env::read_non_empty_env(DATABASE_PATH_ENV) {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(origins) = env::read_non_empty_env(CORS_ORIGINS_ENV) {
            self.server.cors_allowed_origins = env::split_csv(&origins);
        }
    }
}
