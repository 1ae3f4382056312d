//! Configuration types and loading
//!
//! Config file precedence: `--config` > MAL_FETCH_CONFIG env var >
//! `mal-fetch.toml` in the working directory. Only the default location may
//! be absent, in which case every value falls back to its default.
//! Client credentials are never read from the TOML; they come from the key
//! file or from MAL_CLIENT_ID + MAL_CLIENT_SECRET.

use std::path::{Path, PathBuf};
use std::time::Duration;

use common::{DEFAULT_API_BASE, DEFAULT_METADATA_DIR, DEFAULT_OAUTH_BASE, Endpoints, Secret, StoragePaths};
use serde::Deserialize;
use tracing::debug;

const CONFIG_ENV: &str = "MAL_FETCH_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "mal-fetch.toml";
const METADATA_DIR_ENV: &str = "MAL_METADATA_DIR";
const CLIENT_ID_ENV: &str = "MAL_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "MAL_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Client id and secret from the environment, bypassing the key file
    #[serde(skip)]
    pub client_override: Option<(String, Secret<String>)>,
}

/// Provider endpoints and HTTP settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_oauth_base")]
    pub oauth_base: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            oauth_base: default_oauth_base(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where the token and key files live
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
        }
    }
}

fn default_oauth_base() -> String {
    DEFAULT_OAUTH_BASE.to_owned()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_owned()
}

fn default_timeout() -> u64 {
    30
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from(DEFAULT_METADATA_DIR)
}

/// Config file location and whether the user asked for it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub explicit: bool,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            common::Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.finish()
    }

    /// Load from the resolved location. A missing file at the default
    /// location yields the defaults; a missing explicit file is an error.
    pub fn load_resolved(location: &ConfigPath) -> common::Result<Self> {
        if !location.explicit && !location.path.exists() {
            debug!(path = %location.path.display(), "no config file, using defaults");
            return Config::default().finish();
        }
        Self::load(&location.path)
    }

    /// Resolve the config file path from the CLI arg or MAL_FETCH_CONFIG.
    pub fn resolve_path(cli_path: Option<&Path>) -> ConfigPath {
        if let Some(p) = cli_path {
            return ConfigPath {
                path: p.to_path_buf(),
                explicit: true,
            };
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return ConfigPath {
                path: PathBuf::from(p),
                explicit: true,
            };
        }
        ConfigPath {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            explicit: false,
        }
    }

    fn finish(mut self) -> common::Result<Self> {
        self.validate()?;

        if let Ok(dir) = std::env::var(METADATA_DIR_ENV) {
            self.storage.metadata_dir = PathBuf::from(dir);
        }

        // Both or neither; a lone id or secret is ignored
        if let (Ok(id), Ok(secret)) = (std::env::var(CLIENT_ID_ENV), std::env::var(CLIENT_SECRET_ENV)) {
            self.client_override = Some((id, Secret::new(secret)));
        }

        Ok(self)
    }

    fn validate(&self) -> common::Result<()> {
        self.endpoints()?;

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn endpoints(&self) -> common::Result<Endpoints> {
        Endpoints::new(self.api.oauth_base.clone(), self.api.api_base.clone())
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.storage.metadata_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
