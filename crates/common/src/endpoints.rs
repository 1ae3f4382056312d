//! Provider endpoints and on-disk metadata locations
//!
//! Both values are built once at startup and handed to the token manager and
//! the anime client. Tests point them at a mock server and a temp directory.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default OAuth2 base (authorize and token endpoints live under it)
pub const DEFAULT_OAUTH_BASE: &str = "https://myanimelist.net/v1/oauth2";

/// Default REST API base
pub const DEFAULT_API_BASE: &str = "https://api.myanimelist.net";

/// Default metadata directory, relative to the working directory
pub const DEFAULT_METADATA_DIR: &str = "_api";

const TOKEN_FILE: &str = "token.json";
const KEY_FILE: &str = "key.json";

/// Base URLs of the catalogue provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    oauth_base: String,
    api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            oauth_base: DEFAULT_OAUTH_BASE.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }
}

impl Endpoints {
    /// Build endpoints from two base URLs. Trailing slashes are dropped so
    /// path joins stay stable.
    pub fn new(oauth_base: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let oauth_base = normalize_base("oauth_base", oauth_base.into())?;
        let api_base = normalize_base("api_base", api_base.into())?;
        Ok(Self {
            oauth_base,
            api_base,
        })
    }

    pub fn oauth_base(&self) -> &str {
        &self.oauth_base
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Interactive authorization page
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.oauth_base)
    }

    /// Token endpoint for both the authorization-code and refresh grants
    pub fn token_url(&self) -> String {
        format!("{}/token", self.oauth_base)
    }

    /// Authenticated user profile, used purely as a token probe
    pub fn probe_url(&self) -> String {
        format!("{}/v2/users/@me", self.api_base)
    }

    /// Anime search (list) endpoint
    pub fn anime_url(&self) -> String {
        format!("{}/v2/anime", self.api_base)
    }

    /// Single anime endpoint
    pub fn anime_detail_url(&self, id: u64) -> String {
        format!("{}/v2/anime/{id}", self.api_base)
    }
}

fn normalize_base(name: &str, value: String) -> Result<String> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(Error::Config(format!(
            "{name} must start with http:// or https://, got: {value}"
        )));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

/// Location of the token and key files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    dir: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_DIR)
    }
}

impl StoragePaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn token_file(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    pub fn key_file(&self) -> PathBuf {
        self.dir.join(KEY_FILE)
    }
}
