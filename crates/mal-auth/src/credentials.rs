//! Client credential storage
//!
//! The client id/secret pair is issued once by the provider and kept in a
//! small JSON file (`{"_id": .., "_secret": ..}`) next to the token. It is
//! read on every start; when it is missing or unreadable the caller-supplied
//! prompt is asked for a new pair, which is validated before it is written.

use std::path::{Path, PathBuf};

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{CLIENT_ID_LEN, CLIENT_SECRET_LEN};
use crate::error::{Error, Result};
use crate::store::{read_json, write_json_atomic};

/// Client id/secret pair used to authenticate against the token endpoint.
///
/// Both fields have fixed widths; a `Credential` can only be obtained through
/// `new` or `CredentialStore::load`, which enforce them. It serializes to the
/// key file layout but is deliberately not `Deserialize`.
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    #[serde(rename = "_id")]
    client_id: String,
    #[serde(rename = "_secret")]
    client_secret: Secret<String>,
}

impl Credential {
    /// Build a credential, rejecting ids and secrets of the wrong length.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let credential = Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
        };
        credential.validate()?;
        Ok(credential)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &Secret<String> {
        &self.client_secret
    }

    fn validate(&self) -> Result<()> {
        let id_len = self.client_id.chars().count();
        if id_len != CLIENT_ID_LEN {
            return Err(Error::InvalidClientId {
                len: id_len,
                expected: CLIENT_ID_LEN,
            });
        }
        let secret_len = self.client_secret.expose().chars().count();
        if secret_len != CLIENT_SECRET_LEN {
            return Err(Error::InvalidClientSecret {
                len: secret_len,
                expected: CLIENT_SECRET_LEN,
            });
        }
        Ok(())
    }
}

/// Key file contents before length validation.
#[derive(Deserialize)]
struct KeyFile {
    #[serde(rename = "_id")]
    client_id: String,
    #[serde(rename = "_secret")]
    client_secret: Secret<String>,
}

impl TryFrom<KeyFile> for Credential {
    type Error = Error;

    fn try_from(file: KeyFile) -> Result<Self> {
        let credential = Credential {
            client_id: file.client_id,
            client_secret: file.client_secret,
        };
        credential.validate()?;
        Ok(credential)
    }
}

/// Key file manager.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the stored credential.
    pub async fn load(&self) -> Result<Credential> {
        let file: KeyFile = read_json(&self.path, Error::KeyFileNotFound, Error::CredentialParse).await?;
        let credential = Credential::try_from(file)?;
        info!(path = %self.path.display(), "loaded client credentials");
        Ok(credential)
    }

    /// Persist a credential, creating the metadata directory if needed.
    pub async fn save(&self, credential: &Credential) -> Result<()> {
        write_json_atomic(&self.path, credential).await?;
        info!(path = %self.path.display(), "key file written to disk");
        Ok(())
    }

    /// Load the stored credential, or ask for a new one when the key file is
    /// missing or unparseable.
    ///
    /// `prompt` returns the raw `(client_id, client_secret)` pair; surrounding
    /// whitespace is trimmed. A stored credential with the wrong lengths is
    /// an error, not a reason to prompt.
    pub async fn load_or_prompt<F>(&self, prompt: F) -> Result<Credential>
    where
        F: FnOnce() -> std::io::Result<(String, String)>,
    {
        match self.load().await {
            Ok(credential) => return Ok(credential),
            Err(Error::KeyFileNotFound(_)) => {
                info!(path = %self.path.display(), "key file not found, prompting for credentials");
            }
            Err(Error::CredentialParse(msg)) => {
                warn!(path = %self.path.display(), error = %msg, "key file unreadable, prompting for credentials");
            }
            Err(e) => return Err(e),
        }

        let (client_id, client_secret) =
            prompt().map_err(|e| Error::Prompt(format!("reading client credentials: {e}")))?;
        let credential = Credential::new(client_id.trim(), client_secret.trim())?;
        self.save(&credential).await?;
        Ok(credential)
    }
}
