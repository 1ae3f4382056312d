//! Token persistence
//!
//! The token file is the only state shared between runs. It is rewritten on
//! every authorization and refresh, always with the same 4-space layout, so a
//! save → load → save cycle reproduces the file byte for byte.
//!
//! Writes go through a temp file + rename in the same directory. There is no
//! lock: a single process is expected to own the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::token::Token;

/// Reads and writes the persisted token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted token.
    ///
    /// A missing file is reported as `TokenFileNotFound` and an unparseable
    /// one as `TokenParse`; the manager recovers from both by re-authorizing.
    /// Any other I/O failure is returned as `Io`.
    pub async fn load(&self) -> Result<Token> {
        let token: Token = read_json(&self.path, Error::TokenFileNotFound, Error::TokenParse).await?;
        debug!(path = %self.path.display(), "loaded token");
        Ok(token)
    }

    /// Persist a token, creating the metadata directory if needed.
    pub async fn save(&self, token: &Token) -> Result<()> {
        write_json_atomic(&self.path, token).await?;
        info!(path = %self.path.display(), "token written to disk");
        Ok(())
    }
}

/// Read a JSON file, mapping not-found and parse failures to caller-chosen
/// variants.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &Path,
    not_found: impl FnOnce(PathBuf) -> Error,
    parse: impl FnOnce(String) -> Error,
) -> Result<T> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(path.to_path_buf())),
        Err(e) => return Err(Error::Io(format!("reading {}: {e}", path.display()))),
    };
    serde_json::from_str(&contents).map_err(|e| parse(format!("parsing {}: {e}", path.display())))
}

/// Serialize with 4-space indentation and no trailing newline.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::Io(format!("serializing {}: {e}", std::any::type_name::<T>())))?;
    Ok(out)
}

/// Write JSON atomically with 0600 permissions.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target, so a crash mid-write never leaves a truncated token or key.
pub(crate) async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = to_pretty_json(value)?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io(format!("{} has no parent directory", path.display())))?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::Io(format!("creating metadata directory: {e}")))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{file_name}.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| Error::Io(format!("writing temp file {}: {e}", tmp_path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp file into {}: {e}", path.display())))?;

    debug!(path = %path.display(), bytes = json.len(), "persisted json");
    Ok(())
}
