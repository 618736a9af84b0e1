use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::{SecretName, SecretsError, SecretsResult};
use crate::ports::outbound::SecretsManager;

/// Secrets stored as individual files under a node data directory.
///
/// Files are created owner-read/write only on unix. A secret is written to a
/// `.tmp` sibling first and linked into place once synced, so its final path
/// only ever holds complete contents.
pub struct LocalSecretsManager {
    base: PathBuf,
}

impl LocalSecretsManager {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn path_of(&self, name: SecretName) -> PathBuf {
        self.base.join(name.relative_path())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SecretsError {
    SecretsError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write `value` to a fresh file at `path`, replacing leftovers.
async fn write_staged(path: &Path, value: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(value).await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "[pb-06] Staged secret not removed");
    }
}

#[async_trait]
impl SecretsManager for LocalSecretsManager {
    async fn has_secret(&self, name: SecretName) -> SecretsResult<bool> {
        let path = self.path_of(name);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn get_secret(&self, name: SecretName) -> SecretsResult<Zeroizing<Vec<u8>>> {
        let path = self.path_of(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Zeroizing::new(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SecretsError::NotFound { name }),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn set_secret(&self, name: SecretName, value: &[u8]) -> SecretsResult<()> {
        let path = self.path_of(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))?
        {
            return Err(SecretsError::AlreadyExists { name });
        }

        let staging = staging_path(&path);
        if let Err(e) = write_staged(&staging, value).await {
            discard(&staging).await;
            return Err(io_error(&staging, e));
        }
        // Linking never replaces an existing file
        let linked = tokio::fs::hard_link(&staging, &path).await;
        discard(&staging).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(SecretsError::AlreadyExists { name });
            }
            Err(e) => return Err(io_error(&path, e)),
        }

        debug!(secret = %name, path = %path.display(), "[pb-06] Secret written");
        Ok(())
    }

    async fn remove_secret(&self, name: SecretName) -> SecretsResult<()> {
        let path = self.path_of(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SecretsError::NotFound { name }),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
