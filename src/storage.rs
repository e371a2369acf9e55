use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::ErrorKind;
use tracing::warn;

use crate::config::PUBLIC_UPLOAD_PREFIX;

#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Creates (or truncates) `name` directly under the upload root.
    pub async fn create_file(&self, name: &str) -> Result<File, StorageError> {
        Ok(File::create(self.root.join(name)).await?)
    }

    /// Best-effort removal of a file left behind by a failed upload.
    pub async fn remove_file(&self, name: &str) {
        let path = self.root.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = ?path, error = %err, "failed to remove partial upload"),
        }
    }

    /// Visible entry names, sorted. A missing root lists as empty.
    pub async fn list_names(&self) -> Result<Vec<String>, StorageError> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::Io(err)),
        };
        let mut names = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }
}

/// Name a stored upload gets: `{epoch_millis}-{original}`.
pub fn stored_name(epoch_millis: i64, original: &str) -> String {
    format!("{epoch_millis}-{original}")
}

/// Path reported to clients for a stored upload.
pub fn public_path(name: &str) -> String {
    format!("{PUBLIC_UPLOAD_PREFIX}/{name}")
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}
