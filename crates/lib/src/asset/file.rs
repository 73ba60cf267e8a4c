//! Filesystem-backed files: plain inputs and asset outputs.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A path on disk with the timestamp queries staleness checks rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetFile {
  path: PathBuf,
}

impl AssetFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  /// Returns true if the path exists and is a regular file (not a directory).
  pub fn is_file(&self) -> bool {
    self.path.is_file()
  }

  /// Modification time of the file, or `UNIX_EPOCH` when it does not exist.
  pub fn modified_time(&self) -> SystemTime {
    std::fs::metadata(&self.path)
      .and_then(|meta| meta.modified())
      .unwrap_or(SystemTime::UNIX_EPOCH)
  }

  pub fn newer_than(&self, other: SystemTime) -> bool {
    self.modified_time() > other
  }

  pub async fn read(&self) -> std::io::Result<String> {
    tokio::fs::read_to_string(&self.path).await
  }

  /// Replace the file contents. Parent directories are not created.
  pub async fn write(&self, contents: &str) -> std::io::Result<()> {
    tokio::fs::write(&self.path, contents).await
  }

  pub async fn remove(&self) -> std::io::Result<()> {
    tokio::fs::remove_file(&self.path).await
  }
}

impl std::fmt::Display for AssetFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.path.display())
  }
}
