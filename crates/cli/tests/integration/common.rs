//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory.
///
/// Commands run with the temp directory as their working directory, so
/// relative paths in the config resolve inside it.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a project with the given `unibuild.lua`.
  pub fn with_config(config: &str) -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("unibuild.lua", config);
    env
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root().join(relative_path)
  }

  /// Write a file relative to the project root, creating parent directories.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Write a file and backdate its modification time.
  pub fn write_old_file(&self, relative_path: &str, content: &str) {
    self.write_file(relative_path, content);
    set_mtime(&self.path(relative_path), SystemTime::now() - Duration::from_secs(3600));
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.path(relative_path)).unwrap()
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.path(relative_path).exists()
  }

  /// A command for the unibuild binary, running in the project root.
  pub fn unibuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("unibuild");
    cmd.current_dir(self.root());
    cmd.env("RUST_LOG", "warn");
    cmd
  }
}

fn set_mtime(path: &Path, time: SystemTime) {
  let file = std::fs::File::options().write(true).open(path).unwrap();
  file.set_modified(time).unwrap();
}
