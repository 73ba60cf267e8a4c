//! Test utilities for unibuild-lib.
//!
//! Helpers for pinning file modification times and a command runner that
//! records instead of spawning processes.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::execute::cmd::CommandRunner;
use crate::execute::types::BuildError;

/// Write `contents` to `path` and set its modification time.
pub fn write_with_mtime(path: &Path, contents: &str, mtime: SystemTime) {
  std::fs::write(path, contents).unwrap();
  let file = File::options().write(true).open(path).unwrap();
  file.set_modified(mtime).unwrap();
}

pub fn minutes_ago(minutes: u64) -> SystemTime {
  SystemTime::now() - Duration::from_secs(minutes * 60)
}

pub fn minutes_from_now(minutes: u64) -> SystemTime {
  SystemTime::now() + Duration::from_secs(minutes * 60)
}

/// Records every command it is asked to run.
///
/// Commands listed with [`RecordingRunner::failing`] return `CmdFailed`.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
  commands: Arc<Mutex<Vec<String>>>,
  failing: HashSet<String>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing(mut self, cmd: &str) -> Self {
    self.failing.insert(cmd.to_string());
    self
  }

  /// Commands run so far, in order.
  pub fn commands(&self) -> Vec<String> {
    self.commands.lock().unwrap().clone()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, cmd: &str) -> Result<String, BuildError> {
    self.commands.lock().unwrap().push(cmd.to_string());
    if self.failing.contains(cmd) {
      return Err(BuildError::CmdFailed {
        cmd: cmd.to_string(),
        code: Some(1),
        stderr: "recorded failure".to_string(),
      });
    }
    Ok(String::new())
  }
}
