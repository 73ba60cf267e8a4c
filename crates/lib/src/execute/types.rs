//! Types for build execution.
//!
//! This module defines the error types, reports, and configuration for
//! executing builds, checks and cleanups against a project.

use std::path::PathBuf;

use thiserror::Error;

use crate::asset::ConfigError;

/// Errors that can occur while orchestrating or executing builds.
///
/// `Config`, `NoSuchAsset` and `CycleDetected` abort an invocation before any
/// build runs. The remaining variants are per-asset build-step failures and
/// are recorded in a [`BuildReport`] instead of being returned.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Invalid asset, linter or tester declaration.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// A requested asset name is not defined.
  #[error("no such asset: {0}")]
  NoSuchAsset(String),

  /// The requested assets depend on each other in a cycle.
  #[error("dependency cycle detected between: {}", .0.join(", "))]
  CycleDetected(Vec<String>),

  /// Command exited with a non-zero status.
  #[error("command \"{cmd}\" {}: {stderr}", exit_status(.code))]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// Command exited successfully but wrote to stderr.
  #[error("command \"{cmd}\" failed with error: {stderr}")]
  CmdError { cmd: String, stderr: String },

  /// Command could not be started.
  #[error("failed to spawn \"{cmd}\": {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// A build function returned an error.
  #[error("{asset}: build function failed: {message}")]
  Function { asset: String, message: String },

  /// A command generator returned an error.
  #[error("{name}: command generator failed: {message}")]
  Generator { name: String, message: String },

  /// Reading an input or writing an output failed.
  #[error("{}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A build task panicked or was cancelled.
  #[error("build task for {asset} did not complete: {message}")]
  Task { asset: String, message: String },
}

fn exit_status(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("failed with exit code {code}"),
    None => "was terminated by signal".to_string(),
  }
}

/// Result of one `build` invocation.
#[derive(Debug, Default)]
pub struct BuildReport {
  /// The computed stages, as asset names.
  pub stages: Vec<Vec<String>>,

  /// Assets that built successfully, in completion order.
  pub built: Vec<String>,

  /// Assets whose build step failed.
  pub failed: Vec<(String, BuildError)>,
}

impl BuildReport {
  /// Returns true if every attempted asset built.
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }

  /// Returns the number of assets attempted.
  pub fn total(&self) -> usize {
    self.built.len() + self.failed.len()
  }

  /// Fold a nested report (e.g. the required assets of a checker) into this one.
  pub fn merge(&mut self, other: BuildReport) {
    self.stages.extend(other.stages);
    self.built.extend(other.built);
    self.failed.extend(other.failed);
  }
}

/// Result of running linters or testers.
#[derive(Debug, Default)]
pub struct CheckReport {
  /// Builds of required assets triggered by the checks.
  pub builds: BuildReport,

  /// Checkers whose command succeeded.
  pub passed: Vec<String>,

  /// Checkers whose command failed.
  pub failed: Vec<(String, BuildError)>,
}

impl CheckReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty() && self.builds.is_success()
  }
}

/// Result of cleaning asset outputs.
#[derive(Debug, Default)]
pub struct CleanReport {
  /// Output files that were removed.
  pub removed: Vec<PathBuf>,

  /// Output files that did not exist.
  pub missing: Vec<PathBuf>,
}

/// Configuration for build execution.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of assets built concurrently within a stage.
  pub parallelism: usize,

  /// Shell to use for command execution.
  /// If None, uses /bin/sh (Unix) or powershell.exe (Windows).
  pub shell: Option<String>,
}

impl Default for ExecuteConfig {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
      shell: None,
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
