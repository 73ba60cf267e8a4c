//! Asset declarations.
//!
//! An asset is a named build artifact: an ordered list of inputs, exactly one
//! output file, and an optional build action. Asset inputs are stored by name
//! and resolved through the [`Catalog`](crate::project::Catalog), so assets
//! never hold references to each other.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::file::AssetFile;
use crate::execute::cmd::{Command, CommandSubject};

/// Errors raised while declaring assets, linters and testers.
///
/// These are fatal: they are returned before any build runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("{0}: an asset cannot have both a build function and a command")]
  BuildAndCommand(String),

  #[error("asset '{0}' is already defined")]
  DuplicateAsset(String),

  #[error("{owner}: input '{input}' is not a defined asset")]
  UnknownInput { owner: String, input: String },

  #[error("{owner}: required asset '{asset}' is not defined")]
  UnknownRequirement { owner: String, asset: String },
}

/// Options passed to every build: the "build config" handed to build functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Rebuild even when outputs are up to date.
  pub force: bool,
  /// Include release-only assets.
  pub release: bool,
  /// Build the assets of a stage concurrently.
  pub parallel: bool,
}

/// A pure transform from input payloads to output text.
///
/// Payloads are file contents for file-backed inputs and the path string
/// otherwise, in input declaration order.
pub type BuildFn = Arc<dyn Fn(&BuildOptions, &[String]) -> anyhow::Result<String> + Send + Sync>;

/// How an asset produces its output.
#[derive(Clone)]
pub enum BuildAction {
  Function(BuildFn),
  Command(Command),
}

impl fmt::Debug for BuildAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildAction::Function(_) => f.write_str("Function(..)"),
      BuildAction::Command(cmd) => f.debug_tuple("Command").field(cmd).finish(),
    }
  }
}

/// A declared input of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Input {
  /// A plain file (or directory) that can never be built.
  File(AssetFile),
  /// Another asset, by name.
  Asset(String),
}

impl Input {
  pub fn file(path: impl Into<PathBuf>) -> Self {
    Input::File(AssetFile::new(path))
  }

  pub fn asset(name: impl Into<String>) -> Self {
    Input::Asset(name.into())
  }

  pub fn asset_name(&self) -> Option<&str> {
    match self {
      Input::Asset(name) => Some(name),
      Input::File(_) => None,
    }
  }
}

/// Builder for an asset declaration.
#[derive(Clone)]
pub struct AssetOptions {
  inputs: Vec<Input>,
  outfile: PathBuf,
  build: Option<BuildFn>,
  command: Option<Command>,
  release_only: bool,
}

impl fmt::Debug for AssetOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AssetOptions")
      .field("inputs", &self.inputs)
      .field("outfile", &self.outfile)
      .field("build", &self.build.as_ref().map(|_| ".."))
      .field("command", &self.command)
      .field("release_only", &self.release_only)
      .finish()
  }
}

impl AssetOptions {
  pub fn new(outfile: impl Into<PathBuf>) -> Self {
    Self {
      inputs: Vec::new(),
      outfile: outfile.into(),
      build: None,
      command: None,
      release_only: false,
    }
  }

  pub fn with_input(mut self, input: Input) -> Self {
    self.inputs.push(input);
    self
  }

  pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
    self.with_input(Input::file(path))
  }

  pub fn with_asset(self, name: impl Into<String>) -> Self {
    self.with_input(Input::asset(name))
  }

  pub fn with_build<F>(mut self, build: F) -> Self
  where
    F: Fn(&BuildOptions, &[String]) -> anyhow::Result<String> + Send + Sync + 'static,
  {
    self.build = Some(Arc::new(build));
    self
  }

  pub fn with_build_fn(mut self, build: BuildFn) -> Self {
    self.build = Some(build);
    self
  }

  pub fn with_command(mut self, command: impl Into<Command>) -> Self {
    self.command = Some(command.into());
    self
  }

  pub fn release_only(mut self, release_only: bool) -> Self {
    self.release_only = release_only;
    self
  }
}

/// A named build artifact.
#[derive(Debug, Clone)]
pub struct Asset {
  name: String,
  inputs: Vec<Input>,
  outfile: AssetFile,
  action: Option<BuildAction>,
  release_only: bool,
}

impl Asset {
  /// Create an asset from its declaration.
  ///
  /// # Errors
  ///
  /// Returns `ConfigError::BuildAndCommand` if both a build function and a
  /// command were declared.
  pub fn new(name: impl Into<String>, options: AssetOptions) -> Result<Self, ConfigError> {
    let name = name.into();

    let action = match (options.build, options.command) {
      (Some(_), Some(_)) => return Err(ConfigError::BuildAndCommand(name)),
      (Some(build), None) => Some(BuildAction::Function(build)),
      (None, Some(command)) => Some(BuildAction::Command(command)),
      (None, None) => None,
    };

    Ok(Self {
      name,
      inputs: options.inputs,
      outfile: AssetFile::new(options.outfile),
      action,
      release_only: options.release_only,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn inputs(&self) -> &[Input] {
    &self.inputs
  }

  pub fn outfile(&self) -> &AssetFile {
    &self.outfile
  }

  pub fn action(&self) -> Option<&BuildAction> {
    self.action.as_ref()
  }

  pub fn is_release_only(&self) -> bool {
    self.release_only
  }

  /// Names of the asset-typed inputs, in declaration order.
  pub fn asset_inputs(&self) -> impl Iterator<Item = &str> {
    self.inputs.iter().filter_map(Input::asset_name)
  }

  pub fn has_asset_dependencies(&self) -> bool {
    self.asset_inputs().next().is_some()
  }

  /// The subject handed to command generators for this asset.
  pub fn command_subject(&self) -> CommandSubject {
    CommandSubject {
      name: self.name.clone(),
      outfile: Some(self.outfile.path().to_path_buf()),
      requires: self.asset_inputs().map(str::to_string).collect(),
    }
  }
}

impl fmt::Display for Asset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}
