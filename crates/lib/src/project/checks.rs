//! Linters, testers and release helpers.

use crate::execute::cmd::{Command, CommandSubject};

/// Declaration of a linter.
#[derive(Debug, Clone)]
pub struct LinterOptions {
  command: Command,
  autofix_command: Option<Command>,
  requires: Vec<String>,
}

impl LinterOptions {
  pub fn new(command: impl Into<Command>) -> Self {
    Self {
      command: command.into(),
      autofix_command: None,
      requires: Vec::new(),
    }
  }

  pub fn with_autofix(mut self, command: impl Into<Command>) -> Self {
    self.autofix_command = Some(command.into());
    self
  }

  pub fn with_requires(mut self, asset: impl Into<String>) -> Self {
    self.requires.push(asset.into());
    self
  }
}

/// A linter: a command run after its required assets are built.
#[derive(Debug, Clone)]
pub struct Linter {
  pub name: String,
  pub command: Command,
  pub autofix_command: Option<Command>,
  pub requires: Vec<String>,
}

impl Linter {
  pub fn new(name: impl Into<String>, options: LinterOptions) -> Self {
    Self {
      name: name.into(),
      command: options.command,
      autofix_command: options.autofix_command,
      requires: options.requires,
    }
  }

  /// The command to run; the autofix command when `fix` is set and one exists.
  pub fn command_for(&self, fix: bool) -> &Command {
    match (&self.autofix_command, fix) {
      (Some(autofix), true) => autofix,
      _ => &self.command,
    }
  }

  pub fn command_subject(&self) -> CommandSubject {
    CommandSubject {
      name: self.name.clone(),
      outfile: None,
      requires: self.requires.clone(),
    }
  }
}

/// Declaration of a tester.
#[derive(Debug, Clone)]
pub struct TesterOptions {
  command: Command,
  requires: Vec<String>,
}

impl TesterOptions {
  pub fn new(command: impl Into<Command>) -> Self {
    Self {
      command: command.into(),
      requires: Vec::new(),
    }
  }

  pub fn with_requires(mut self, asset: impl Into<String>) -> Self {
    self.requires.push(asset.into());
    self
  }
}

/// A tester: a command run after its required assets are built.
#[derive(Debug, Clone)]
pub struct Tester {
  pub name: String,
  pub command: Command,
  pub requires: Vec<String>,
}

impl Tester {
  pub fn new(name: impl Into<String>, options: TesterOptions) -> Self {
    Self {
      name: name.into(),
      command: options.command,
      requires: options.requires,
    }
  }

  pub fn command_subject(&self) -> CommandSubject {
    CommandSubject {
      name: self.name.clone(),
      outfile: None,
      requires: self.requires.clone(),
    }
  }
}

/// Commands used by `bump`, `publish` and `release`.
///
/// `{version}` in the rendered bump command is replaced with the requested
/// version; bump generators receive the version as the subject name.
#[derive(Debug, Clone)]
pub struct ReleaseCommands {
  pub bump: Command,
  pub push: Command,
  pub publish: Command,
}

impl Default for ReleaseCommands {
  fn default() -> Self {
    Self {
      bump: "npm version {version}".into(),
      push: vec!["git push", "git push --tags"].into(),
      publish: "yarn npm publish".into(),
    }
  }
}

impl ReleaseCommands {
  pub fn bump_subject(version: &str) -> CommandSubject {
    CommandSubject {
      name: version.to_string(),
      ..Default::default()
    }
  }
}
