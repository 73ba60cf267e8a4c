//! Shell commands: declaration, rendering and execution.
//!
//! Assets, linters and testers declare commands as a literal string, a list of
//! strings run one after another (`&&`-joined), or a generator that produces
//! either from its owning entity. Commands are rendered to a single string and
//! handed to a [`CommandRunner`].

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::process::Command as Process;
use tracing::{debug, info};

use super::types::BuildError;

/// The entity a command belongs to, as seen by command generators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSubject {
  pub name: String,
  /// Output file, for assets.
  pub outfile: Option<PathBuf>,
  /// Names of the assets this entity depends on.
  pub requires: Vec<String>,
}

pub type CommandGenerator = Arc<dyn Fn(&CommandSubject) -> anyhow::Result<Command> + Send + Sync>;

/// A declared command, resolved to a literal string before execution.
#[derive(Clone)]
pub enum Command {
  Literal(String),
  Sequence(Vec<String>),
  Generator(CommandGenerator),
}

impl Command {
  pub fn generator<F>(generate: F) -> Self
  where
    F: Fn(&CommandSubject) -> anyhow::Result<Command> + Send + Sync + 'static,
  {
    Command::Generator(Arc::new(generate))
  }

  /// Resolve to the literal command line for `subject`.
  pub fn render(&self, subject: &CommandSubject) -> Result<String, BuildError> {
    match self {
      Command::Literal(cmd) => Ok(cmd.clone()),
      Command::Sequence(cmds) => Ok(cmds.join(" && ")),
      Command::Generator(generate) => {
        let generated = generate(subject).map_err(|e| BuildError::Generator {
          name: subject.name.clone(),
          message: format!("{:#}", e),
        })?;
        generated.render(subject)
      }
    }
  }
}

impl fmt::Debug for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Command::Literal(cmd) => f.debug_tuple("Literal").field(cmd).finish(),
      Command::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
      Command::Generator(_) => f.write_str("Generator(..)"),
    }
  }
}

impl From<&str> for Command {
  fn from(cmd: &str) -> Self {
    Command::Literal(cmd.to_string())
  }
}

impl From<String> for Command {
  fn from(cmd: String) -> Self {
    Command::Literal(cmd)
  }
}

impl From<Vec<String>> for Command {
  fn from(cmds: Vec<String>) -> Self {
    Command::Sequence(cmds)
  }
}

impl From<Vec<&str>> for Command {
  fn from(cmds: Vec<&str>) -> Self {
    Command::Sequence(cmds.into_iter().map(str::to_string).collect())
  }
}

/// Executes rendered command lines.
pub trait CommandRunner: Send + Sync + 'static {
  /// Run `cmd` to completion and return its trimmed stdout.
  fn run(&self, cmd: &str) -> impl Future<Output = Result<String, BuildError>> + Send;
}

/// Runs commands through the platform shell, inheriting the environment and
/// working directory of the current process.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
  shell: Option<String>,
}

impl ShellRunner {
  pub fn new(shell: Option<String>) -> Self {
    Self { shell }
  }
}

impl CommandRunner for ShellRunner {
  async fn run(&self, cmd: &str) -> Result<String, BuildError> {
    info!(cmd = %cmd, "running command");

    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());
    debug!(shell = %shell_cmd, "spawning process");

    let output = Process::new(&shell_cmd)
      .args(&shell_args)
      .arg(cmd)
      .output()
      .await
      .map_err(|source| BuildError::Spawn {
        cmd: cmd.to_string(),
        source,
      })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command output");
    }

    if !output.status.success() {
      return Err(BuildError::CmdFailed {
        cmd: cmd.to_string(),
        code: output.status.code(),
        stderr,
      });
    }

    // Anything on stderr counts as a failure, even with a zero exit status.
    if !stderr.is_empty() {
      return Err(BuildError::CmdError {
        cmd: cmd.to_string(),
        stderr,
      });
    }

    Ok(stdout)
  }
}

/// Get the shell command and arguments for the current platform.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}
