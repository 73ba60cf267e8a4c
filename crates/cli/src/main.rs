mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::BuildArgs;
use crate::output::print_error;

/// unibuild - incremental build orchestrator
#[derive(Parser)]
#[command(name = "unibuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the configuration file
  #[arg(short, long, global = true, default_value = "unibuild.lua")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Build assets that are out of date (all assets when none are named)
  Build(BuildArgs),

  /// Run the configured linters
  Lint {
    /// Run autofix commands where available
    #[arg(short, long)]
    fix: bool,
  },

  /// Run the configured testers
  Test,

  /// Remove asset outputs (all assets when none are named)
  Clean {
    /// Assets to clean
    assets: Vec<String>,
  },

  /// Build, lint, test and build for release, stopping at the first failure
  Ci,

  /// Bump the package version
  Bump {
    /// New version, passed to the bump command
    version: String,
  },

  /// Publish the package
  Publish,

  /// Run ci, then bump the version, push and publish
  Release {
    /// New version, passed to the bump command
    version: String,
  },
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = cli.config.as_path();
  let result = match cli.command.unwrap_or_else(|| Commands::Build(BuildArgs::default())) {
    Commands::Build(args) => cmd::cmd_build(config, &args),
    Commands::Lint { fix } => cmd::cmd_lint(config, fix),
    Commands::Test => cmd::cmd_test(config),
    Commands::Clean { assets } => cmd::cmd_clean(config, &assets),
    Commands::Ci => cmd::cmd_ci(config),
    Commands::Bump { version } => cmd::cmd_bump(config, &version),
    Commands::Publish => cmd::cmd_publish(config),
    Commands::Release { version } => cmd::cmd_release(config, &version),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
