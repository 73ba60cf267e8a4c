use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;

use unibuild_lib::asset::BuildOptions;
use unibuild_lib::execute::{BuildReport, ExecuteConfig};

use super::Session;
use crate::output::{BuildSummary, OutputFormat, count, print_build_report, print_json};

#[derive(Debug, Default, Args)]
pub struct BuildArgs {
  /// Assets to build (all assets when none are given)
  pub assets: Vec<String>,

  /// Rebuild even when outputs are up to date
  #[arg(short, long)]
  pub force: bool,

  /// Build for release, including release-only assets
  #[arg(short, long)]
  pub release: bool,

  /// Build the assets of each stage concurrently
  #[arg(short, long)]
  pub parallel: bool,

  /// Maximum concurrent builds per stage (defaults to the number of CPUs)
  #[arg(short, long)]
  pub jobs: Option<usize>,

  /// Output format
  #[arg(short, long, value_enum, default_value_t)]
  pub output: OutputFormat,
}

impl BuildArgs {
  fn options(&self) -> BuildOptions {
    BuildOptions {
      force: self.force,
      release: self.release,
      parallel: self.parallel,
    }
  }

  fn execute_config(&self) -> ExecuteConfig {
    let mut config = ExecuteConfig::default();
    if let Some(jobs) = self.jobs {
      config.parallelism = jobs.max(1);
    }
    config
  }
}

/// Execute the build command.
pub fn cmd_build(config: &Path, args: &BuildArgs) -> Result<()> {
  let session = Session::open(config, args.execute_config())?;
  let start = Instant::now();
  let report = run_build(&session, &args.assets, args.options())?;
  let duration = start.elapsed();

  if args.output.is_json() {
    print_json(&BuildSummary::new(&report, duration))?;
  } else {
    println!();
    print_build_report(&report, duration);
  }

  ensure_built(&report)
}

/// Run one build, failing on errors that abort the whole invocation.
pub(super) fn run_build(session: &Session, assets: &[String], options: BuildOptions) -> Result<BuildReport> {
  session
    .block_on(session.builder().build(assets, options))
    .context("Build failed")
}

pub(super) fn ensure_built(report: &BuildReport) -> Result<()> {
  if !report.is_success() {
    bail!(
      "{} of {} failed to build",
      report.failed.len(),
      count(report.total(), "asset")
    );
  }
  Ok(())
}
