use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use unibuild_lib::asset::BuildOptions;
use unibuild_lib::execute::ExecuteConfig;

use super::Session;
use super::build::{ensure_built, run_build};
use super::check::{run_lint, run_test};
use crate::output::{print_build_report, print_info, print_success};

/// Execute the ci command.
pub fn cmd_ci(config: &Path) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  run_ci(&session)?;

  println!();
  print_success("CI passed!");
  Ok(())
}

/// Build, lint, test, then build for release. Stops at the first failure.
pub(super) fn run_ci(session: &Session) -> Result<()> {
  build_all(session, false)?;
  run_lint(session, false)?;
  run_test(session)?;
  build_all(session, true)
}

fn build_all(session: &Session, release: bool) -> Result<()> {
  print_info(if release { "Building for release" } else { "Building" });

  let start = Instant::now();
  let options = BuildOptions {
    release,
    ..Default::default()
  };
  let report = run_build(session, &[], options)?;
  print_build_report(&report, start.elapsed());
  ensure_built(&report)
}
