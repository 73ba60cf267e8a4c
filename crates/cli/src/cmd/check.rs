use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};

use unibuild_lib::execute::{CheckReport, ExecuteConfig};

use super::Session;
use crate::output::{print_check_report, print_info};

/// Execute the lint command.
pub fn cmd_lint(config: &Path, fix: bool) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  run_lint(&session, fix)
}

/// Execute the test command.
pub fn cmd_test(config: &Path) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  run_test(&session)
}

pub(super) fn run_lint(session: &Session, fix: bool) -> Result<()> {
  if session.builder().project().linters().is_empty() {
    print_info("No linters configured");
    return Ok(());
  }

  let start = Instant::now();
  let report = session
    .block_on(session.builder().lint(fix))
    .context("Lint failed")?;
  finish("Lint", &report, start)
}

pub(super) fn run_test(session: &Session) -> Result<()> {
  if session.builder().project().testers().is_empty() {
    print_info("No testers configured");
    return Ok(());
  }

  let start = Instant::now();
  let report = session
    .block_on(session.builder().test())
    .context("Test failed")?;
  finish("Tests", &report, start)
}

fn finish(kind: &str, report: &CheckReport, start: Instant) -> Result<()> {
  println!();
  print_check_report(kind, report, start.elapsed());

  if !report.is_success() {
    bail!("{} failed", kind);
  }
  Ok(())
}
