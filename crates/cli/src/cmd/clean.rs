use std::path::Path;

use anyhow::{Context, Result};

use unibuild_lib::execute::ExecuteConfig;

use super::Session;
use crate::output::{count, print_stat, print_success};

/// Execute the clean command.
pub fn cmd_clean(config: &Path, assets: &[String]) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  let report = session
    .block_on(session.builder().clean(assets))
    .context("Clean failed")?;

  println!();
  print_success("Clean complete!");
  print_stat("Removed", &count(report.removed.len(), "file"));
  print_stat("Already missing", &count(report.missing.len(), "file"));

  Ok(())
}
