use std::path::Path;

use anyhow::{Context, Result};

use unibuild_lib::execute::ExecuteConfig;

use super::Session;
use super::ci::run_ci;
use crate::output::{print_info, print_success};

/// Execute the bump command.
pub fn cmd_bump(config: &Path, version: &str) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  bump(&session, version)?;
  print_success(&format!("Bumped version to {}", version));
  Ok(())
}

/// Execute the publish command.
pub fn cmd_publish(config: &Path) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;
  publish(&session)?;
  print_success("Published!");
  Ok(())
}

/// Execute the release command: ci, bump, push, publish.
pub fn cmd_release(config: &Path, version: &str) -> Result<()> {
  let session = Session::open(config, ExecuteConfig::default())?;

  run_ci(&session)?;
  bump(&session, version)?;

  print_info("Pushing");
  session
    .block_on(session.builder().push())
    .context("Push failed")?;

  publish(&session)?;

  println!();
  print_success(&format!("Released {}!", version));
  Ok(())
}

fn bump(session: &Session, version: &str) -> Result<()> {
  print_info(&format!("Bumping version to {}", version));
  session
    .block_on(session.builder().bump(version))
    .context("Version bump failed")
}

fn publish(session: &Session) -> Result<()> {
  print_info("Publishing");
  session
    .block_on(session.builder().publish())
    .context("Publish failed")
}
