//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, build and check summaries, and JSON output.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use unibuild_lib::execute::{BuildError, BuildReport, CheckReport};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// `1 asset`, `3 assets`.
pub fn count(n: usize, noun: &str) -> String {
  if n == 1 {
    format!("{} {}", n, noun)
  } else {
    format!("{} {}s", n, noun)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Print one failed asset or checker with its error.
pub fn print_failure(name: &str, error: &BuildError) {
  println!(
    "  {} {} {} {}",
    symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
    name.if_supports_color(Stream::Stdout, |s| s.bold()),
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    error
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
  pub name: String,
  pub error: String,
}

fn summarize_failures(failed: &[(String, BuildError)]) -> Vec<FailureSummary> {
  failed
    .iter()
    .map(|(name, error)| FailureSummary {
      name: name.clone(),
      error: error.to_string(),
    })
    .collect()
}

/// Serializable view of a [`BuildReport`].
#[derive(Debug, Serialize)]
pub struct BuildSummary {
  pub success: bool,
  pub stages: Vec<Vec<String>>,
  pub built: Vec<String>,
  pub failed: Vec<FailureSummary>,
  pub duration_ms: u128,
}

impl BuildSummary {
  pub fn new(report: &BuildReport, duration: Duration) -> Self {
    Self {
      success: report.is_success(),
      stages: report.stages.clone(),
      built: report.built.clone(),
      failed: summarize_failures(&report.failed),
      duration_ms: duration.as_millis(),
    }
  }
}

pub fn print_build_report(report: &BuildReport, duration: Duration) {
  if report.stages.is_empty() {
    print_info("Nothing to build, all assets are up to date");
    return;
  }

  for (idx, stage) in report.stages.iter().enumerate() {
    print_info(&format!("Stage {}: {}", idx + 1, stage.join(", ")));
  }

  println!();
  if report.is_success() {
    print_success("Build complete!");
  } else {
    print_error("Build finished with failures");
    for (name, error) in &report.failed {
      print_failure(name, error);
    }
  }
  print_stat("Built", &count(report.built.len(), "asset"));
  print_stat("Failed", &count(report.failed.len(), "asset"));
  print_stat("Duration", &format_duration(duration));
}

pub fn print_check_report(kind: &str, report: &CheckReport, duration: Duration) {
  if !report.builds.failed.is_empty() {
    print_error("Some required assets failed to build");
    for (name, error) in &report.builds.failed {
      print_failure(name, error);
    }
  }

  for (name, error) in &report.failed {
    print_failure(name, error);
  }

  println!();
  if report.is_success() {
    print_success(&format!("{} passed!", kind));
  } else {
    print_error(&format!("{} failed", kind));
  }
  print_stat("Passed", &report.passed.len().to_string());
  print_stat("Failed", &report.failed.len().to_string());
  print_stat("Duration", &format_duration(duration));
}
