//! Integration tests for `unibuild ci`, `bump`, `publish` and `release`.
#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

fn release_config(test_command: &str) -> String {
  format!(
    r#"
      return {{
        setup = function(ub)
          ub.asset("app", {{
            input = "src/app.txt",
            outfile = "app.out",
            build = function(config, text)
              return (config.release and "release " or "debug ") .. text
            end,
          }})
          ub.asset("dist", {{
            input = "src/app.txt",
            outfile = "dist.out",
            release_only = true,
            build = function(_, text) return "dist " .. text end,
          }})
          ub.test("unit", {{ command = "{test_command}" }})
          ub.release({{
            bump = "echo {{version}} > version.txt",
            push = "touch pushed.txt",
            publish = function() return "touch published.txt" end,
          }})
        end,
      }}
    "#
  )
}

fn release_env(test_command: &str) -> TestEnv {
  let env = TestEnv::with_config(&release_config(test_command));
  env.write_old_file("src/app.txt", "app");
  env
}

#[test]
fn ci_builds_release_only_assets_last() {
  let env = release_env("test -f app.out");

  env
    .unibuild_cmd()
    .arg("ci")
    .assert()
    .success()
    .stdout(predicate::str::contains("CI passed!"));

  assert_eq!(env.read_file("app.out"), "debug app");
  assert_eq!(env.read_file("dist.out"), "dist app");
}

#[test]
fn ci_stops_at_the_first_failure() {
  let env = release_env("exit 1");

  env.unibuild_cmd().arg("ci").assert().failure();

  assert_eq!(env.read_file("app.out"), "debug app");
  assert!(!env.exists("dist.out"));
}

#[test]
fn bump_substitutes_the_version() {
  let env = release_env("true");

  env
    .unibuild_cmd()
    .args(["bump", "1.2.3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Bumped version to 1.2.3"));

  assert_eq!(env.read_file("version.txt").trim(), "1.2.3");
}

#[test]
fn publish_runs_generated_command() {
  let env = release_env("true");

  env.unibuild_cmd().arg("publish").assert().success();

  assert!(env.exists("published.txt"));
  assert!(!env.exists("pushed.txt"));
}

#[test]
fn release_runs_every_step() {
  let env = release_env("true");

  env
    .unibuild_cmd()
    .args(["release", "2.0.0"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Released 2.0.0!"));

  assert_eq!(env.read_file("version.txt").trim(), "2.0.0");
  assert!(env.exists("pushed.txt"));
  assert!(env.exists("published.txt"));
}

#[test]
fn failed_ci_blocks_the_release() {
  let env = release_env("exit 1");

  env.unibuild_cmd().args(["release", "2.0.0"]).assert().failure();

  assert!(!env.exists("version.txt"));
  assert!(!env.exists("published.txt"));
}
