//! Integration tests for `unibuild build` and `unibuild clean`.

use predicates::prelude::*;

use super::common::TestEnv;

const GREETING_CONFIG: &str = r#"
return {
  setup = function(ub)
    ub.asset("greeting", {
      input = "src/name.txt",
      outfile = "greeting.txt",
      build = function(config, name)
        return "hello " .. name
      end,
    })
  end,
}
"#;

const CHAIN_CONFIG: &str = r#"
return {
  setup = function(ub)
    local base = ub.asset("base", {
      input = "src/base.txt",
      outfile = "base.out",
      build = function(_, text) return string.upper(text) end,
    })
    ub.asset("top", {
      input = { base, "src/top.txt" },
      outfile = "top.out",
      build = function(config, base, top)
        local mode = config.release and "release" or "debug"
        return mode .. ":" .. base .. "+" .. top
      end,
    })
    ub.asset("docs", {
      input = "src/top.txt",
      outfile = "docs.out",
      release_only = true,
      build = function(_, text) return "docs " .. text end,
    })
  end,
}
"#;

fn chain_env() -> TestEnv {
  let env = TestEnv::with_config(CHAIN_CONFIG);
  env.write_old_file("src/base.txt", "base");
  env.write_old_file("src/top.txt", "top");
  env
}

#[test]
fn build_function_writes_output() {
  let env = TestEnv::with_config(GREETING_CONFIG);
  env.write_old_file("src/name.txt", "world");

  env
    .unibuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete!"));

  assert_eq!(env.read_file("greeting.txt"), "hello world");
}

#[test]
fn no_subcommand_builds() {
  let env = TestEnv::with_config(GREETING_CONFIG);
  env.write_old_file("src/name.txt", "world");

  env.unibuild_cmd().assert().success();

  assert!(env.exists("greeting.txt"));
}

#[test]
fn up_to_date_outputs_are_skipped() {
  let env = TestEnv::with_config(GREETING_CONFIG);
  env.write_old_file("src/name.txt", "world");
  env.unibuild_cmd().arg("build").assert().success();

  env
    .unibuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to build"));
}

#[test]
fn changed_input_triggers_rebuild() {
  let env = TestEnv::with_config(GREETING_CONFIG);
  env.write_old_file("src/name.txt", "world");
  env.unibuild_cmd().arg("build").assert().success();

  // Backdate the output so the rewritten input is newer.
  env.write_old_file("greeting.txt", "hello world");
  env.write_file("src/name.txt", "there");

  env.unibuild_cmd().arg("build").assert().success();

  assert_eq!(env.read_file("greeting.txt"), "hello there");
}

#[test]
fn force_rebuilds_up_to_date_outputs() {
  let env = TestEnv::with_config(GREETING_CONFIG);
  env.write_old_file("src/name.txt", "world");
  env.write_file("greeting.txt", "stale but newer");

  env.unibuild_cmd().arg("build").assert().success();
  assert_eq!(env.read_file("greeting.txt"), "stale but newer");

  env.unibuild_cmd().args(["build", "--force"]).assert().success();
  assert_eq!(env.read_file("greeting.txt"), "hello world");
}

#[test]
fn asset_inputs_build_first_and_pass_their_output() {
  let env = chain_env();

  env
    .unibuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Stage 1: base"))
    .stdout(predicate::str::contains("Stage 2: top"));

  assert_eq!(env.read_file("top.out"), "debug:BASE+top");
}

#[test]
fn release_only_assets_need_release_mode() {
  let env = chain_env();

  env.unibuild_cmd().arg("build").assert().success();
  assert!(!env.exists("docs.out"));

  env.unibuild_cmd().args(["build", "--release", "--force"]).assert().success();
  assert_eq!(env.read_file("docs.out"), "docs top");
  assert_eq!(env.read_file("top.out"), "release:BASE+top");
}

#[test]
fn named_asset_pulls_in_missing_dependencies() {
  let env = chain_env();

  env.unibuild_cmd().args(["build", "top"]).assert().success();

  assert!(env.exists("base.out"));
  assert!(env.exists("top.out"));
  assert!(!env.exists("docs.out"));
}

#[test]
fn parallel_build_produces_same_outputs() {
  let env = chain_env();

  env
    .unibuild_cmd()
    .args(["build", "--parallel", "--jobs", "2", "--release"])
    .assert()
    .success();

  assert_eq!(env.read_file("top.out"), "release:BASE+top");
  assert_eq!(env.read_file("docs.out"), "docs top");
}

#[test]
fn json_output_reports_stages_and_assets() {
  let env = chain_env();

  let output = env
    .unibuild_cmd()
    .args(["build", "--output", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["success"], true);
  assert_eq!(json["stages"], serde_json::json!([["base"], ["top"]]));
  assert_eq!(json["built"], serde_json::json!(["base", "top"]));
  assert_eq!(json["failed"], serde_json::json!([]));
}

#[test]
fn failing_build_function_fails_the_command() {
  let env = TestEnv::with_config(
    r#"
      return {
        setup = function(ub)
          ub.asset("broken", {
            outfile = "broken.out",
            build = function() error("cannot build this") end,
          })
          ub.asset("fine", {
            outfile = "fine.out",
            build = function() return "ok" end,
          })
        end,
      }
    "#,
  );

  env
    .unibuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stdout(predicate::str::contains("cannot build this"))
    .stderr(predicate::str::contains("1 of 2 assets failed to build"));

  assert_eq!(env.read_file("fine.out"), "ok");
}

#[cfg(unix)]
#[test]
fn command_assets_run_in_the_shell() {
  let env = TestEnv::with_config(
    r#"
      return {
        setup = function(ub)
          ub.asset("copy", {
            input = "src/in.txt",
            outfile = "copy.txt",
            command = function(asset) return "cp src/in.txt " .. asset.outfile end,
          })
          ub.asset("broken", { outfile = "never.txt", command = "exit 3" })
        end,
      }
    "#,
  );
  env.write_old_file("src/in.txt", "payload");

  env.unibuild_cmd().args(["build", "copy"]).assert().success();
  assert_eq!(env.read_file("copy.txt"), "payload");

  env
    .unibuild_cmd()
    .args(["build", "broken"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("failed with exit code 3"));
}

#[test]
fn clean_removes_outputs() {
  let env = chain_env();
  env.unibuild_cmd().args(["build", "--release"]).assert().success();
  assert!(env.exists("docs.out"));

  env
    .unibuild_cmd()
    .args(["clean", "top"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed"));
  assert!(!env.exists("top.out"));
  assert!(env.exists("base.out"));

  env.unibuild_cmd().arg("clean").assert().success();
  assert!(!env.exists("base.out"));
  assert!(!env.exists("docs.out"));
}
