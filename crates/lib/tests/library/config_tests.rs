use unibuild_lib::eval::{EvalError, evaluate_config};

use super::common::{load, write_project};

#[test]
fn config_can_require_sibling_modules() {
  let project = write_project(&[
    (
      "lua/assets.lua",
      r#"
        local M = {}
        function M.define(ub)
          return ub.asset("styles", { input = ub.dir .. "/src/app.css", outfile = ub.dir .. "/dist.css" })
        end
        return M
      "#,
    ),
    (
      "unibuild.lua",
      r#"
        package.path = ub.dir .. "/lua/?.lua;" .. package.path
        local assets = require("assets")
        return {
          setup = function(ub)
            local styles = assets.define(ub)
            ub.lint("stylelint", { command = "stylelint", requires = styles })
          end,
        }
      "#,
    ),
  ]);

  let config = load(&project);
  let project = config.project();

  assert!(project.catalog().get("styles").is_some());
  assert_eq!(project.linters()[0].requires, vec!["styles"]);
}

#[test]
fn lua_errors_carry_the_config_location() {
  let project = write_project(&[(
    "unibuild.lua",
    r#"
      return {
        setup = function(ub)
          ub.asset("a", { outfile = 1 + nil })
        end,
      }
    "#,
  )]);

  let err = evaluate_config(&project.path().join("unibuild.lua")).err().unwrap();

  match err {
    EvalError::Lua(e) => assert!(e.to_string().contains("unibuild.lua"), "unexpected error: {e}"),
    other => panic!("expected lua error, got {other:?}"),
  }
}

#[test]
fn inputs_must_be_defined_before_use() {
  let project = write_project(&[(
    "unibuild.lua",
    r#"
      return {
        setup = function(ub)
          ub.asset("top", { input = { "src/top.js" }, outfile = "top.js" })
          ub.lint("eslint", { command = "eslint", requires = { "top", "bottom" } })
        end,
      }
    "#,
  )]);

  let err = evaluate_config(&project.path().join("unibuild.lua")).err().unwrap();

  assert!(err.to_string().contains("required asset 'bottom' is not defined"));
}

#[test]
fn setup_receives_the_ub_table() {
  let project = write_project(&[(
    "unibuild.lua",
    r#"
      return {
        setup = function(b)
          assert(b == ub, "setup should receive the ub table")
        end,
      }
    "#,
  )]);

  let config = load(&project);

  assert!(config.project().catalog().is_empty());
}
