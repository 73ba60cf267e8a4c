//! The `ub` global table.
//!
//! - `ub.asset(name, { input, outfile, build, command, release_only })` - Define an asset
//! - `ub.lint(name, { command, autofix_command, requires })` - Define a linter
//! - `ub.test(name, { command, requires })` - Define a tester
//! - `ub.release({ bump, push, publish })` - Override the release commands
//! - `ub.dir` - Directory of the configuration file being loaded

use std::sync::{Arc, Mutex, MutexGuard};

use mlua::prelude::*;
use tracing::debug;

use super::convert::{asset_ref, lua_build_fn, parse_command, parse_inputs, parse_requires};
use crate::asset::AssetOptions;
use crate::execute::cmd::Command;
use crate::project::{LinterOptions, Project, TesterOptions};

fn lock(project: &Mutex<Project>) -> LuaResult<MutexGuard<'_, Project>> {
  project
    .lock()
    .map_err(|_| LuaError::external("project state is poisoned"))
}

/// Read a required command field.
fn required_command(opts: &LuaTable, kind: &str, name: &str) -> LuaResult<Command> {
  match opts.get::<LuaValue>("command")? {
    LuaValue::Nil => Err(LuaError::external(format!(
      "{kind} '{name}' requires a 'command' field"
    ))),
    value => parse_command(value),
  }
}

/// Read an optional command field.
fn optional_command(opts: &LuaTable, field: &str) -> LuaResult<Option<Command>> {
  match opts.get::<LuaValue>(field)? {
    LuaValue::Nil => Ok(None),
    value => parse_command(value).map(Some),
  }
}

/// Register the `ub` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, project: Arc<Mutex<Project>>) -> LuaResult<()> {
  let ub = lua.create_table()?;

  let asset_project = Arc::clone(&project);
  let asset_fn = lua.create_function(move |lua, (name, opts): (String, LuaTable)| {
    let outfile: String = opts
      .get("outfile")
      .map_err(|_| LuaError::external(format!("asset '{name}' requires an 'outfile' field")))?;

    let mut options = AssetOptions::new(&outfile);
    for input in parse_inputs(opts.get("input")?)? {
      options = options.with_input(input);
    }
    if let Some(build) = opts.get::<Option<LuaFunction>>("build")? {
      options = options.with_build_fn(lua_build_fn(build));
    }
    if let Some(command) = optional_command(&opts, "command")? {
      options = options.with_command(command);
    }
    options = options.release_only(opts.get::<Option<bool>>("release_only")?.unwrap_or(false));

    debug!(asset = %name, "ub.asset");
    lock(&asset_project)?
      .asset(&name, options)
      .map_err(LuaError::external)?;

    asset_ref(lua, &name, &outfile)
  })?;
  ub.set("asset", asset_fn)?;

  let lint_project = Arc::clone(&project);
  let lint_fn = lua.create_function(move |_, (name, opts): (String, LuaTable)| {
    let mut options = LinterOptions::new(required_command(&opts, "linter", &name)?);
    if let Some(autofix) = optional_command(&opts, "autofix_command")? {
      options = options.with_autofix(autofix);
    }
    for asset in parse_requires(opts.get("requires")?)? {
      options = options.with_requires(asset);
    }

    lock(&lint_project)?.lint(name, options).map_err(LuaError::external)
  })?;
  ub.set("lint", lint_fn)?;

  let test_project = Arc::clone(&project);
  let test_fn = lua.create_function(move |_, (name, opts): (String, LuaTable)| {
    let mut options = TesterOptions::new(required_command(&opts, "tester", &name)?);
    for asset in parse_requires(opts.get("requires")?)? {
      options = options.with_requires(asset);
    }

    lock(&test_project)?.test(name, options).map_err(LuaError::external)
  })?;
  ub.set("test", test_fn)?;

  let release_fn = lua.create_function(move |_, opts: LuaTable| {
    let mut project = lock(&project)?;
    let mut release = project.release().clone();
    if let Some(bump) = optional_command(&opts, "bump")? {
      release.bump = bump;
    }
    if let Some(push) = optional_command(&opts, "push")? {
      release.push = push;
    }
    if let Some(publish) = optional_command(&opts, "publish")? {
      release.publish = publish;
    }
    project.set_release(release);
    Ok(())
  })?;
  ub.set("release", release_fn)?;

  lua.globals().set("ub", ub)?;

  Ok(())
}
