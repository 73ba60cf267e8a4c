//! Configuration file evaluation.
//!
//! This module provides the `evaluate_config` function which takes a path to a
//! Lua configuration file and returns the [`Project`] it declares.

use std::path::Path;
use std::sync::{Arc, Mutex};

use mlua::prelude::*;
use tracing::{debug, info};

use crate::lua::runtime;
use crate::project::Project;

/// Errors that can occur during config evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Lua evaluation error, including registration errors raised by `ub.*`.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The file evaluated, but not to `{ setup = function(ub) ... end }`.
  #[error("invalid config: {0}")]
  Invalid(String),
}

/// An evaluated configuration.
///
/// Build functions and command generators declared in Lua call back into the
/// Lua state owned here, so it must outlive every use of the project.
pub struct LoadedConfig {
  project: Arc<Project>,
  _lua: Lua,
}

impl LoadedConfig {
  pub fn project(&self) -> Arc<Project> {
    Arc::clone(&self.project)
  }
}

/// Evaluate a Lua configuration file.
///
/// The file must return a table with a `setup` function, which is called with
/// the `ub` table.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use unibuild_lib::eval::evaluate_config;
///
/// let config = evaluate_config(Path::new("unibuild.lua"))?;
/// println!("Assets: {}", config.project().catalog().len());
/// ```
pub fn evaluate_config(path: &Path) -> Result<LoadedConfig, EvalError> {
  info!(path = %path.display(), "evaluating config");

  let shared = Arc::new(Mutex::new(Project::default()));
  let lua = runtime::create_runtime(Arc::clone(&shared))?;
  let config = runtime::load_file(&lua, path)?;

  let LuaValue::Table(config_table) = config else {
    return Err(EvalError::Invalid(format!(
      "{} must return a table with a 'setup' function",
      path.display()
    )));
  };

  let setup: LuaFunction = config_table
    .get::<Option<LuaFunction>>("setup")?
    .ok_or_else(|| EvalError::Invalid(format!("{}: 'setup' must be a function", path.display())))?;

  let ub: LuaTable = lua.globals().get("ub")?;
  setup.call::<()>(ub)?;

  // The registration closures keep their handle on `shared` alive inside Lua.
  let project = {
    let mut guard = shared
      .lock()
      .map_err(|_| EvalError::Invalid("project state is poisoned".to_string()))?;
    std::mem::take(&mut *guard)
  };

  debug!(
    assets = project.catalog().len(),
    linters = project.linters().len(),
    testers = project.testers().len(),
    "config evaluated"
  );

  Ok(LoadedConfig {
    project: Arc::new(project),
    _lua: lua,
  })
}
