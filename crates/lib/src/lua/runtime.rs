use std::path::Path;
use std::sync::{Arc, Mutex};

use mlua::prelude::*;

use crate::lua::globals;
use crate::project::Project;

/// Create a new Lua runtime with the `ub` global registered against `project`.
pub fn create_runtime(project: Arc<Mutex<Project>>) -> LuaResult<Lua> {
  let lua = Lua::new();
  let package_path = lua.globals().get::<LuaTable>("package")?.get::<String>("path")?;
  let new_package_path = format!("./lua/?.lua;./lua/?/init.lua;{}", package_path);
  lua
    .globals()
    .get::<LuaTable>("package")?
    .set("path", new_package_path)?;

  globals::register_globals(&lua, project)?;

  Ok(lua)
}

/// Load and execute a Lua file at the given path.
/// Sets `ub.dir` to the directory of the loaded file.
/// Returns the result of the file execution.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = path
    .canonicalize()
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let ub = lua.globals().get::<LuaTable>("ub")?;
  ub.set(
    "dir",
    canonical_path
      .parent()
      .unwrap_or(Path::new(""))
      .to_string_lossy()
      .to_string(),
  )?;

  lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .eval::<LuaValue>()
}
