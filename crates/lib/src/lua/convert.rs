//! Conversions between Lua values and project types.

use std::sync::Arc;

use mlua::prelude::*;

use crate::asset::{BuildFn, BuildOptions, Input};
use crate::execute::cmd::{Command, CommandSubject};

/// Metatable `__type` marker of the tables returned by `ub.asset`.
pub const ASSET_REF_TYPE: &str = "AssetRef";

impl IntoLua for BuildOptions {
  fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
    let table = lua.create_table()?;
    table.set("force", self.force)?;
    table.set("release", self.release)?;
    table.set("parallel", self.parallel)?;
    Ok(LuaValue::Table(table))
  }
}

impl IntoLua for CommandSubject {
  fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
    let table = lua.create_table()?;
    table.set("name", self.name)?;
    if let Some(outfile) = self.outfile {
      table.set("outfile", outfile.to_string_lossy().to_string())?;
    }
    table.set("requires", lua.create_sequence_from(self.requires)?)?;
    Ok(LuaValue::Table(table))
  }
}

/// Create the reference table returned to Lua for a registered asset.
pub fn asset_ref(lua: &Lua, name: &str, outfile: &str) -> LuaResult<LuaTable> {
  let ref_table = lua.create_table()?;
  ref_table.set("name", name)?;
  ref_table.set("outfile", outfile)?;

  let mt = lua.create_table()?;
  mt.set("__type", ASSET_REF_TYPE)?;
  ref_table.set_metatable(Some(mt))?;

  Ok(ref_table)
}

/// Returns true if the table carries the asset reference marker.
pub fn is_asset_ref(table: &LuaTable) -> bool {
  table
    .metatable()
    .and_then(|mt| mt.get::<Option<String>>("__type").ok().flatten())
    .is_some_and(|t| t == ASSET_REF_TYPE)
}

/// Parse an `input` field: a path, an asset reference, or a list of either.
pub fn parse_inputs(value: LuaValue) -> LuaResult<Vec<Input>> {
  match value {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(table) if !is_asset_ref(&table) => table
      .sequence_values::<LuaValue>()
      .map(|item| parse_input(item?))
      .collect(),
    other => Ok(vec![parse_input(other)?]),
  }
}

fn parse_input(value: LuaValue) -> LuaResult<Input> {
  match value {
    LuaValue::String(s) => Ok(Input::file(s.to_str()?.to_string())),
    LuaValue::Table(table) if is_asset_ref(&table) => Ok(Input::asset(table.get::<String>("name")?)),
    other => Err(LuaError::external(format!(
      "input must be a file path or an asset, got {}",
      other.type_name()
    ))),
  }
}

/// Parse a `requires` field: an asset name, an asset reference, or a list of either.
pub fn parse_requires(value: LuaValue) -> LuaResult<Vec<String>> {
  match value {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(table) if !is_asset_ref(&table) => table
      .sequence_values::<LuaValue>()
      .map(|item| parse_required(item?))
      .collect(),
    other => Ok(vec![parse_required(other)?]),
  }
}

fn parse_required(value: LuaValue) -> LuaResult<String> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.to_string()),
    LuaValue::Table(table) if is_asset_ref(&table) => table.get::<String>("name"),
    other => Err(LuaError::external(format!(
      "requires must name an asset, got {}",
      other.type_name()
    ))),
  }
}

/// Parse a command: a string, a list of strings, or a generator function.
pub fn parse_command(value: LuaValue) -> LuaResult<Command> {
  match value {
    LuaValue::Function(func) => Ok(Command::generator(move |subject| {
      let generated = func.call::<LuaValue>(subject.clone())?;
      Ok(literal_command(generated)?)
    })),
    other => literal_command(other),
  }
}

fn literal_command(value: LuaValue) -> LuaResult<Command> {
  match value {
    LuaValue::String(s) => Ok(Command::Literal(s.to_str()?.to_string())),
    LuaValue::Table(table) => Ok(Command::Sequence(
      table.sequence_values::<String>().collect::<LuaResult<Vec<_>>>()?,
    )),
    other => Err(LuaError::external(format!(
      "command must be a string or a list of strings, got {}",
      other.type_name()
    ))),
  }
}

/// Wrap a Lua function as a build function.
///
/// The function is called as `build(config, ...inputs)` and must return the
/// output contents.
pub fn lua_build_fn(func: LuaFunction) -> BuildFn {
  Arc::new(move |options: &BuildOptions, inputs: &[String]| {
    let args = LuaVariadic::from_iter(inputs.iter().cloned());
    let output = func.call::<String>((*options, args))?;
    Ok(output)
  })
}
