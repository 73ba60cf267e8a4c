//! Lua runtime and evaluation.
//!
//! Project configuration is a Lua file returning `{ setup = function(ub) ... end }`.
//! The `ub` table exposes the registration API.
//!
//! # Submodules
//!
//! - [`convert`] - Conversions between Lua values and project types
//! - [`globals`] - The `ub` table (`ub.asset`, `ub.lint`, `ub.test`, `ub.release`)
//! - [`runtime`] - Low-level Lua VM management

pub mod convert;
pub mod globals;
pub mod runtime;
