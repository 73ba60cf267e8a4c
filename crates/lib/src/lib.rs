//! unibuild-lib: incremental build orchestration.
//!
//! This crate provides the core of unibuild:
//! - `Asset`: a named output produced from files and other assets
//! - `Project`: everything a configuration declares
//! - `Builder`: staleness checks, dependency staging and stage-wise execution
//! - `eval`: loading a project from a Lua configuration file

pub mod asset;
pub mod eval;
pub mod execute;
pub mod lua;
pub mod project;
pub mod util;
