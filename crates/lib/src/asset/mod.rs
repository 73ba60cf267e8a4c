//! The asset data model: files, assets and the buildable capability set.

mod buildable;
mod file;
mod types;

pub use buildable::{Buildable, RebuildCache};
pub use file::AssetFile;
pub use types::{Asset, AssetOptions, BuildAction, BuildFn, BuildOptions, ConfigError, Input};
