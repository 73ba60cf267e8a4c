mod build;
mod check;
mod ci;
mod clean;
mod release;

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::debug;

use unibuild_lib::eval::{LoadedConfig, evaluate_config};
use unibuild_lib::execute::{Builder, ExecuteConfig};

pub use build::{BuildArgs, cmd_build};
pub use check::{cmd_lint, cmd_test};
pub use ci::cmd_ci;
pub use clean::cmd_clean;
pub use release::{cmd_bump, cmd_publish, cmd_release};

/// An evaluated configuration with a builder and runtime to drive it.
///
/// Field order matters: the builder holds Lua callbacks and is dropped before
/// the Lua state owned by the config.
pub struct Session {
  builder: Builder,
  runtime: Runtime,
  _config: LoadedConfig,
}

impl Session {
  pub fn open(config: &Path, execute: ExecuteConfig) -> Result<Self> {
    debug!(config = %config.display(), parallelism = execute.parallelism, "opening session");
    let loaded =
      evaluate_config(config).with_context(|| format!("Failed to evaluate config: {}", config.display()))?;
    let builder = Builder::new(loaded.project(), execute);
    let runtime = Runtime::new().context("Failed to create async runtime")?;

    Ok(Self {
      builder,
      runtime,
      _config: loaded,
    })
  }

  pub fn builder(&self) -> &Builder {
    &self.builder
  }

  pub fn block_on<F: Future>(&self, future: F) -> F::Output {
    self.runtime.block_on(future)
  }
}
