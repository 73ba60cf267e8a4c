//! Project configuration: the registration API external code uses to declare
//! assets, linters, testers and release commands.
//!
//! Registration performs no file or network I/O. Configuration errors are
//! raised at declaration time.

mod catalog;
mod checks;

pub use catalog::Catalog;
pub use checks::{Linter, LinterOptions, ReleaseCommands, Tester, TesterOptions};

use tracing::debug;

use crate::asset::{Asset, AssetOptions, ConfigError};

/// Everything a configuration declares.
#[derive(Debug, Default)]
pub struct Project {
  catalog: Catalog,
  linters: Vec<Linter>,
  testers: Vec<Tester>,
  release: ReleaseCommands,
}

impl Project {
  /// Create a project by running a registration callback against an empty one.
  ///
  /// # Example
  /// ```
  /// use unibuild_lib::asset::AssetOptions;
  /// use unibuild_lib::project::Project;
  ///
  /// let project = Project::configure(|p| {
  ///   p.asset("css", AssetOptions::new("dist/app.css").with_file("src/app.css"))?;
  ///   Ok(())
  /// })
  /// .unwrap();
  /// assert_eq!(project.catalog().len(), 1);
  /// ```
  pub fn configure<F>(callback: F) -> Result<Self, ConfigError>
  where
    F: FnOnce(&mut Project) -> Result<(), ConfigError>,
  {
    let mut project = Project::default();
    callback(&mut project)?;
    Ok(project)
  }

  /// Declare an asset. Returns its name for use as an input of later assets.
  pub fn asset(&mut self, name: impl Into<String>, options: AssetOptions) -> Result<String, ConfigError> {
    let asset = Asset::new(name, options)?;
    let name = asset.name().to_string();
    debug!(asset = %name, inputs = asset.inputs().len(), "registering asset");
    self.catalog.register(asset)?;
    Ok(name)
  }

  /// Declare a linter.
  pub fn lint(&mut self, name: impl Into<String>, options: LinterOptions) -> Result<(), ConfigError> {
    let linter = Linter::new(name, options);
    self.check_requirements(&linter.name, &linter.requires)?;
    debug!(linter = %linter.name, "registering linter");
    self.linters.push(linter);
    Ok(())
  }

  /// Declare a tester.
  pub fn test(&mut self, name: impl Into<String>, options: TesterOptions) -> Result<(), ConfigError> {
    let tester = Tester::new(name, options);
    self.check_requirements(&tester.name, &tester.requires)?;
    debug!(tester = %tester.name, "registering tester");
    self.testers.push(tester);
    Ok(())
  }

  /// Replace the release helper commands.
  pub fn set_release(&mut self, release: ReleaseCommands) {
    self.release = release;
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn linters(&self) -> &[Linter] {
    &self.linters
  }

  pub fn testers(&self) -> &[Tester] {
    &self.testers
  }

  pub fn release(&self) -> &ReleaseCommands {
    &self.release
  }

  fn check_requirements(&self, owner: &str, requires: &[String]) -> Result<(), ConfigError> {
    match requires.iter().find(|name| !self.catalog.contains(name)) {
      Some(missing) => Err(ConfigError::UnknownRequirement {
        owner: owner.to_string(),
        asset: missing.clone(),
      }),
      None => Ok(()),
    }
  }
}
