//! The asset arena.

use std::collections::HashMap;

use crate::asset::{Asset, Buildable, ConfigError, Input};

/// All declared assets, addressed by name, in registration order.
///
/// An asset may only reference assets that are already registered, so a
/// catalog filled through [`Catalog::register`] never contains a cycle.
#[derive(Debug, Default)]
pub struct Catalog {
  assets: Vec<Asset>,
  index: HashMap<String, usize>,
}

impl Catalog {
  /// Add an asset to the catalog.
  ///
  /// # Errors
  ///
  /// - `DuplicateAsset` if an asset with the same name exists.
  /// - `UnknownInput` if an asset input names an unregistered asset.
  pub fn register(&mut self, asset: Asset) -> Result<(), ConfigError> {
    if self.index.contains_key(asset.name()) {
      return Err(ConfigError::DuplicateAsset(asset.name().to_string()));
    }

    if let Some(unknown) = asset.asset_inputs().find(|input| !self.index.contains_key(*input)) {
      return Err(ConfigError::UnknownInput {
        owner: asset.name().to_string(),
        input: unknown.to_string(),
      });
    }

    self.index.insert(asset.name().to_string(), self.assets.len());
    self.assets.push(asset);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Asset> {
    self.index.get(name).map(|&idx| &self.assets[idx])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Iterate assets in registration order.
  pub fn iter(&self) -> impl Iterator<Item = &Asset> {
    self.assets.iter()
  }

  pub fn len(&self) -> usize {
    self.assets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  /// Resolve an input to its buildable view.
  ///
  /// Returns `None` only for asset inputs that are not in the catalog.
  pub fn resolve<'a>(&'a self, input: &'a Input) -> Option<Buildable<'a>> {
    match input {
      Input::File(file) => Some(Buildable::File(file)),
      Input::Asset(name) => self.get(name).map(Buildable::Asset),
    }
  }
}
