//! The capability set shared by plain files and assets.
//!
//! Anything that can appear as an asset input is a [`Buildable`]: it can be
//! checked for existence, asked for its modification time, compared against
//! other buildables, and asked whether it (transitively) needs a rebuild.
//! Dispatch happens on the variant tag, never on run-time type inspection.

use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

use super::file::AssetFile;
use super::types::{Asset, BuildOptions};
use crate::project::Catalog;

/// Memoized [`Asset::needs_rebuild`] results, keyed by asset name.
///
/// Shared dependencies are checked once per cache instead of once per path
/// that reaches them.
pub type RebuildCache<'a> = HashMap<&'a str, bool>;

/// A resolved asset input.
#[derive(Debug, Clone, Copy)]
pub enum Buildable<'a> {
  File(&'a AssetFile),
  Asset(&'a Asset),
}

impl<'a> Buildable<'a> {
  /// The file backing this buildable: the file itself, or the asset's output.
  pub fn file(&self) -> &'a AssetFile {
    match self {
      Buildable::File(file) => file,
      Buildable::Asset(asset) => asset.outfile(),
    }
  }

  pub fn path(&self) -> &'a Path {
    self.file().path()
  }

  pub fn exists(&self) -> bool {
    self.file().exists()
  }

  pub fn is_file(&self) -> bool {
    self.file().is_file()
  }

  pub fn modified_time(&self) -> SystemTime {
    self.file().modified_time()
  }

  pub fn newer_than(&self, other: &Buildable<'_>) -> bool {
    self.modified_time() > other.modified_time()
  }

  pub fn can_be_built(&self) -> bool {
    matches!(self, Buildable::Asset(_))
  }

  /// Whether anything in this buildable's closure is stale.
  ///
  /// Plain files never need a rebuild.
  pub fn needs_rebuild(&self, catalog: &'a Catalog) -> bool {
    self.needs_rebuild_cached(catalog, &mut RebuildCache::new())
  }

  pub fn needs_rebuild_cached(&self, catalog: &'a Catalog, cache: &mut RebuildCache<'a>) -> bool {
    match *self {
      Buildable::File(_) => false,
      Buildable::Asset(asset) => asset.needs_rebuild_cached(catalog, cache),
    }
  }

  pub async fn read(&self) -> std::io::Result<String> {
    self.file().read().await
  }
}

impl Asset {
  pub fn exists(&self) -> bool {
    self.outfile().exists()
  }

  pub fn modified_time(&self) -> SystemTime {
    self.outfile().modified_time()
  }

  /// True when any input was modified after this asset's output.
  pub fn input_changed(&self, catalog: &Catalog) -> bool {
    let output_time = self.modified_time();
    self
      .inputs()
      .iter()
      .filter_map(|input| catalog.resolve(input))
      .any(|input| input.modified_time() > output_time)
  }

  /// True iff the output is missing, any input is newer than the output, or
  /// any asset input itself needs a rebuild.
  pub fn needs_rebuild(&self, catalog: &Catalog) -> bool {
    self.needs_rebuild_cached(catalog, &mut RebuildCache::new())
  }

  /// [`Asset::needs_rebuild`] with results shared through `cache`.
  pub fn needs_rebuild_cached<'a>(&'a self, catalog: &'a Catalog, cache: &mut RebuildCache<'a>) -> bool {
    if let Some(&stale) = cache.get(self.name()) {
      return stale;
    }

    let stale = !self.exists() || {
      let output_time = self.modified_time();
      self
        .inputs()
        .iter()
        .filter_map(|input| catalog.resolve(input))
        .any(|input| input.modified_time() > output_time || input.needs_rebuild_cached(catalog, cache))
    };

    cache.insert(self.name(), stale);
    stale
  }

  /// Whether this asset should be rebuilt right now.
  ///
  /// Unlike [`Asset::needs_rebuild`] this does not look at transitive
  /// dependencies.
  pub fn needs_building(&self, catalog: &Catalog, options: &BuildOptions) -> bool {
    (!self.is_release_only() || options.release)
      && (options.force || !self.exists() || self.input_changed(catalog))
  }
}
