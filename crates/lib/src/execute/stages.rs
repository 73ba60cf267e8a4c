//! Topological leveling of assets into build stages.

use std::collections::HashSet;

use tracing::debug;

use crate::asset::Asset;

use super::types::BuildError;

/// Ordered groups of asset names.
///
/// Every asset appears in exactly one stage, and all of its requested asset
/// inputs appear in strictly earlier stages. Within a stage, assets keep the
/// order in which they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStages {
  stages: Vec<Vec<String>>,
}

impl BuildStages {
  /// Partition `assets` into stages.
  ///
  /// Asset inputs that are not in `assets` are treated as already built.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` with the assets that could never be placed.
  pub fn compute(assets: &[&Asset]) -> Result<Self, BuildError> {
    let requested: HashSet<&str> = assets.iter().map(|a| a.name()).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stages: Vec<Vec<String>> = Vec::new();

    while visited.len() < requested.len() {
      let mut current: Vec<&str> = Vec::new();

      for asset in assets {
        let name = asset.name();
        if visited.contains(name) || current.contains(&name) {
          continue;
        }

        let ready = asset
          .asset_inputs()
          .all(|dep| !requested.contains(dep) || (visited.contains(dep) && !current.contains(&dep)));

        if ready {
          current.push(name);
        }
      }

      if current.is_empty() {
        let mut remaining: Vec<String> = Vec::new();
        for asset in assets {
          if !visited.contains(asset.name()) && !remaining.iter().any(|r| r == asset.name()) {
            remaining.push(asset.name().to_string());
          }
        }
        return Err(BuildError::CycleDetected(remaining));
      }

      debug!(stage = stages.len(), assets = ?current, "placed stage");
      visited.extend(current.iter().copied());
      stages.push(current.into_iter().map(str::to_string).collect());
    }

    Ok(Self::dedup(stages))
  }

  /// Keep only the first occurrence of every asset and drop empty stages.
  fn dedup(stages: Vec<Vec<String>>) -> Self {
    let mut seen: HashSet<String> = HashSet::new();
    let stages = stages
      .into_iter()
      .map(|stage| stage.into_iter().filter(|name| seen.insert(name.clone())).collect::<Vec<_>>())
      .filter(|stage| !stage.is_empty())
      .collect();
    Self { stages }
  }

  pub fn stages(&self) -> &[Vec<String>] {
    &self.stages
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &[String]> {
    self.stages.iter().map(Vec::as_slice)
  }
}
