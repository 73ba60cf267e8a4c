//! Dependency graph over a set of assets.
//!
//! The graph is derived per build invocation from whichever assets were
//! selected. Edges run from an input asset to the assets that consume it.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::asset::Asset;

use super::types::BuildError;

/// A directed graph from asset inputs to their dependents.
pub struct DependencyGraph {
  /// The underlying graph, weighted by asset name.
  graph: DiGraph<String, ()>,

  /// Map from asset name to node index.
  nodes: HashMap<String, NodeIndex>,

  /// Assets without asset-typed inputs, in the order they were given.
  roots: Vec<String>,
}

impl DependencyGraph {
  /// Build the graph for `assets`.
  ///
  /// Asset inputs that are not part of `assets` still get a node, so their
  /// dependents can be looked up, but they are never roots.
  pub fn new(assets: &[&Asset]) -> Self {
    let mut dag = Self {
      graph: DiGraph::new(),
      nodes: HashMap::new(),
      roots: Vec::new(),
    };

    for asset in assets {
      let dependent = dag.node(asset.name());

      if !asset.has_asset_dependencies() && !dag.roots.iter().any(|r| r == asset.name()) {
        dag.roots.push(asset.name().to_string());
      }

      for input in asset.asset_inputs() {
        let dependency = dag.node(input);
        if !dag.graph.contains_edge(dependency, dependent) {
          dag.graph.add_edge(dependency, dependent, ());
        }
      }
    }

    dag
  }

  /// Obtain or create the node for `name`.
  fn node(&mut self, name: &str) -> NodeIndex {
    if let Some(&idx) = self.nodes.get(name) {
      return idx;
    }
    let idx = self.graph.add_node(name.to_string());
    self.nodes.insert(name.to_string(), idx);
    idx
  }

  /// Verify that the graph is acyclic.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` naming every asset that takes part in a cycle.
  pub fn verify_acyclic(&self) -> Result<(), BuildError> {
    if toposort(&self.graph, None).is_ok() {
      return Ok(());
    }

    let mut members: Vec<String> = tarjan_scc(&self.graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
      .flatten()
      .map(|idx| self.graph[idx].clone())
      .collect();
    members.sort();

    Err(BuildError::CycleDetected(members))
  }

  /// Assets with no asset-typed inputs.
  pub fn roots(&self) -> &[String] {
    &self.roots
  }

  /// Assets that list `name` as an input.
  pub fn dependents(&self, name: &str) -> Vec<&str> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut dependents: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Direction::Outgoing).collect();
    dependents.sort();
    dependents.into_iter().map(|dep| self.graph[dep].as_str()).collect()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }
}
