// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::config::Node;

/// Forward adjacency of a flow: node name -> names of the nodes that depend on it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Build the graph from node descriptors.
    ///
    /// Every node gets an entry, even without dependents. References to nodes that
    /// are not in `nodes` are ignored; reference validation reports those.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.0.entry(node.name.clone()).or_default();
        }
        for node in nodes {
            for dependency in node.dependencies() {
                if let Some(dependents) = graph.0.get_mut(dependency) {
                    dependents.push(node.name.clone());
                }
            }
        }
        graph
    }

    /// Get dependents for a node
    pub fn get_dependents(&self, node: &str) -> Option<&Vec<String>> {
        self.0.get(node)
    }

    /// Get all node names in the graph, sorted for stable traversal
    pub fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(graph: HashMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}
