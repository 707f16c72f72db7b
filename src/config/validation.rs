// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flow validation for graph integrity.
//!
//! Validation runs in three stages and accumulates every error it can find:
//!
//! 1. **Uniqueness**: node names are unique
//! 2. **References**: every `${node.output}` names an existing node and every
//!    `${inputs.name}` names a declared flow input
//! 3. **Cycle detection**: DFS over the forward dependency graph
//!
//! Cycle detection needs a structurally valid graph, so it only runs when the
//! first two stages pass.
//!
//! ```rust
//! use dagflow::config::{validate_flow, InputBinding, Node};
//! use std::collections::BTreeMap;
//!
//! let nodes = vec![
//!     Node::new("fetch").with_input("url", InputBinding::flow_input("url")),
//!     Node::new("parse").with_input("body", InputBinding::node_output("fetch")),
//! ];
//! let declared = BTreeMap::from([("url".to_string(), serde_json::json!("https://example.com"))]);
//!
//! assert!(validate_flow(&nodes, &declared).is_ok());
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::config::{DependencyGraph, InputBinding, Node, Value};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    ValidationFailed, ValidationIssue, ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// Validates node descriptors against each other and against the declared flow inputs.
///
/// # Returns
///
/// * `Ok(())` - The flow is acyclic and every reference resolves
/// * `Err(Vec<ValidationError>)` - Every problem found
pub fn validate_flow(
    nodes: &[Node],
    declared_inputs: &BTreeMap<String, Value>,
) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        node_count: nodes.len(),
    }
    .log();

    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_node_names(nodes) {
        errors.extend(duplicate_errors);
    }

    if let Err(reference_errors) = validate_references(nodes, declared_inputs) {
        errors.extend(reference_errors);
    }

    if errors.is_empty() {
        if let Err(cycle_errors) = validate_acyclic_graph(nodes) {
            errors.extend(cycle_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            ValidationIssue { error }.log();
        }
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_unique_node_names(nodes: &[Node]) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let errors: Vec<ValidationError> = nodes
        .iter()
        .filter(|node| !seen.insert(node.name.as_str()))
        .map(|node| ValidationError::DuplicateNodeName {
            node: node.name.clone(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_references(
    nodes: &[Node],
    declared_inputs: &BTreeMap<String, Value>,
) -> Result<(), Vec<ValidationError>> {
    let node_names: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    let mut errors = Vec::new();

    for node in nodes {
        for binding in node.bindings() {
            match binding {
                InputBinding::NodeOutput { node: dependency, .. }
                    if !node_names.contains(dependency.as_str()) =>
                {
                    errors.push(ValidationError::UnresolvedDependency {
                        node: node.name.clone(),
                        missing_dependency: dependency.clone(),
                    });
                }
                InputBinding::FlowInput { name } if !declared_inputs.contains_key(name) => {
                    errors.push(ValidationError::UndeclaredFlowInput {
                        node: node.name.clone(),
                        input: name.clone(),
                    });
                }
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Three-colour DFS over the forward graph (dependency -> dependents).
///
/// A back edge to a node still on the recursion stack is a cycle; the reported
/// path starts and ends at that node, e.g. `b -> c -> d -> b`.
fn validate_acyclic_graph(nodes: &[Node]) -> Result<(), Vec<ValidationError>> {
    let graph = DependencyGraph::from_nodes(nodes);

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for node in graph.sorted_keys() {
        if !visited.contains(node.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(node, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Err(vec![ValidationError::CyclicDependency { cycle }]);
            }
        }
    }

    Ok(())
}

fn dfs_cycle_detection(
    node: &str,
    graph: &DependencyGraph,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(dependents) = graph.get_dependents(node) {
        for dependent in dependents {
            if !visited.contains(dependent) {
                if let Some(cycle) = dfs_cycle_detection(dependent, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(dependent) {
                let cycle_start = path.iter().position(|x| x == dependent).unwrap_or(0);
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(dependent.clone());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}
