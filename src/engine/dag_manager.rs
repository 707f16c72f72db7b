// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-run dependency bookkeeping for a DAG of nodes.
//!
//! The [`DagManager`] is the single source of truth for node state during one run.
//! It answers three questions for the scheduler:
//!
//! 1. Which pending nodes must be skipped? ([`DagManager::pop_bypassable_nodes`])
//! 2. Which pending nodes can run now? ([`DagManager::pop_ready_nodes`])
//! 3. What are a ready node's inputs? ([`DagManager::get_node_valid_inputs`])
//!
//! # Node state machine
//!
//! ```text
//!   Pending ──► Ready ──► Running ──► Completed
//!      │          │
//!      └──────────┴─────► Bypassed
//! ```
//!
//! `Completed` and `Bypassed` are terminal. A node is *ready* once every node it
//! references (inputs and activation condition) is terminal and it is not bypassable.
//!
//! # Bypass rules
//!
//! * **Activation condition**: once the node referenced by `when` is terminal, the
//!   node is bypassed if that node was bypassed or the resolved value differs from `is`.
//! * **Dependencies**: a node not already bypassed by its activation condition is
//!   bypassed when it has node-reference inputs and all of them point at bypassed
//!   nodes. A met activation condition does not exempt a node from this rule.
//!
//! Bypassing one node can make its dependents bypassable, so callers drain
//! `pop_bypassable_nodes` until it returns nothing before asking for ready nodes.
//! A node with some bypassed and some completed dependencies still runs and
//! receives [`BYPASSED_NODE_OUTPUT`] for each bypassed one.
//!
//! # Ownership
//!
//! The manager is owned by the coordinating task. Workers never see it; they get
//! resolved inputs and hand back values, which the coordinator folds in through
//! [`DagManager::complete_nodes`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::consts::BYPASSED_NODE_OUTPUT;
use crate::config::{select_path, InputBinding, Node, NodeInputs, Value};
use crate::errors::ExecutionError;

/// Lifecycle state of a node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Ready,
    Running,
    Completed,
    Bypassed,
}

impl NodeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeState::Completed | NodeState::Bypassed)
    }
}

/// Result of a successful run: outputs of nodes that ran, and the names of nodes that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutputs {
    pub completed: BTreeMap<String, Value>,
    pub bypassed: BTreeSet<String>,
}

impl RunOutputs {
    pub fn into_parts(self) -> (BTreeMap<String, Value>, BTreeSet<String>) {
        (self.completed, self.bypassed)
    }
}

/// Tracks node state, resolves bindings and exposes ready/bypassable batches.
#[derive(Debug)]
pub struct DagManager {
    nodes: Vec<Node>,
    states: HashMap<String, NodeState>,
    flow_inputs: BTreeMap<String, Value>,
    completed: BTreeMap<String, Value>,
    bypassed: BTreeSet<String>,
    terminal_count: usize,
}

impl DagManager {
    /// Build the per-run state for `nodes`.
    ///
    /// Fails on duplicate node names and on bindings that reference an unknown
    /// node or a flow input that was not supplied. Acyclicity is not checked; a
    /// cycle shows up as a scheduler deadlock.
    pub fn new(
        nodes: Vec<Node>,
        flow_inputs: BTreeMap<String, Value>,
    ) -> Result<Self, ExecutionError> {
        let mut states = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            if states.insert(node.name.clone(), NodeState::Pending).is_some() {
                return Err(ExecutionError::DuplicateNode(node.name.clone()));
            }
        }

        for node in &nodes {
            for binding in node.bindings() {
                let known = match binding {
                    InputBinding::Literal(_) => true,
                    InputBinding::FlowInput { name } => flow_inputs.contains_key(name),
                    InputBinding::NodeOutput { node: dep, .. } => states.contains_key(dep),
                };
                if !known {
                    return Err(ExecutionError::UnknownReference {
                        node: node.name.clone(),
                        reference: binding.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            nodes,
            states,
            flow_inputs,
            completed: BTreeMap::new(),
            bypassed: BTreeSet::new(),
            terminal_count: 0,
        })
    }

    /// Pending nodes that must be skipped, transitioned to `Bypassed`.
    ///
    /// From here on, dependents resolve the placeholder for each returned node.
    /// Returns an empty list when none qualify.
    pub fn pop_bypassable_nodes(&mut self) -> Vec<Node> {
        let bypassable: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| self.state_of(&node.name) == Some(NodeState::Pending))
            .filter(|node| self.is_node_bypassable(node))
            .cloned()
            .collect();

        for node in &bypassable {
            self.set_terminal(&node.name, NodeState::Bypassed);
            self.bypassed.insert(node.name.clone());
        }

        bypassable
    }

    /// Pending nodes whose dependencies are all terminal, transitioned to `Ready`.
    ///
    /// Moving them on to `Running` is up to the caller ([`DagManager::mark_running`]).
    /// No ordering is promised between the returned nodes.
    pub fn pop_ready_nodes(&mut self) -> Vec<Node> {
        let ready: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| self.state_of(&node.name) == Some(NodeState::Pending))
            .filter(|node| self.dependencies_terminal(node))
            .filter(|node| !self.is_node_bypassable(node))
            .cloned()
            .collect();

        for node in &ready {
            self.states.insert(node.name.clone(), NodeState::Ready);
        }

        ready
    }

    /// Record that a ready node has been handed to a worker.
    pub fn mark_running(&mut self, name: &str) {
        if let Some(state) = self.states.get_mut(name) {
            if *state == NodeState::Ready {
                *state = NodeState::Running;
            }
        }
    }

    /// Resolve every input binding of `node`.
    ///
    /// Fails with `UnresolvedReference` if a referenced node is not terminal yet,
    /// and with `ReferencePathNotFound` if a completed output lacks the requested field.
    pub fn get_node_valid_inputs(&self, node: &Node) -> Result<NodeInputs, ExecutionError> {
        node.inputs
            .iter()
            .map(|(param, binding)| {
                self.resolve_binding(&node.name, binding)
                    .map(|value| (param.clone(), value))
            })
            .collect()
    }

    /// Placeholder output recorded for a bypassed node.
    pub fn get_bypassed_node_outputs(&self, _node: &Node) -> Value {
        BYPASSED_NODE_OUTPUT
    }

    /// Mark each named node `Completed` and record its output.
    ///
    /// Entries for unknown or already terminal nodes are ignored.
    pub fn complete_nodes(&mut self, outputs: BTreeMap<String, Value>) {
        for (name, value) in outputs {
            match self.state_of(&name) {
                Some(state) if !state.is_terminal() => {
                    self.set_terminal(&name, NodeState::Completed);
                    self.completed.insert(name, value);
                }
                state => {
                    tracing::warn!(node = %name, ?state, "ignoring completion for node");
                }
            }
        }
    }

    /// True once every node is `Completed` or `Bypassed`.
    pub fn completed(&self) -> bool {
        self.terminal_count == self.nodes.len()
    }

    /// Outputs of nodes that ran. Bypassed nodes are not included.
    pub fn completed_nodes_outputs(&self) -> &BTreeMap<String, Value> {
        &self.completed
    }

    pub fn bypassed_nodes(&self) -> &BTreeSet<String> {
        &self.bypassed
    }

    /// Names of nodes that have not reached a terminal state, in declaration order.
    pub fn pending_nodes(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|node| !self.state_of(&node.name).is_some_and(NodeState::is_terminal))
            .map(|node| node.name.clone())
            .collect()
    }

    pub fn node_state(&self, name: &str) -> Option<NodeState> {
        self.state_of(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_results(self) -> RunOutputs {
        RunOutputs {
            completed: self.completed,
            bypassed: self.bypassed,
        }
    }

    fn state_of(&self, name: &str) -> Option<NodeState> {
        self.states.get(name).copied()
    }

    fn set_terminal(&mut self, name: &str, state: NodeState) {
        self.states.insert(name.to_string(), state);
        self.terminal_count += 1;
    }

    fn is_terminal(&self, name: &str) -> bool {
        self.state_of(name).is_some_and(NodeState::is_terminal)
    }

    fn is_bypassed(&self, name: &str) -> bool {
        self.state_of(name) == Some(NodeState::Bypassed)
    }

    fn dependencies_terminal(&self, node: &Node) -> bool {
        node.dependencies().into_iter().all(|dep| self.is_terminal(dep))
    }

    fn is_node_bypassable(&self, node: &Node) -> bool {
        if let Some(activate) = &node.activate {
            if let Some(dep) = activate.when.referenced_node() {
                if self.is_bypassed(dep) {
                    return true;
                }
                if !self.is_terminal(dep) {
                    return false;
                }
            }

            let met = match self.resolve_binding(&node.name, &activate.when) {
                Ok(value) => value == activate.is,
                Err(err) => {
                    tracing::warn!(node = %node.name, error = %err, "activation condition did not resolve, treating as not met");
                    false
                }
            };
            if !met {
                return true;
            }
        }

        let deps = node.input_dependencies();
        !deps.is_empty() && deps.into_iter().all(|dep| self.is_bypassed(dep))
    }

    fn resolve_binding(&self, node: &str, binding: &InputBinding) -> Result<Value, ExecutionError> {
        match binding {
            InputBinding::Literal(value) => Ok(value.clone()),
            InputBinding::FlowInput { name } => {
                self.flow_inputs
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ExecutionError::UnknownReference {
                        node: node.to_string(),
                        reference: binding.to_string(),
                    })
            }
            InputBinding::NodeOutput { node: dep, path } => match self.state_of(dep) {
                Some(NodeState::Completed) => self
                    .completed
                    .get(dep)
                    .and_then(|output| select_path(output, path))
                    .cloned()
                    .ok_or_else(|| ExecutionError::ReferencePathNotFound {
                        node: node.to_string(),
                        reference: binding.to_string(),
                    }),
                Some(NodeState::Bypassed) => Ok(BYPASSED_NODE_OUTPUT),
                Some(_) => Err(ExecutionError::UnresolvedReference {
                    node: node.to_string(),
                    reference: binding.to_string(),
                }),
                None => Err(ExecutionError::UnknownReference {
                    node: node.to_string(),
                    reference: binding.to_string(),
                }),
            },
        }
    }
}
