// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::consts::DEFAULT_NODE_CONCURRENCY;
use crate::config::{validate_flow, ActivateCondition, InputBinding, Node, Value};
use crate::errors::ConfigError;

/// Flow definition as written in a flow file.
///
/// A flow declares its inputs (with default values), executor options and the
/// nodes that make up the graph. Edges are implicit in the node input references.
///
/// # Example
/// ```yaml
/// executor_options:
///   node_concurrency: 4
/// inputs:
///   text: "hello"
///   loud: false
/// nodes:
///   - name: upper
///     tool: uppercase
///     inputs:
///       text: "${inputs.text}"
///   - name: shout
///     tool: concat
///     inputs:
///       a: "${upper.output}"
///       b: "!"
///     activate:
///       when: "${inputs.loud}"
///       is: true
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct FlowConfig {
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Executor-specific configuration options.
///
/// * `node_concurrency` - Requested number of concurrently running nodes. Values above
///   `MAX_NODE_CONCURRENCY` are clamped by the scheduler.
#[derive(Debug, Deserialize, Default)]
pub struct ExecutorOptions {
    pub node_concurrency: Option<usize>,
}

impl ExecutorOptions {
    /// Requested node concurrency, falling back to the built-in default.
    pub fn node_concurrency(&self) -> usize {
        self.node_concurrency.unwrap_or(DEFAULT_NODE_CONCURRENCY)
    }
}

/// Configuration for a single node in the flow.
///
/// # Example
/// ```yaml
/// name: "summarize"
/// tool: "concat"
/// inputs:
///   a: "${fetch.output.title}"
///   b: " (summary)"
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    pub name: String,
    pub tool: Option<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
    #[serde(default)]
    pub activate: Option<ActivateConfig>,
}

/// Activation condition as written in a flow file.
#[derive(Debug, Deserialize, Clone)]
pub struct ActivateConfig {
    pub when: Value,
    pub is: Value,
}

impl NodeConfig {
    /// Convert into a node descriptor, parsing `${...}` references.
    pub fn to_node(&self) -> Result<Node, ConfigError> {
        let invalid = |input: &str, value: String| ConfigError::InvalidReference {
            node: self.name.clone(),
            input: input.to_string(),
            value,
        };

        let mut node = Node::new(self.name.clone());
        for (param, raw) in &self.inputs {
            let binding = InputBinding::parse(raw.clone()).map_err(|v| invalid(param, v))?;
            node = node.with_input(param.clone(), binding);
        }

        if let Some(activate) = &self.activate {
            let when = InputBinding::parse(activate.when.clone())
                .map_err(|v| invalid("activate.when", v))?;
            node = node.with_activate(ActivateCondition::new(when, activate.is.clone()));
        }

        Ok(node)
    }
}

impl FlowConfig {
    /// Convert every node config into a node descriptor, in file order.
    pub fn to_nodes(&self) -> Result<Vec<Node>, ConfigError> {
        self.nodes.iter().map(NodeConfig::to_node).collect()
    }

    /// Declared flow inputs overlaid with caller-supplied values.
    pub fn resolve_inputs(&self, overrides: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
        let mut inputs = self.inputs.clone();
        inputs.extend(overrides);
        inputs
    }
}

/// Load a flow from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_flow<P: AsRef<Path>>(path: P) -> Result<FlowConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a flow and validate its graph.
///
/// Fails on malformed references, duplicate node names, references to unknown
/// nodes or undeclared flow inputs, and dependency cycles.
pub fn load_and_validate_flow<P: AsRef<Path>>(path: P) -> Result<FlowConfig, ConfigError> {
    let cfg = load_flow(path)?;
    let nodes = cfg.to_nodes()?;

    validate_flow(&nodes, &cfg.inputs).map_err(ConfigError::Validation)?;

    Ok(cfg)
}
