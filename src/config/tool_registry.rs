// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::local::LocalToolFactory;
use crate::config::FlowConfig;
use crate::errors::{ExecutionError, ToolRegistryError};
use crate::traits::{Tool, ToolResolver};

/// Registry mapping node names to the tools that execute them.
///
/// The registry is the crate's [`ToolResolver`]: the scheduler asks it for a node's
/// tool right before dispatching the node. Tools are held as `Arc<dyn Tool>` so a
/// single instance can serve concurrent workers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use dagflow::backends::local::EchoTool;
/// use dagflow::config::ToolRegistry;
/// use dagflow::traits::ToolResolver;
///
/// let registry = ToolRegistry::new().with_tool("greet", Arc::new(EchoTool::new()));
///
/// assert!(registry.contains_key("greet"));
/// assert!(registry.resolve("greet").is_ok());
/// assert!(registry.resolve("missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ToolRegistry(pub HashMap<String, Arc<dyn Tool>>);

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Create a registry from a flow file, instantiating each node's built-in tool
    pub fn from_config(cfg: &FlowConfig) -> Result<Self, ToolRegistryError> {
        let mut registry = HashMap::new();

        for node in &cfg.nodes {
            let tool = LocalToolFactory::create_tool(node)?;
            registry.insert(node.name.clone(), tool);
        }

        Ok(Self(registry))
    }

    /// Insert a tool for a node
    pub fn insert(&mut self, node: impl Into<String>, tool: Arc<dyn Tool>) {
        self.0.insert(node.into(), tool);
    }

    /// Builder-style insert
    pub fn with_tool(mut self, node: impl Into<String>, tool: Arc<dyn Tool>) -> Self {
        self.insert(node, tool);
        self
    }

    /// Get the tool bound to a node
    pub fn get(&self, node: &str) -> Option<&Arc<dyn Tool>> {
        self.0.get(node)
    }

    pub fn contains_key(&self, node: &str) -> bool {
        self.0.contains_key(node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ToolResolver for ToolRegistry {
    fn resolve(&self, node: &str) -> Result<Arc<dyn Tool>, ExecutionError> {
        self.get(node)
            .cloned()
            .ok_or_else(|| ExecutionError::ToolNotFound(node.to_string()))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<&String> = self.0.keys().collect();
        nodes.sort();
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.0.len())
            .field("nodes", &nodes)
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn Tool>>> for ToolRegistry {
    fn from(map: HashMap<String, Arc<dyn Tool>>) -> Self {
        Self(map)
    }
}
