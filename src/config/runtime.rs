// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{FlowConfig, Node, ToolRegistry, Value};
use crate::engine::NodeScheduler;
use crate::errors::{ConfigError, ExecutionError};
use crate::traits::ExecutionContext;

/// Everything needed to run one flow: descriptors, tools, inputs and concurrency.
#[derive(Debug)]
pub struct FlowRuntime {
    pub nodes: Vec<Node>,
    pub tools: Arc<ToolRegistry>,
    pub inputs: BTreeMap<String, Value>,
    pub node_concurrency: usize,
}

impl FlowRuntime {
    /// Bind the runtime to an execution context, producing a scheduler for one run.
    pub fn into_scheduler(
        self,
        context: Box<dyn ExecutionContext>,
    ) -> Result<NodeScheduler, ExecutionError> {
        NodeScheduler::new(
            self.tools,
            self.inputs,
            self.nodes,
            self.node_concurrency,
            context,
        )
    }
}

/// Flow runtime builder - turns a loaded flow file into a [`FlowRuntime`].
///
/// ```
/// use std::collections::BTreeMap;
/// use dagflow::config::{FlowConfig, RuntimeBuilder};
///
/// let cfg: FlowConfig = serde_yaml::from_str(r#"
/// inputs: { x: 2 }
/// nodes:
///   - name: double
///     tool: multiply
///     inputs: { a: "${inputs.x}", b: 2 }
/// "#).unwrap();
///
/// let runtime = RuntimeBuilder::from_config(&cfg, BTreeMap::new()).unwrap();
/// assert_eq!(runtime.nodes.len(), 1);
/// assert_eq!(runtime.node_concurrency, 16);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a runtime from a flow file and caller-supplied input overrides.
    ///
    /// Caller values win over the flow's declared defaults.
    pub fn from_config(
        cfg: &FlowConfig,
        input_overrides: BTreeMap<String, Value>,
    ) -> Result<FlowRuntime, ConfigError> {
        let nodes = cfg.to_nodes()?;
        let tools = ToolRegistry::from_config(cfg)?;

        Ok(FlowRuntime {
            nodes,
            tools: Arc::new(tools),
            inputs: cfg.resolve_inputs(input_overrides),
            node_concurrency: cfg.executor_options.node_concurrency(),
        })
    }
}
