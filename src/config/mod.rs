// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod loader;
mod node;
mod runtime;
mod tool_registry;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use dependency_graph::DependencyGraph;
pub use loader::{
    load_and_validate_flow, load_flow, ActivateConfig, ExecutorOptions, FlowConfig, NodeConfig,
};
pub use node::{select_path, ActivateCondition, InputBinding, Node, NodeInputs, Value};
pub use runtime::{FlowRuntime, RuntimeBuilder};
pub use tool_registry::ToolRegistry;
pub use validation::validate_flow;
