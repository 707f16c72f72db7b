// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::tools::*;
use crate::config::NodeConfig;
use crate::errors::ToolRegistryError;
use crate::traits::Tool;

/// Factory for creating local (in-process) tool instances
pub struct LocalToolFactory;

impl LocalToolFactory {
    /// Create a tool instance from a node configuration
    ///
    /// The `tool` field in the config determines which tool to create:
    /// - "echo" -> EchoTool
    /// - "add" -> ArithmeticTool (sum)
    /// - "multiply" -> ArithmeticTool (product)
    /// - "concat" -> ConcatTool
    /// - "uppercase" -> ChangeTextCaseTool (upper)
    /// - "lowercase" -> ChangeTextCaseTool (lower)
    pub fn create_tool(config: &NodeConfig) -> Result<Arc<dyn Tool>, ToolRegistryError> {
        let tool_name = config
            .tool
            .as_ref()
            .ok_or_else(|| ToolRegistryError::MissingTool {
                node: config.name.clone(),
            })?;

        match tool_name.as_str() {
            "echo" => Ok(Arc::new(EchoTool::new())),

            "add" => Ok(Arc::new(ArithmeticTool::add())),
            "multiply" => Ok(Arc::new(ArithmeticTool::multiply())),

            "concat" => Ok(Arc::new(ConcatTool::new())),
            "uppercase" => Ok(Arc::new(ChangeTextCaseTool::upper())),
            "lowercase" => Ok(Arc::new(ChangeTextCaseTool::lower())),

            _ => Err(ToolRegistryError::UnknownTool {
                node: config.name.clone(),
                tool: tool_name.clone(),
                available: Self::list_available_implementations(),
            }),
        }
    }

    /// List all available local tool implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["echo", "add", "multiply", "concat", "uppercase", "lowercase"]
    }
}
