// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for tool registry creation and tool instantiation.

use std::error::Error;
use std::fmt;

/// Errors that can occur while binding flow nodes to tools
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRegistryError {
    /// The node config does not name a tool
    MissingTool { node: String },

    /// The named tool is not one of the available implementations
    UnknownTool {
        node: String,
        tool: String,
        available: Vec<&'static str>,
    },
}

impl fmt::Display for ToolRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolRegistryError::MissingTool { node } => {
                write!(f, "Node '{}' does not declare a 'tool'", node)
            }
            ToolRegistryError::UnknownTool {
                node,
                tool,
                available,
            } => {
                write!(
                    f,
                    "Unknown tool '{}' for node '{}'. Available tools: {}",
                    tool,
                    node,
                    available.join(", ")
                )
            }
        }
    }
}

impl Error for ToolRegistryError {}
