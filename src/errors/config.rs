// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::ToolRegistryError;

/// Errors that can occur during flow graph validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected in the node graph
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// A node references another node that doesn't exist
    UnresolvedDependency {
        /// The node that has the unresolved dependency
        node: String,
        /// The dependency that couldn't be resolved
        missing_dependency: String,
    },
    /// Two nodes share a name
    DuplicateNodeName {
        /// The duplicate node name
        node: String,
    },
    /// A node references a flow input the flow does not declare
    UndeclaredFlowInput {
        /// The node holding the reference
        node: String,
        /// The flow input name that is not declared
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedDependency {
                node,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Node '{}' depends on '{}' which does not exist",
                    node, missing_dependency
                )
            }
            ValidationError::DuplicateNodeName { node } => {
                write!(f, "Duplicate node name: '{}'", node)
            }
            ValidationError::UndeclaredFlowInput { node, input } => {
                write!(
                    f,
                    "Node '{}' references flow input '{}' which is not declared",
                    node, input
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a flow file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported flow file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Node '{node}' input '{input}' has a malformed reference: {value}")]
    InvalidReference {
        node: String,
        input: String,
        value: String,
    },

    #[error("Tool binding failed: {0}")]
    Tools(#[from] ToolRegistryError),

    #[error("Flow validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
