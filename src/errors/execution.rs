// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while constructing or running a DAG.

use thiserror::Error;

/// Errors that can occur while preparing or executing a flow run.
///
/// Exactly one `ExecutionError` is returned per failed run. When several nodes fail
/// concurrently, the first failure observed by the coordinator is returned and the
/// rest are only logged.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Two node descriptors share the same name.
    #[error("Duplicate node name: '{0}'")]
    DuplicateNode(String),

    /// A binding points at a node or flow input that does not exist in this run.
    #[error("Node '{node}' references '{reference}' which does not exist")]
    UnknownReference { node: String, reference: String },

    /// A node's inputs were requested before the referenced node reached a terminal state.
    #[error("Node '{node}' requested '{reference}' before it was resolved")]
    UnresolvedReference { node: String, reference: String },

    /// The referenced node completed, but its output has no value at the requested path.
    #[error("Node '{node}' references '{reference}' but the upstream output has no such field")]
    ReferencePathNotFound { node: String, reference: String },

    /// The tool resolver has nothing registered for the node.
    #[error("No tool registered for node '{0}'")]
    ToolNotFound(String),

    /// Nothing is in flight, yet some nodes never reached a terminal state.
    #[error("No nodes are ready for execution, but the flow is not completed (pending: {})", .pending.join(", "))]
    Deadlock { pending: Vec<String> },

    /// The tool body for a node returned an error.
    #[error("Execution of node '{node}' failed: {source}")]
    NodeExecution {
        node: String,
        #[source]
        source: anyhow::Error,
    },

    /// The worker running a node panicked or was aborted by the runtime.
    #[error("Worker for node '{node}' terminated abnormally: {message}")]
    WorkerAborted { node: String, message: String },
}

impl ExecutionError {
    /// Name of the node this error is attributed to, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            ExecutionError::DuplicateNode(node) | ExecutionError::ToolNotFound(node) => Some(node),
            ExecutionError::UnknownReference { node, .. }
            | ExecutionError::UnresolvedReference { node, .. }
            | ExecutionError::ReferencePathNotFound { node, .. }
            | ExecutionError::NodeExecution { node, .. }
            | ExecutionError::WorkerAborted { node, .. } => Some(node),
            ExecutionError::Deadlock { .. } => None,
        }
    }
}
