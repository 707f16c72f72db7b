// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-node events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::errors::ExecutionError;
use crate::observability::messages::StructuredLog;

/// Node handed to a worker.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct NodeSubmitted<'a> {
    pub node: &'a str,
    pub in_flight: usize,
}

impl Display for NodeSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' submitted ({} in flight)",
            self.node, self.in_flight
        )
    }
}

impl StructuredLog for NodeSubmitted<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, in_flight = self.in_flight, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("node", span_name = name, node = self.node)
    }
}

/// Node finished and produced an output.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct NodeCompleted<'a> {
    pub node: &'a str,
}

impl Display for NodeCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' completed", self.node)
    }
}

impl StructuredLog for NodeCompleted<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("node", span_name = name, node = self.node)
    }
}

/// Node was cancelled before it started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeCancelled<'a> {
    pub node: &'a str,
}

impl Display for NodeCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' cancelled before start", self.node)
    }
}

impl StructuredLog for NodeCancelled<'_> {
    fn log(&self) {
        tracing::info!(node = self.node, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("node", span_name = name, node = self.node)
    }
}

/// The failure that ends the run.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::errors::ExecutionError;
/// use dagflow::observability::messages::node::NodeFailed;
///
/// let error = ExecutionError::NodeExecution {
///     node: "fetch".to_string(),
///     source: anyhow::anyhow!("timeout"),
/// };
/// let msg = NodeFailed { error: &error };
///
/// assert_eq!(
///     msg.to_string(),
///     "Node failed: Execution of node 'fetch' failed: timeout"
/// );
/// ```
pub struct NodeFailed<'a> {
    pub error: &'a ExecutionError,
}

impl Display for NodeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node failed: {}", self.error)
    }
}

impl StructuredLog for NodeFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.error.node().unwrap_or_default(),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "node",
            span_name = name,
            node = self.error.node().unwrap_or_default(),
        )
    }
}

/// A failure that lost the race to be reported.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct NodeFailureSuppressed<'a> {
    pub error: &'a ExecutionError,
}

impl Display for NodeFailureSuppressed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Additional failure not reported to caller: {}", self.error)
    }
}

impl StructuredLog for NodeFailureSuppressed<'_> {
    fn log(&self) {
        tracing::warn!(
            node = self.error.node().unwrap_or_default(),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "node",
            span_name = name,
            node = self.error.node().unwrap_or_default(),
        )
    }
}

/// Node skipped because its activation condition or its inputs say so.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeBypassed<'a> {
    pub node: &'a str,
}

impl Display for NodeBypassed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' bypassed", self.node)
    }
}

impl StructuredLog for NodeBypassed<'_> {
    fn log(&self) {
        tracing::info!(node = self.node, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("node", span_name = name, node = self.node)
    }
}
