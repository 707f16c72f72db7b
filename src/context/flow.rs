// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::{Node, Value};
use crate::context::{RunEvent, RunTracker};
use crate::observability::messages::node::NodeBypassed;
use crate::observability::messages::StructuredLog;
use crate::traits::ExecutionContext;

/// Execution context for one flow run.
///
/// # Example
/// ```
/// use dagflow::context::FlowExecutionContext;
/// use dagflow::traits::ExecutionContext;
///
/// let ctx = FlowExecutionContext::new("run-1");
/// let worker = ctx.copy();
///
/// worker.set_current_node(Some("fetch"));
/// assert_eq!(worker.current_node().as_deref(), Some("fetch"));
/// assert_eq!(ctx.current_node(), None);
/// assert_eq!(ctx.tracker().invoked_nodes(), vec!["fetch".to_string()]);
/// ```
#[derive(Debug)]
pub struct FlowExecutionContext {
    run_id: Arc<str>,
    tracker: Arc<RunTracker>,
    current_node: Mutex<Option<String>>,
}

impl FlowExecutionContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self::with_tracker(run_id, Arc::new(RunTracker::new()))
    }

    pub fn with_tracker(run_id: impl Into<String>, tracker: Arc<RunTracker>) -> Self {
        Self {
            run_id: Arc::from(run_id.into()),
            tracker,
            current_node: Mutex::new(None),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn tracker(&self) -> &Arc<RunTracker> {
        &self.tracker
    }
}

impl ExecutionContext for FlowExecutionContext {
    fn start(&self) {
        tracing::trace!(run_id = %self.run_id, "context start");
        self.tracker.record(RunEvent::Started);
    }

    fn end(&self) {
        tracing::trace!(run_id = %self.run_id, "context end");
        self.tracker.record(RunEvent::Ended);
    }

    fn bypass_node(&self, node: &Node, output: &Value) {
        NodeBypassed { node: &node.name }.log();
        self.tracker.record(RunEvent::Bypassed {
            node: node.name.clone(),
            output: output.clone(),
        });
    }

    fn set_current_node(&self, node: Option<&str>) {
        if let Some(name) = node {
            self.tracker.record(RunEvent::Invoked(name.to_string()));
        }
        *self
            .current_node
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = node.map(str::to_string);
    }

    fn current_node(&self) -> Option<String> {
        self.current_node
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn copy(&self) -> Box<dyn ExecutionContext> {
        Box::new(Self {
            run_id: Arc::clone(&self.run_id),
            tracker: Arc::clone(&self.tracker),
            current_node: Mutex::new(None),
        })
    }
}
