// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concurrent node scheduler driving a [`DagManager`] to completion.
//!
//! # Execution model
//!
//! One coordinating future (the one awaiting [`NodeScheduler::execute`]) owns the
//! `DagManager` and is the only writer of node state. Workers are tokio tasks in a
//! `JoinSet`, gated by a `Semaphore` holding `effective_concurrency` permits. A
//! worker receives its node's already-resolved inputs, invokes the tool and hands
//! the value back; it never touches shared scheduler state.
//!
//! ```text
//!          ┌──────────────────────────────────────────────┐
//!          │ drain bypassable nodes (start/bypass/end)    │◄──────┐
//!          │ pop ready nodes -> resolve inputs -> spawn   │       │
//!          └──────────────────────┬───────────────────────┘       │
//!                                 │ nothing in flight + pending   │
//!                                 ├──────────────► Deadlock       │
//!                                 ▼                               │
//!          ┌──────────────────────────────────────────────┐       │
//!          │ first-completion wait, then drain every unit │       │
//!          │ that already finished                        │       │
//!          └──────────────────────┬───────────────────────┘       │
//!                  failure ◄──────┴──────► complete_nodes ────────┘
//!                     │
//!                     ▼
//!          cancel token, join every worker, return the first error
//! ```
//!
//! # Cancellation
//!
//! Cancellation is best effort. The token is checked while a worker waits for its
//! permit and once more right before the tool is invoked. A tool that is already
//! running is never interrupted: its result is discarded and a failure is only logged.
//!
//! # Ambient context
//!
//! The span current when `execute` is entered is captured once. The run gets a
//! `flow_run` child span, and every worker future is instrumented with a `node`
//! span under it, so log lines from any worker thread carry the run's context.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::config::consts::MAX_NODE_CONCURRENCY;
use crate::config::{Node, NodeInputs, Value};
use crate::engine::dag_manager::{DagManager, RunOutputs};
use crate::engine::scope::{ContextScope, CurrentNodeGuard};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{
    ConcurrencyClamped, DeadlockDetected, RunAborted, RunCompleted, RunStarted,
};
use crate::observability::messages::node::{
    NodeCancelled, NodeCompleted, NodeFailed, NodeFailureSuppressed, NodeSubmitted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExecutionContext, Tool, ToolResolver};

/// What a single worker hands back to the coordinator.
///
/// `Cancelled` is a notice, not an error: the unit never started because the run
/// was already being torn down.
#[derive(Debug)]
pub enum UnitOutcome {
    Completed(Value),
    Failed(anyhow::Error),
    Cancelled,
}

/// Clamp a requested concurrency to `1..=MAX_NODE_CONCURRENCY`.
pub fn effective_concurrency(requested: usize) -> usize {
    requested.min(MAX_NODE_CONCURRENCY).max(1)
}

/// Runs one DAG: bypass handling, bounded dispatch, first-completion harvesting,
/// and fail-fast teardown.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use dagflow::backends::local::ArithmeticTool;
/// use dagflow::config::{InputBinding, Node, ToolRegistry};
/// use dagflow::context::FlowExecutionContext;
/// use dagflow::engine::NodeScheduler;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let nodes = vec![
///     Node::new("a").with_input("x", InputBinding::flow_input("x")),
///     Node::new("b")
///         .with_input("a", InputBinding::node_output("a"))
///         .with_input("one", InputBinding::literal(1)),
/// ];
/// let tools = ToolRegistry::new()
///     .with_tool("a", Arc::new(ArithmeticTool::add()))
///     .with_tool("b", Arc::new(ArithmeticTool::add()));
/// let inputs = BTreeMap::from([("x".to_string(), json!(41))]);
///
/// let scheduler = NodeScheduler::new(
///     Arc::new(tools),
///     inputs,
///     nodes,
///     4,
///     Box::new(FlowExecutionContext::new("doc")),
/// )?;
/// let outputs = scheduler.execute().await?;
///
/// assert_eq!(outputs.completed["b"], json!(42));
/// assert!(outputs.bypassed.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct NodeScheduler {
    tools: Arc<dyn ToolResolver>,
    dag_manager: DagManager,
    node_concurrency: usize,
    context: Box<dyn ExecutionContext>,
}

/// Per-run worker bookkeeping, owned by the coordinator.
struct WorkerPool {
    workers: JoinSet<UnitOutcome>,
    in_flight: HashMap<Id, String>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    run_span: Span,
}

impl NodeScheduler {
    /// Prepare a run.
    ///
    /// `node_concurrency` is clamped to [`MAX_NODE_CONCURRENCY`]; a value of zero
    /// is treated as one. Fails on duplicate nodes and unknown references.
    pub fn new(
        tools: Arc<dyn ToolResolver>,
        inputs: BTreeMap<String, Value>,
        nodes: Vec<Node>,
        node_concurrency: usize,
        context: Box<dyn ExecutionContext>,
    ) -> Result<Self, ExecutionError> {
        let effective = effective_concurrency(node_concurrency);
        if effective != node_concurrency {
            ConcurrencyClamped {
                requested: node_concurrency,
                effective,
            }
            .log();
        }

        Ok(Self {
            tools,
            dag_manager: DagManager::new(nodes, inputs)?,
            node_concurrency: effective,
            context,
        })
    }

    /// Concurrency actually used for this run.
    pub fn effective_concurrency(&self) -> usize {
        self.node_concurrency
    }

    /// Drive the run to completion.
    ///
    /// Returns the outputs of nodes that ran and the names of nodes that were
    /// bypassed. On failure nothing partial is returned; the error names the node.
    pub async fn execute(mut self) -> Result<RunOutputs, ExecutionError> {
        let started = RunStarted {
            node_count: self.dag_manager.len(),
            node_concurrency: self.node_concurrency,
        };
        // Snapshot of the caller's context; every worker span hangs off it.
        let run_span = started.span("flow_run");

        let mut pool = WorkerPool {
            workers: JoinSet::new(),
            in_flight: HashMap::new(),
            semaphore: Arc::new(Semaphore::new(self.node_concurrency)),
            cancel: CancellationToken::new(),
            run_span: run_span.clone(),
        };

        async move {
            started.log();
            let start_time = Instant::now();

            match self.drive(&mut pool).await {
                Ok(()) => {
                    let outputs = self.dag_manager.into_results();
                    RunCompleted {
                        completed_count: outputs.completed.len(),
                        bypassed_count: outputs.bypassed.len(),
                        duration: start_time.elapsed(),
                    }
                    .log();
                    Ok(outputs)
                }
                Err(err) => {
                    Self::abort(pool, &err).await;
                    Err(err)
                }
            }
        }
        .instrument(run_span)
        .await
    }

    async fn drive(&mut self, pool: &mut WorkerPool) -> Result<(), ExecutionError> {
        self.execute_nodes(pool)?;

        while !self.dag_manager.completed() {
            if pool.in_flight.is_empty() {
                let pending = self.dag_manager.pending_nodes();
                DeadlockDetected { pending: &pending }.log();
                return Err(ExecutionError::Deadlock { pending });
            }

            let finished = self.wait_first_completed(pool).await?;
            self.dag_manager.complete_nodes(finished);
            self.execute_nodes(pool)?;
        }

        Ok(())
    }

    /// Drain bypassable nodes to a fixed point, then dispatch every ready node.
    fn execute_nodes(&mut self, pool: &mut WorkerPool) -> Result<(), ExecutionError> {
        loop {
            let nodes_to_bypass = self.dag_manager.pop_bypassable_nodes();
            if nodes_to_bypass.is_empty() {
                break;
            }
            self.bypass_nodes(&nodes_to_bypass);
        }

        for node in self.dag_manager.pop_ready_nodes() {
            self.submit_node(node, pool)?;
        }

        Ok(())
    }

    fn bypass_nodes(&self, nodes: &[Node]) {
        let _scope = ContextScope::enter(self.context.as_ref());
        for node in nodes {
            let output = self.dag_manager.get_bypassed_node_outputs(node);
            self.context.bypass_node(node, &output);
        }
    }

    fn submit_node(&mut self, node: Node, pool: &mut WorkerPool) -> Result<(), ExecutionError> {
        let inputs = self.dag_manager.get_node_valid_inputs(&node)?;
        let tool = self.tools.resolve(&node.name)?;

        let task = NodeTask {
            name: node.name.clone(),
            inputs,
            tool,
            context: self.context.copy(),
            semaphore: Arc::clone(&pool.semaphore),
            cancel: pool.cancel.clone(),
        };
        let span = tracing::info_span!(parent: &pool.run_span, "node", node = %node.name);

        let handle = pool.workers.spawn(task.run().instrument(span));
        pool.in_flight.insert(handle.id(), node.name.clone());
        self.dag_manager.mark_running(&node.name);

        NodeSubmitted {
            node: &node.name,
            in_flight: pool.in_flight.len(),
        }
        .log();
        Ok(())
    }

    /// Wait for at least one worker, then collect every other worker that has
    /// already finished. The first failure in the batch wins; later ones are logged.
    async fn wait_first_completed(
        &self,
        pool: &mut WorkerPool,
    ) -> Result<BTreeMap<String, Value>, ExecutionError> {
        let Some(first) = pool.workers.join_next_with_id().await else {
            return Err(ExecutionError::Deadlock {
                pending: self.dag_manager.pending_nodes(),
            });
        };

        let mut joined = vec![first];
        while let Some(next) = pool.workers.try_join_next_with_id() {
            joined.push(next);
        }

        let mut finished = BTreeMap::new();
        let mut failure: Option<ExecutionError> = None;

        for result in joined {
            let error = match Self::attribute(result, &mut pool.in_flight) {
                Ok((node, UnitOutcome::Completed(value))) => {
                    NodeCompleted { node: &node }.log();
                    finished.insert(node, value);
                    continue;
                }
                Ok((node, UnitOutcome::Failed(source))) => {
                    ExecutionError::NodeExecution { node, source }
                }
                Ok((node, UnitOutcome::Cancelled)) => {
                    NodeCancelled { node: &node }.log();
                    continue;
                }
                Err(err) => err,
            };

            match &failure {
                None => {
                    NodeFailed { error: &error }.log();
                    failure = Some(error);
                }
                Some(_) => NodeFailureSuppressed { error: &error }.log(),
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(finished),
        }
    }

    /// Map a joined task back to its node name.
    fn attribute(
        result: Result<(Id, UnitOutcome), JoinError>,
        in_flight: &mut HashMap<Id, String>,
    ) -> Result<(String, UnitOutcome), ExecutionError> {
        let (id, outcome) = match result {
            Ok(joined) => (joined.0, Ok(joined.1)),
            Err(join_err) => (join_err.id(), Err(join_err)),
        };
        let node = in_flight
            .remove(&id)
            .unwrap_or_else(|| format!("<unknown task {}>", id));

        match outcome {
            Ok(outcome) => Ok((node, outcome)),
            Err(join_err) => Err(ExecutionError::WorkerAborted {
                node,
                message: describe_join_error(join_err),
            }),
        }
    }

    /// Cancel units that have not started, then wait for every worker to settle.
    async fn abort(mut pool: WorkerPool, err: &ExecutionError) {
        let in_flight: Vec<String> = pool.in_flight.values().cloned().collect();
        RunAborted {
            error: err,
            in_flight: &in_flight,
        }
        .log();

        pool.cancel.cancel();

        while let Some(result) = pool.workers.join_next_with_id().await {
            match Self::attribute(result, &mut pool.in_flight) {
                Ok((node, UnitOutcome::Completed(_))) => {
                    tracing::debug!(node = %node, "discarding result of node that finished during abort");
                }
                Ok((node, UnitOutcome::Cancelled)) => NodeCancelled { node: &node }.log(),
                Ok((node, UnitOutcome::Failed(source))) => NodeFailureSuppressed {
                    error: &ExecutionError::NodeExecution { node, source },
                }
                .log(),
                Err(late) => NodeFailureSuppressed { error: &late }.log(),
            }
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_cancelled() {
        return "task was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "task panicked".to_string()),
        Err(err) => err.to_string(),
    }
}

/// One unit of work: a node bound to its tool, inputs and context copy.
struct NodeTask {
    name: String,
    inputs: NodeInputs,
    tool: Arc<dyn Tool>,
    context: Box<dyn ExecutionContext>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl NodeTask {
    async fn run(self) -> UnitOutcome {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return UnitOutcome::Cancelled,
            permit = Arc::clone(&self.semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return UnitOutcome::Cancelled,
            },
        };

        if self.cancel.is_cancelled() {
            return UnitOutcome::Cancelled;
        }

        let _scope = ContextScope::enter(self.context.as_ref());
        let result = {
            let _current = CurrentNodeGuard::set(self.context.as_ref(), &self.name);
            self.tool.invoke(self.inputs).await
        };

        match result {
            Ok(value) => UnitOutcome::Completed(value),
            Err(err) => UnitOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingTool, StubTool};
    use crate::config::ToolRegistry;
    use crate::context::FlowExecutionContext;

    #[test]
    fn test_effective_concurrency_clamps() {
        assert_eq!(effective_concurrency(0), 1);
        assert_eq!(effective_concurrency(4), 4);
        assert_eq!(effective_concurrency(MAX_NODE_CONCURRENCY), MAX_NODE_CONCURRENCY);
        assert_eq!(effective_concurrency(1_000), MAX_NODE_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_empty_graph_returns_empty_results() {
        let scheduler = NodeScheduler::new(
            Arc::new(ToolRegistry::new()),
            BTreeMap::new(),
            vec![],
            2,
            Box::new(FlowExecutionContext::new("empty")),
        )
        .unwrap();

        let outputs = scheduler.execute().await.unwrap();
        assert!(outputs.completed.is_empty());
        assert!(outputs.bypassed.is_empty());
    }

    #[tokio::test]
    async fn test_missing_tool_aborts_run() {
        let scheduler = NodeScheduler::new(
            Arc::new(ToolRegistry::new()),
            BTreeMap::new(),
            vec![Node::new("orphan")],
            2,
            Box::new(FlowExecutionContext::new("missing")),
        )
        .unwrap();

        let err = scheduler.execute().await.unwrap_err();
        assert!(matches!(err, ExecutionError::ToolNotFound(ref n) if n == "orphan"));
    }

    #[tokio::test]
    async fn test_requested_concurrency_is_clamped() {
        let scheduler = NodeScheduler::new(
            Arc::new(ToolRegistry::new()),
            BTreeMap::new(),
            vec![],
            64,
            Box::new(FlowExecutionContext::new("clamp")),
        )
        .unwrap();

        assert_eq!(scheduler.effective_concurrency(), MAX_NODE_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_cancelled_task_never_invokes_tool() {
        let stub = Arc::new(StubTool::new(Value::from(1)));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let task = NodeTask {
            name: "late".to_string(),
            inputs: NodeInputs::new(),
            tool: stub.clone(),
            context: Box::new(FlowExecutionContext::new("cancel")),
            semaphore: Arc::new(Semaphore::new(1)),
            cancel,
        };

        assert!(matches!(task.run().await, UnitOutcome::Cancelled));
        assert_eq!(stub.invocations(), 0);
    }

    #[tokio::test]
    async fn test_worker_failure_is_wrapped_with_node_name() {
        let tools = ToolRegistry::new().with_tool("bad", Arc::new(FailingTool::new("nope")));
        let scheduler = NodeScheduler::new(
            Arc::new(tools),
            BTreeMap::new(),
            vec![Node::new("bad")],
            1,
            Box::new(FlowExecutionContext::new("fail")),
        )
        .unwrap();

        let err = scheduler.execute().await.unwrap_err();
        assert_eq!(err.node(), Some("bad"));
        assert_eq!(err.to_string(), "Execution of node 'bad' failed: nope");
    }
}
