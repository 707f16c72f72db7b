// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the run lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Aborting a run after a failure
//! * Deadlock detection
//! * Concurrency configuration

use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::Span;

use crate::errors::ExecutionError;
use crate::observability::messages::StructuredLog;

/// Run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagflow::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     node_count: 5,
///     node_concurrency: 4,
/// };
///
/// assert_eq!(msg.to_string(), "Starting flow run: 5 nodes, node_concurrency=4");
/// ```
pub struct RunStarted {
    pub node_count: usize,
    pub node_concurrency: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting flow run: {} nodes, node_concurrency={}",
            self.node_count, self.node_concurrency
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            node_concurrency = self.node_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "flow_run",
            span_name = name,
            node_count = self.node_count,
            node_concurrency = self.node_concurrency,
        )
    }
}

/// Run completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub completed_count: usize,
    pub bypassed_count: usize,
    pub duration: Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow run completed: {} nodes ran, {} bypassed in {:?}",
            self.completed_count, self.bypassed_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            completed_count = self.completed_count,
            bypassed_count = self.bypassed_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "flow_run_completed",
            span_name = name,
            completed_count = self.completed_count,
            bypassed_count = self.bypassed_count,
        )
    }
}

/// Run aborted; outstanding workers are being cancelled and joined.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunAborted<'a> {
    pub error: &'a ExecutionError,
    pub in_flight: &'a [String],
}

impl Display for RunAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow run aborted: {} ({} nodes still in flight)",
            self.error,
            self.in_flight.len()
        )
    }
}

impl StructuredLog for RunAborted<'_> {
    fn log(&self) {
        tracing::error!(
            error = %self.error,
            in_flight = ?self.in_flight,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "flow_run_aborted",
            span_name = name,
            error = %self.error,
            in_flight_count = self.in_flight.len(),
        )
    }
}

/// Nodes remain pending but nothing is running.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::observability::messages::engine::DeadlockDetected;
///
/// let pending = vec!["a".to_string(), "b".to_string()];
/// let msg = DeadlockDetected { pending: &pending };
///
/// assert_eq!(msg.to_string(), "Deadlock detected: no nodes running, pending: a, b");
/// ```
pub struct DeadlockDetected<'a> {
    pub pending: &'a [String],
}

impl Display for DeadlockDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deadlock detected: no nodes running, pending: {}",
            self.pending.join(", ")
        )
    }
}

impl StructuredLog for DeadlockDetected<'_> {
    fn log(&self) {
        tracing::error!(
            pending = ?self.pending,
            pending_count = self.pending.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "deadlock",
            span_name = name,
            pending_count = self.pending.len(),
        )
    }
}

/// Requested concurrency was out of range and has been adjusted.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct ConcurrencyClamped {
    pub requested: usize,
    pub effective: usize,
}

impl Display for ConcurrencyClamped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Requested node_concurrency={} adjusted to {}",
            self.requested, self.effective
        )
    }
}

impl StructuredLog for ConcurrencyClamped {
    fn log(&self) {
        tracing::warn!(
            requested = self.requested,
            effective = self.effective,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "concurrency_clamped",
            span_name = name,
            requested = self.requested,
            effective = self.effective,
        )
    }
}
