// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for flow validation.
//!
//! This module contains message types for logging events related to:
//! * Validation start and outcome
//! * Individual graph problems (cycles, dangling references, duplicates)

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;

/// Flow validation started.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ValidationStarted {
    pub node_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validating flow with {} nodes", self.node_count)
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::debug!(node_count = self.node_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            node_count = self.node_count,
        )
    }
}

/// A single problem found in the flow graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::errors::ValidationError;
/// use dagflow::observability::messages::validation::ValidationIssue;
///
/// let error = ValidationError::CyclicDependency {
///     cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
/// };
/// let msg = ValidationIssue { error: &error };
///
/// assert_eq!(msg.to_string(), "Invalid flow: Cyclic dependency detected: a -> b -> a");
/// ```
pub struct ValidationIssue<'a> {
    pub error: &'a ValidationError,
}

impl ValidationIssue<'_> {
    fn node(&self) -> &str {
        match self.error {
            ValidationError::CyclicDependency { cycle } => {
                cycle.first().map(String::as_str).unwrap_or_default()
            }
            ValidationError::UnresolvedDependency { node, .. }
            | ValidationError::DuplicateNodeName { node }
            | ValidationError::UndeclaredFlowInput { node, .. } => node.as_str(),
        }
    }
}

impl Display for ValidationIssue<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid flow: {}", self.error)
    }
}

impl StructuredLog for ValidationIssue<'_> {
    fn log(&self) {
        tracing::error!(node = self.node(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("validation_issue", span_name = name, node = self.node())
    }
}

/// Flow validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Flow validation failed with {} errors", self.error_count)
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "validation",
            span_name = name,
            error_count = self.error_count,
        )
    }
}
