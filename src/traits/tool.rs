// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::errors::ExecutionError;

/// An invokable unit of work bound to a node.
///
/// Tools receive the node's resolved inputs and produce a single value. Errors are
/// carried as `anyhow::Error` and wrapped by the scheduler into
/// `ExecutionError::NodeExecution`. Retrying, if wanted, is the tool's own business.
#[async_trait]
pub trait Tool: Send + Sync {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value>;

    fn name(&self) -> &str;
}

/// Maps a node name to the tool that executes it.
///
/// Called from the coordinating task only, but implementations are shared through
/// `Arc` and must be `Send + Sync`.
pub trait ToolResolver: Send + Sync {
    fn resolve(&self, node: &str) -> Result<Arc<dyn Tool>, ExecutionError>;
}

/// Adapts a synchronous closure into a [`Tool`].
///
/// The closure runs on tokio's blocking pool, so a slow or blocking body does not
/// stall the coordinating task or other workers.
pub struct FnTool<F> {
    name: String,
    func: Arc<F>,
}

impl<F> FnTool<F>
where
    F: Fn(NodeInputs) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(NodeInputs) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        let func = Arc::clone(&self.func);
        tokio::task::spawn_blocking(move || func(inputs))
            .await
            .map_err(|e| anyhow!("tool '{}' did not finish: {}", self.name, e))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}
