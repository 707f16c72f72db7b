// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::traits::Tool;

/// A stub tool returning a fixed value and counting its invocations
pub struct StubTool {
    output: Value,
    invocations: AtomicUsize,
}

impl StubTool {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for StubTool {
    async fn invoke(&self, _inputs: NodeInputs) -> anyhow::Result<Value> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// A tool that always fails for testing failure scenarios
pub struct FailingTool {
    message: String,
    delay: Duration,
}

impl FailingTool {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            delay: Duration::ZERO,
        }
    }

    /// Fail only after sleeping for `delay`
    pub fn after(message: impl Into<String>, delay: Duration) -> Self {
        Self {
            message: message.into(),
            delay,
        }
    }
}

#[async_trait]
impl Tool for FailingTool {
    async fn invoke(&self, _inputs: NodeInputs) -> anyhow::Result<Value> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Err(anyhow!(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// A tool that sleeps, then returns its `value` input, counting concurrent invocations
pub struct SlowTool {
    delay: Duration,
    running: AtomicUsize,
    peak: AtomicUsize,
    invocations: AtomicUsize,
}

impl SlowTool {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Highest number of simultaneous invocations observed
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for SlowTool {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(inputs.get("value").cloned().unwrap_or(Value::Null))
    }

    fn name(&self) -> &str {
        "slow"
    }
}
