// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use dagflow::config::{NodeInputs, Value};
use dagflow::traits::Tool;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs are captured per test and only shown for failures unless run with
/// `-- --nocapture`. Enable levels with e.g. `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    Finish,
}

/// Tool that logs when each node starts and finishes and tracks peak concurrency.
///
/// The node name is read from the `node` input.
pub struct RecordingTool {
    delay: Duration,
    log: Mutex<Vec<(String, Edge)>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingTool {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            log: Mutex::new(Vec::new()),
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<(String, Edge)> {
        self.log.lock().unwrap().clone()
    }

    /// Position of each node's start and finish in the log.
    pub fn positions(&self) -> HashMap<String, (usize, usize)> {
        let mut positions: HashMap<String, (usize, usize)> = HashMap::new();
        for (i, (node, edge)) in self.log().into_iter().enumerate() {
            let entry = positions.entry(node).or_insert((usize::MAX, usize::MAX));
            match edge {
                Edge::Start => entry.0 = i,
                Edge::Finish => entry.1 = i,
            }
        }
        positions
    }
}

#[async_trait]
impl Tool for RecordingTool {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        let node = inputs
            .get("node")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();

        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.log.lock().unwrap().push((node.clone(), Edge::Start));

        tokio::time::sleep(self.delay).await;

        self.log.lock().unwrap().push((node.clone(), Edge::Finish));
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(Value::String(node))
    }

    fn name(&self) -> &str {
        "recording"
    }
}
