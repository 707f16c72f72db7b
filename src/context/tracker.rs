// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Value;

/// A lifecycle event recorded by an execution context.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started,
    Invoked(String),
    Bypassed { node: String, output: Value },
    Ended,
}

/// Run-level event log shared by every copy of a context.
///
/// Internally synchronised; safe to record from any number of workers at once.
#[derive(Debug, Default)]
pub struct RunTracker {
    events: Mutex<Vec<RunEvent>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: RunEvent) {
        self.lock().push(event);
    }

    /// Snapshot of every event, in recording order.
    pub fn events(&self) -> Vec<RunEvent> {
        self.lock().clone()
    }

    /// Nodes whose tool was invoked, in invocation order.
    pub fn invoked_nodes(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                RunEvent::Invoked(node) => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn bypassed_nodes(&self) -> BTreeSet<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                RunEvent::Bypassed { node, .. } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    /// `start` calls not yet matched by an `end`.
    pub fn open_scopes(&self) -> isize {
        self.lock().iter().fold(0, |open, event| match event {
            RunEvent::Started => open + 1,
            RunEvent::Ended => open - 1,
            _ => open,
        })
    }

    // Poisoning only means a worker panicked mid-push; the log is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<RunEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
