// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Node, Value};

/// Lifecycle hooks bracketing each unit of work in a run.
///
/// * `start` / `end` bracket one node execution or one bypass batch. The scheduler
///   guarantees `end` on every exit path.
/// * `bypass_node` records a skipped node, always inside a `start`/`end` bracket.
/// * `set_current_node` names the node whose tool is being invoked; it is cleared
///   with `None` once the invocation returns.
/// * `copy` yields an independent context for one worker. Copies may share
///   long-lived collaborators (trackers, caches) but never per-call state.
///
/// Methods take `&self`; implementations synchronise internally because copies are
/// used from several worker tasks at once.
pub trait ExecutionContext: Send + Sync {
    fn start(&self);

    fn end(&self);

    fn bypass_node(&self, node: &Node, output: &Value);

    fn set_current_node(&self, node: Option<&str>);

    fn current_node(&self) -> Option<String>;

    fn copy(&self) -> Box<dyn ExecutionContext>;
}
