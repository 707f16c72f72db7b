// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dag_manager;
pub mod scheduler;
pub mod scope;

pub use dag_manager::{DagManager, NodeState, RunOutputs};
pub use scheduler::{effective_concurrency, NodeScheduler, UnitOutcome};
pub use scope::{ContextScope, CurrentNodeGuard};
