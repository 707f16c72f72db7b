// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // built-in tools
pub mod config;     // node descriptors, flow files, tool registry
pub mod context;    // execution context implementation
pub mod engine;     // dependency manager + scheduler
pub mod errors;     // error handling
pub mod logging;
pub mod observability;
pub mod traits;     // unified abstractions

pub use config::{ActivateCondition, InputBinding, Node, NodeInputs, Value};
pub use engine::{DagManager, NodeScheduler, RunOutputs};
pub use errors::ExecutionError;
