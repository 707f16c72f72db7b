// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-crate implementation of the execution context lifecycle.
//!
//! [`FlowExecutionContext`] is what the binary hands to the scheduler. Every copy
//! shares one [`RunTracker`] and the run id; the "current node" slot is per copy.

mod flow;
mod tracker;

pub use flow::FlowExecutionContext;
pub use tracker::{RunEvent, RunTracker};
