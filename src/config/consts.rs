// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Value;

/// Hard ceiling on concurrently running nodes, regardless of what a flow requests
pub const MAX_NODE_CONCURRENCY: usize = 16;
/// Node concurrency used when a flow file does not set one
pub const DEFAULT_NODE_CONCURRENCY: usize = 16;
/// Reference prefix for flow-level inputs: `${inputs.<name>}`
pub const FLOW_INPUTS_PREFIX: &str = "inputs";
/// Reference segment selecting a node's output: `${<node>.output}`
pub const NODE_OUTPUT_SEGMENT: &str = "output";
/// Environment variable consulted for the log filter
pub const LOG_ENV_VAR: &str = "DAGFLOW_LOG";

/// Output recorded for a bypassed node and handed to its dependents
pub const BYPASSED_NODE_OUTPUT: Value = Value::Null;
