// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod tool_registry;

pub use config::{ConfigError, ValidationError};
pub use execution::ExecutionError;
pub use tool_registry::ToolRegistryError;
