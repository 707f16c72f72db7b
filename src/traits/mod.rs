// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod context;
pub mod tool;

pub use context::ExecutionContext;
pub use tool::{FnTool, Tool, ToolResolver};
