// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tool implementations.
//!
//! # Local Backend
//! In-process tools selected by name from a flow file's `tool` field:
//! - **Data**: `echo`
//! - **Arithmetic**: `add`, `multiply`
//! - **Text**: `concat`, `uppercase`, `lowercase`
//!
//! # Stub Backend (Test-Only)
//! Counting, failing and slow tools for scheduler tests. Not available in
//! production builds.
//!
//! ```rust
//! use dagflow::backends::local::LocalToolFactory;
//! use dagflow::config::NodeConfig;
//! use std::collections::BTreeMap;
//!
//! let config = NodeConfig {
//!     name: "shout".to_string(),
//!     tool: Some("uppercase".to_string()),
//!     inputs: BTreeMap::new(),
//!     activate: None,
//! };
//!
//! let tool = LocalToolFactory::create_tool(&config)?;
//! assert_eq!(tool.name(), "uppercase");
//! # Ok::<(), dagflow::errors::ToolRegistryError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
