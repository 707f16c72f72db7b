// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging and tracing for flow runs.
//!
//! Every diagnostic emitted by the crate is a message struct implementing
//! `Display` and [`messages::StructuredLog`]. Call sites never format log text
//! themselves; they build a message and call `.log()`, or `.span()` to open a
//! span carrying the same fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - run lifecycle: start, completion, abort, deadlock
//! * `messages::node` - per-node submission, completion, failure and bypass
//! * `messages::validation` - flow file validation
//!
//! # Usage
//!
//! ```rust
//! use dagflow::observability::messages::node::NodeBypassed;
//! use dagflow::observability::messages::StructuredLog;
//!
//! let msg = NodeBypassed { node: "notify" };
//! msg.log();
//! assert_eq!(msg.to_string(), "Node 'notify' bypassed");
//! ```

pub mod messages;
