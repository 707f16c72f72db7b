// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message picks its own log level and attaches its fields as structured
//! `tracing` fields next to the human-readable text.

use std::fmt::Display;
use tracing::Span;

pub mod engine;
pub mod node;
pub mod validation;

/// A log message that knows its level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Open a span named after the message carrying its fields.
    fn span(&self, name: &str) -> Span;
}
