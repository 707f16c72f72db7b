// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Subscriber setup for the `dagflow` binary.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::consts::LOG_ENV_VAR;

/// Initialize the global tracing subscriber.
///
/// The filter comes from `directive` if given, else from `DAGFLOW_LOG`, else
/// `info`. Accepts any `EnvFilter` directive, e.g. `dagflow::engine=debug`.
pub fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(d) => EnvFilter::try_new(d)?,
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Send logs to stderr; keep stdout free for run outputs.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
