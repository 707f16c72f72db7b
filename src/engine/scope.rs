// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! RAII guards over the execution context lifecycle.
//!
//! `end()` and clearing the current node happen in `Drop`, so they run on every
//! exit path: normal return, `?` propagation and unwinding.

use crate::traits::ExecutionContext;

/// Calls `start()` on creation and `end()` when dropped.
pub struct ContextScope<'a> {
    context: &'a dyn ExecutionContext,
}

impl<'a> ContextScope<'a> {
    pub fn enter(context: &'a dyn ExecutionContext) -> Self {
        context.start();
        Self { context }
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        self.context.end();
    }
}

/// Names the node being invoked for as long as the guard lives.
pub struct CurrentNodeGuard<'a> {
    context: &'a dyn ExecutionContext,
}

impl<'a> CurrentNodeGuard<'a> {
    pub fn set(context: &'a dyn ExecutionContext, node: &str) -> Self {
        context.set_current_node(Some(node));
        Self { context }
    }
}

impl Drop for CurrentNodeGuard<'_> {
    fn drop(&mut self) {
        self.context.set_current_node(None);
    }
}
