// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::traits::Tool;

/// Echo tool - returns its `value` input, or every input as an object when there is no `value`
pub struct EchoTool;

impl EchoTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    async fn invoke(&self, mut inputs: NodeInputs) -> anyhow::Result<Value> {
        if let Some(value) = inputs.remove("value") {
            return Ok(value);
        }
        Ok(Value::Object(inputs.into_iter().collect()))
    }

    fn name(&self) -> &str {
        "echo"
    }
}
