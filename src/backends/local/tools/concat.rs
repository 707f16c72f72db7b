// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::traits::Tool;

/// Concat tool - joins every input in parameter-name order.
///
/// Strings are used as-is, `null` (bypassed upstream) is skipped and any other value
/// is rendered as JSON.
pub struct ConcatTool;

impl ConcatTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConcatTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ConcatTool {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        let combined: String = inputs
            .values()
            .filter_map(|value| match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();

        Ok(Value::String(combined))
    }

    fn name(&self) -> &str {
        "concat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_concat_orders_by_parameter_name() {
        let inputs = NodeInputs::from([
            ("b".to_string(), json!(" world")),
            ("a".to_string(), json!("hello")),
            ("c".to_string(), json!(42)),
            ("d".to_string(), Value::Null),
        ]);

        assert_eq!(
            ConcatTool::new().invoke(inputs).await.unwrap(),
            json!("hello world42")
        );
    }
}
