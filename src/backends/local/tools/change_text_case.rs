// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::anyhow;
use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::traits::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Upper,
    Lower,
}

/// Change Text Case tool - converts the `text` input to upper or lower case
pub struct ChangeTextCaseTool {
    case: TextCase,
}

impl ChangeTextCaseTool {
    pub fn new(case: TextCase) -> Self {
        Self { case }
    }

    pub fn upper() -> Self {
        Self::new(TextCase::Upper)
    }

    pub fn lower() -> Self {
        Self::new(TextCase::Lower)
    }
}

#[async_trait]
impl Tool for ChangeTextCaseTool {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        let text = inputs
            .get("text")
            .ok_or_else(|| anyhow!("missing required input 'text'"))?
            .as_str()
            .ok_or_else(|| anyhow!("input 'text' must be a string"))?;

        let result = match self.case {
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
        };

        Ok(Value::String(result))
    }

    fn name(&self) -> &str {
        match self.case {
            TextCase::Upper => "uppercase",
            TextCase::Lower => "lowercase",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_change_text_case() {
        let cases = vec![
            (ChangeTextCaseTool::upper(), "hello World", "HELLO WORLD"),
            (ChangeTextCaseTool::lower(), "HELLO World", "hello world"),
        ];

        for (tool, input, expected) in cases {
            let inputs = NodeInputs::from([("text".to_string(), json!(input))]);
            assert_eq!(tool.invoke(inputs).await.unwrap(), json!(expected));
        }
    }

    #[tokio::test]
    async fn test_missing_or_non_string_text() {
        let tool = ChangeTextCaseTool::upper();

        let err = tool.invoke(NodeInputs::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "missing required input 'text'");

        let inputs = NodeInputs::from([("text".to_string(), json!(3))]);
        let err = tool.invoke(inputs).await.unwrap_err();
        assert_eq!(err.to_string(), "input 'text' must be a string");
    }
}
