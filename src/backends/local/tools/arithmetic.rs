// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::bail;
use async_trait::async_trait;

use crate::config::{NodeInputs, Value};
use crate::traits::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Multiply,
}

/// Arithmetic tool - folds every numeric input with `+` or `*`.
///
/// `null` inputs (bypassed upstream nodes) are skipped. The result stays an integer
/// while every operand is an integer and no overflow occurs, otherwise it is a float.
pub struct ArithmeticTool {
    op: ArithmeticOp,
}

enum Operand {
    Int(i64),
    Float(f64),
}

impl ArithmeticTool {
    pub fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }

    pub fn add() -> Self {
        Self::new(ArithmeticOp::Add)
    }

    pub fn multiply() -> Self {
        Self::new(ArithmeticOp::Multiply)
    }

    fn apply_int(&self, a: i64, b: i64) -> Option<i64> {
        match self.op {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Multiply => a.checked_mul(b),
        }
    }

    fn apply_float(&self, a: f64, b: f64) -> f64 {
        match self.op {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Multiply => a * b,
        }
    }

    fn identity(&self) -> i64 {
        match self.op {
            ArithmeticOp::Add => 0,
            ArithmeticOp::Multiply => 1,
        }
    }
}

impl Operand {
    fn as_f64(&self) -> f64 {
        match self {
            Operand::Int(i) => *i as f64,
            Operand::Float(f) => *f,
        }
    }
}

fn operand(param: &str, value: &Value) -> anyhow::Result<Option<Operand>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(Operand::Int(i))),
            (None, Some(f)) => Ok(Some(Operand::Float(f))),
            (None, None) => bail!("input '{}' is not representable as a number", param),
        },
        other => bail!("input '{}' is not a number: {}", param, other),
    }
}

#[async_trait]
impl Tool for ArithmeticTool {
    async fn invoke(&self, inputs: NodeInputs) -> anyhow::Result<Value> {
        let mut acc = Operand::Int(self.identity());

        for (param, value) in &inputs {
            let Some(next) = operand(param, value)? else {
                continue;
            };
            acc = match (&acc, &next) {
                (Operand::Int(a), Operand::Int(b)) => match self.apply_int(*a, *b) {
                    Some(v) => Operand::Int(v),
                    None => Operand::Float(self.apply_float(*a as f64, *b as f64)),
                },
                _ => Operand::Float(self.apply_float(acc.as_f64(), next.as_f64())),
            };
        }

        Ok(match acc {
            Operand::Int(i) => Value::from(i),
            Operand::Float(f) => Value::from(f),
        })
    }

    fn name(&self) -> &str {
        match self.op {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Multiply => "multiply",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(pairs: &[(&str, Value)]) -> NodeInputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_arithmetic_table_driven() {
        let cases = vec![
            (ArithmeticTool::add(), inputs(&[("a", json!(1)), ("b", json!(2))]), json!(3)),
            (ArithmeticTool::add(), inputs(&[("a", json!(1.5)), ("b", json!(2))]), json!(3.5)),
            (ArithmeticTool::add(), inputs(&[]), json!(0)),
            (ArithmeticTool::add(), inputs(&[("a", json!(4)), ("b", Value::Null)]), json!(4)),
            (ArithmeticTool::multiply(), inputs(&[("a", json!(5)), ("b", json!(2))]), json!(10)),
            (ArithmeticTool::multiply(), inputs(&[]), json!(1)),
            (
                ArithmeticTool::multiply(),
                inputs(&[("a", json!(i64::MAX)), ("b", json!(2))]),
                json!(i64::MAX as f64 * 2.0),
            ),
        ];

        for (tool, input, expected) in cases {
            let name = tool.name().to_string();
            assert_eq!(tool.invoke(input).await.unwrap(), expected, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_non_numeric_input_fails() {
        let err = ArithmeticTool::add()
            .invoke(inputs(&[("a", json!("one"))]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "input 'a' is not a number: \"one\"");
    }
}
