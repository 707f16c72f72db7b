// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Node descriptors: identity, input bindings and activation conditions.
//!
//! A binding is either a literal value or a reference. References use the
//! `${...}` syntax found in flow files:
//!
//! ```text
//! ${inputs.question}          flow-level input "question"
//! ${retrieve.output}          whole output of node "retrieve"
//! ${retrieve.output.docs.0}   field "docs", element 0 of that output
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::consts::{FLOW_INPUTS_PREFIX, NODE_OUTPUT_SEGMENT};

/// Opaque value flowing between nodes.
pub type Value = serde_json::Value;

/// Resolved inputs handed to a tool, keyed by parameter name.
pub type NodeInputs = BTreeMap<String, Value>;

/// Where a node parameter gets its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputBinding {
    Literal(Value),
    FlowInput { name: String },
    NodeOutput { node: String, path: Vec<String> },
}

impl InputBinding {
    pub fn literal(value: impl Into<Value>) -> Self {
        InputBinding::Literal(value.into())
    }

    pub fn flow_input(name: impl Into<String>) -> Self {
        InputBinding::FlowInput { name: name.into() }
    }

    pub fn node_output(node: impl Into<String>) -> Self {
        InputBinding::NodeOutput {
            node: node.into(),
            path: Vec::new(),
        }
    }

    pub fn node_output_path(node: impl Into<String>, path: &[&str]) -> Self {
        InputBinding::NodeOutput {
            node: node.into(),
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Interpret a raw flow-file value.
    ///
    /// Strings of the form `${...}` must be well-formed references; everything
    /// else is a literal. Returns the offending text when a reference is malformed.
    pub fn parse(raw: Value) -> Result<Self, String> {
        let text = match &raw {
            Value::String(s) => s.trim(),
            _ => return Ok(InputBinding::Literal(raw)),
        };

        let inner = match text.strip_prefix("${").and_then(|t| t.strip_suffix('}')) {
            Some(inner) => inner.trim(),
            None => return Ok(InputBinding::Literal(raw)),
        };

        parse_reference(inner).ok_or_else(|| text.to_string())
    }

    /// Name of the node this binding depends on, if any.
    pub fn referenced_node(&self) -> Option<&str> {
        match self {
            InputBinding::NodeOutput { node, .. } => Some(node.as_str()),
            _ => None,
        }
    }
}

fn parse_reference(inner: &str) -> Option<InputBinding> {
    let parts: Vec<&str> = inner.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    match parts.as_slice() {
        [prefix, name] if *prefix == FLOW_INPUTS_PREFIX => Some(InputBinding::flow_input(*name)),
        [node, segment, path @ ..] if *segment == NODE_OUTPUT_SEGMENT => {
            Some(InputBinding::node_output_path(*node, path))
        }
        _ => None,
    }
}

impl fmt::Display for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputBinding::Literal(value) => write!(f, "{}", value),
            InputBinding::FlowInput { name } => write!(f, "${{{}.{}}}", FLOW_INPUTS_PREFIX, name),
            InputBinding::NodeOutput { node, path } => {
                write!(f, "${{{}.{}", node, NODE_OUTPUT_SEGMENT)?;
                for segment in path {
                    write!(f, ".{}", segment)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Select a nested value by object key or array index.
pub fn select_path<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// A node runs only when `when` resolves to `is`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivateCondition {
    pub when: InputBinding,
    pub is: Value,
}

impl ActivateCondition {
    pub fn new(when: InputBinding, is: impl Into<Value>) -> Self {
        Self { when, is: is.into() }
    }
}

/// A single unit of computation in the graph. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub inputs: BTreeMap<String, InputBinding>,
    pub activate: Option<ActivateCondition>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: BTreeMap::new(),
            activate: None,
        }
    }

    pub fn with_input(mut self, param: impl Into<String>, binding: InputBinding) -> Self {
        self.inputs.insert(param.into(), binding);
        self
    }

    pub fn with_activate(mut self, condition: ActivateCondition) -> Self {
        self.activate = Some(condition);
        self
    }

    /// Nodes referenced by input bindings.
    pub fn input_dependencies(&self) -> BTreeSet<&str> {
        self.inputs
            .values()
            .filter_map(InputBinding::referenced_node)
            .collect()
    }

    /// Nodes referenced by input bindings or by the activation condition.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        let mut deps = self.input_dependencies();
        if let Some(node) = self.activate.as_ref().and_then(|a| a.when.referenced_node()) {
            deps.insert(node);
        }
        deps
    }

    /// Every binding of this node, activation condition included.
    pub fn bindings(&self) -> impl Iterator<Item = &InputBinding> {
        self.inputs
            .values()
            .chain(self.activate.as_ref().map(|a| &a.when))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_flow_input_reference() {
        let binding = InputBinding::parse(json!("${inputs.question}")).unwrap();
        assert_eq!(binding, InputBinding::flow_input("question"));
        assert_eq!(binding.to_string(), "${inputs.question}");
    }

    #[test]
    fn parse_node_output_reference_with_path() {
        let binding = InputBinding::parse(json!(" ${retrieve.output.docs.0} ")).unwrap();
        assert_eq!(binding, InputBinding::node_output_path("retrieve", &["docs", "0"]));
        assert_eq!(binding.referenced_node(), Some("retrieve"));
        assert_eq!(binding.to_string(), "${retrieve.output.docs.0}");
    }

    #[test]
    fn non_reference_values_are_literals() {
        for raw in [json!(5), json!("plain text"), json!("$notref"), json!({"a": 1}), json!(null)] {
            assert_eq!(InputBinding::parse(raw.clone()).unwrap(), InputBinding::Literal(raw));
        }
    }

    #[test]
    fn malformed_references_are_rejected() {
        for raw in ["${}", "${inputs}", "${inputs.a.b}", "${node}", "${node.result}", "${node.output.}"] {
            assert_eq!(InputBinding::parse(json!(raw)), Err(raw.to_string()), "{}", raw);
        }
    }

    #[test]
    fn select_path_walks_objects_and_arrays() {
        let value = json!({"docs": [{"id": 7}], "n": 1});
        let path = vec!["docs".to_string(), "0".to_string(), "id".to_string()];
        assert_eq!(select_path(&value, &path), Some(&json!(7)));
        assert_eq!(select_path(&value, &[]), Some(&value));
        assert_eq!(select_path(&value, &["missing".to_string()]), None);
        assert_eq!(select_path(&value, &["n".to_string(), "x".to_string()]), None);
    }

    #[test]
    fn dependencies_include_activation_reference() {
        let node = Node::new("summarize")
            .with_input("text", InputBinding::node_output("fetch"))
            .with_input("style", InputBinding::literal("short"))
            .with_input("lang", InputBinding::flow_input("lang"))
            .with_activate(ActivateCondition::new(
                InputBinding::node_output_path("classify", &["label"]),
                "long",
            ));

        assert_eq!(node.input_dependencies(), BTreeSet::from(["fetch"]));
        assert_eq!(node.dependencies(), BTreeSet::from(["classify", "fetch"]));
        assert_eq!(node.bindings().count(), 4);
    }
}
