// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod common;

use std::collections::BTreeMap;
use std::io::Write;

use dagflow::config::{load_and_validate_flow, RuntimeBuilder};
use dagflow::context::FlowExecutionContext;
use dagflow::errors::{ConfigError, ExecutionError};
use dagflow::RunOutputs;
use serde_json::json;

fn write_flow(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

async fn run_flow(
    path: &std::path::Path,
    overrides: BTreeMap<String, serde_json::Value>,
) -> Result<RunOutputs, ExecutionError> {
    let cfg = load_and_validate_flow(path).unwrap();
    let runtime = RuntimeBuilder::from_config(&cfg, overrides).unwrap();
    runtime
        .into_scheduler(Box::new(FlowExecutionContext::new("e2e")))?
        .execute()
        .await
}

#[tokio::test]
async fn test_diamond_flow_file() {
    common::init_tracing();

    let outputs = run_flow(
        std::path::Path::new("flows/arithmetic-diamond.toml"),
        BTreeMap::new(),
    )
    .await
    .unwrap();

    assert_eq!(outputs.completed["d"], json!(5));
}

#[tokio::test]
async fn test_failing_node_fails_the_run() {
    common::init_tracing();

    let file = write_flow(
        ".yaml",
        r#"
inputs:
  n: "one"
nodes:
  - name: parse
    tool: add
    inputs:
      a: "${inputs.n}"
  - name: report
    tool: echo
    inputs:
      value: "${parse.output}"
"#,
    );

    let err = run_flow(file.path(), BTreeMap::new()).await.unwrap_err();

    assert_eq!(err.node(), Some("parse"));
    assert!(err.to_string().contains("is not a number"));
}

#[tokio::test]
async fn test_missing_field_in_upstream_output() {
    common::init_tracing();

    let file = write_flow(
        ".yaml",
        r#"
nodes:
  - name: source
    tool: echo
    inputs:
      label: x
  - name: reader
    tool: echo
    inputs:
      value: "${source.output.missing}"
"#,
    );

    let err = run_flow(file.path(), BTreeMap::new()).await.unwrap_err();

    assert!(matches!(
        err,
        ExecutionError::ReferencePathNotFound { ref node, .. } if node == "reader"
    ));
}

#[test]
fn test_unknown_tool_kind_is_a_config_error() {
    let file = write_flow(
        ".yaml",
        r#"
nodes:
  - name: mystery
    tool: teleport
"#,
    );

    let cfg = load_and_validate_flow(file.path()).unwrap();
    let err = RuntimeBuilder::from_config(&cfg, BTreeMap::new()).unwrap_err();

    assert!(matches!(err, ConfigError::Tools(_)));
}

#[test]
fn test_undeclared_flow_input_fails_validation() {
    let file = write_flow(
        ".yaml",
        r#"
nodes:
  - name: greet
    tool: echo
    inputs:
      value: "${inputs.who}"
"#,
    );

    let err = load_and_validate_flow(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("flow input 'who'"));
}
