// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

use dagflow::config::{load_and_validate_flow, RuntimeBuilder, Value};
use dagflow::context::FlowExecutionContext;
use dagflow::logging::init_logging;
use serde_json::json;

struct CliArgs {
    flow_file: String,
    inputs: BTreeMap<String, Value>,
    log: Option<String>,
}

/// Parse `name=value` pairs; values are read as JSON, falling back to a plain string.
fn parse_input(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    if name.is_empty() {
        return Err(format!("input name missing in '{}'", arg));
    }

    let value: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut flow_file = None;
    let mut inputs = BTreeMap::new();
    let mut log = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--log" {
            let directive = iter.next().ok_or("--log needs a filter directive")?;
            log = Some(directive.clone());
        } else if flow_file.is_none() {
            flow_file = Some(arg.clone());
        } else {
            let (name, value) = parse_input(arg)?;
            inputs.insert(name, value);
        }
    }

    Ok(CliArgs {
        flow_file: flow_file.ok_or("missing flow file")?,
        inputs,
        log,
    })
}

async fn run(cli: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let cfg = load_and_validate_flow(&cli.flow_file)?;
    let runtime = RuntimeBuilder::from_config(&cfg, cli.inputs)?;

    let run_id = format!("run-{}", std::process::id());
    let scheduler = runtime.into_scheduler(Box::new(FlowExecutionContext::new(run_id)))?;
    let outputs = scheduler.execute().await?;

    tracing::info!(elapsed = ?start_time.elapsed(), flow = %cli.flow_file, "flow finished");

    let (completed, bypassed) = outputs.into_parts();
    let report = json!({
        "outputs": completed,
        "bypassed": bypassed,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            let program = args.first().map(String::as_str).unwrap_or("dagflow");
            eprintln!("error: {}", msg);
            eprintln!(
                "Usage: {} [--log <filter>] <flow.yaml|flow.toml> [name=value ...]",
                program
            );
            eprintln!("Example: {} flows/text-pipeline.yaml text=\"hello world\"", program);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(cli.log.as_deref()) {
        eprintln!("error: {}", e);
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Flow failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
