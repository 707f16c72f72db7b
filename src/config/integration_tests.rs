// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::collections::{BTreeMap, BTreeSet};

    use serde_json::json;

    use crate::config::{load_and_validate_flow, InputBinding, RuntimeBuilder};
    use crate::context::FlowExecutionContext;

    /// Test that the YAML demo flow loads and converts into node descriptors
    #[test]
    fn test_text_pipeline_yaml_loading() {
        let cfg = load_and_validate_flow("flows/text-pipeline.yaml").unwrap();

        assert_eq!(cfg.executor_options.node_concurrency(), 4);
        assert_eq!(cfg.nodes.len(), 4);
        assert_eq!(cfg.inputs["loud"], json!(false));

        let nodes = cfg.to_nodes().unwrap();
        assert_eq!(nodes[2].name, "exclaim");
        assert!(nodes[2].activate.is_some());
        assert_eq!(
            nodes[3].dependencies(),
            BTreeSet::from(["exclaim", "lower"])
        );
    }

    /// Test that the TOML demo flow loads with the same semantics as YAML
    #[test]
    fn test_arithmetic_diamond_toml_loading() {
        let cfg = load_and_validate_flow("flows/arithmetic-diamond.toml").unwrap();

        assert_eq!(cfg.executor_options.node_concurrency(), 2);
        let nodes = cfg.to_nodes().unwrap();
        assert_eq!(nodes[0].inputs["x"], InputBinding::flow_input("seed"));
        assert_eq!(nodes[3].dependencies(), BTreeSet::from(["b", "c"]));
    }

    #[tokio::test]
    async fn test_text_pipeline_runs_quiet_by_default() {
        let cfg = load_and_validate_flow("flows/text-pipeline.yaml").unwrap();
        let runtime = RuntimeBuilder::from_config(&cfg, BTreeMap::new()).unwrap();

        let outputs = runtime
            .into_scheduler(Box::new(FlowExecutionContext::new("quiet")))
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(outputs.completed["upper"], json!("HELLO WORLD"));
        assert_eq!(outputs.completed["summary"], json!("hello world / "));
        assert_eq!(outputs.bypassed, BTreeSet::from(["exclaim".to_string()]));
    }

    #[tokio::test]
    async fn test_text_pipeline_input_override_activates_branch() {
        let cfg = load_and_validate_flow("flows/text-pipeline.yaml").unwrap();
        let overrides = BTreeMap::from([
            ("text".to_string(), json!("Mixed Case")),
            ("loud".to_string(), json!(true)),
        ]);
        let runtime = RuntimeBuilder::from_config(&cfg, overrides).unwrap();

        let outputs = runtime
            .into_scheduler(Box::new(FlowExecutionContext::new("loud")))
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(outputs.completed["exclaim"], json!("MIXED CASE!!!"));
        assert_eq!(
            outputs.completed["summary"],
            json!("mixed case / MIXED CASE!!!")
        );
        assert!(outputs.bypassed.is_empty());
    }

    #[tokio::test]
    async fn test_conditional_routing_takes_one_branch() {
        let cfg = load_and_validate_flow("flows/conditional-routing.yaml").unwrap();

        for (label, taken, skipped, audit) in [
            ("spam", "quarantine", "deliver", "WIN A PRIZE"),
            ("ham", "deliver", "quarantine", "win a prize"),
        ] {
            let overrides = BTreeMap::from([("label".to_string(), json!(label))]);
            let runtime = RuntimeBuilder::from_config(&cfg, overrides).unwrap();

            let outputs = runtime
                .into_scheduler(Box::new(FlowExecutionContext::new(label)))
                .unwrap()
                .execute()
                .await
                .unwrap();

            assert!(outputs.completed.contains_key(taken), "{}", label);
            assert_eq!(
                outputs.bypassed,
                BTreeSet::from([skipped.to_string()]),
                "{}",
                label
            );
            assert_eq!(outputs.completed["audit"], json!(audit), "{}", label);
        }
    }

    #[test]
    fn test_runtime_carries_flow_settings() {
        let cfg = load_and_validate_flow("flows/arithmetic-diamond.toml").unwrap();
        let runtime =
            RuntimeBuilder::from_config(&cfg, BTreeMap::from([("seed".to_string(), json!(7))]))
                .unwrap();

        assert_eq!(runtime.node_concurrency, 2);
        assert_eq!(runtime.inputs["seed"], json!(7));
        assert_eq!(runtime.tools.len(), 4);
    }
}
