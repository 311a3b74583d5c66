//! Integration tests for the parse phase and the Graph Orderer.

#[allow(dead_code)]
mod helpers;

use flowcheck::parse::{self, ParamType, ParameterValue};
use flowcheck::{EngineError, load_workflow};
use helpers::*;

#[test]
fn parse_fixture_workflow() {
    let json = include_str!("fixtures/swap_and_send.json");
    let definition = parse::parse_workflow(json).expect("Should parse successfully");
    assert_eq!(definition.id, "swap-and-send");
    assert_eq!(definition.network.as_deref(), Some("testnet"));
    assert_eq!(definition.actions.len(), 2);
    assert_eq!(definition.actions[0].parameters[1].param_type, ParamType::UFix64);
}

#[test]
fn load_orders_by_graph_edges() {
    let wf = load_workflow(include_str!("fixtures/swap_and_send.json")).expect("Should load");
    assert_eq!(wf.execution_order, vec!["swap-1", "transfer-1"]);
    assert_eq!(wf.root_actions, vec!["swap-1"]);
    assert_eq!(wf.summary.action_count, 2);
    assert_eq!(wf.summary.connection_count, 1);
}

#[test]
fn parse_catalog_with_container_types() {
    let catalog = parse::parse_catalog(include_str!("fixtures/catalog.json")).expect("Should parse");
    let batch = &catalog["batch-send"];
    assert_eq!(batch.inputs[0].param_type, ParamType::Array(Some(Box::new(ParamType::Address))));
    assert_eq!(batch.inputs[1].param_type.to_string(), "{Address: UFix64}");
    assert!(!batch.supports_network("testnet"));
    assert!(catalog["transfer"].supports_network("anything"));
}

#[test]
fn inline_reference_is_detected() {
    let wf = load_workflow(include_str!("fixtures/swap_and_send.json")).unwrap();
    let amount = wf.action("transfer-1").unwrap().parameter("amount").unwrap();
    let parsed = ParameterValue::parse(&amount.value);
    let reference = parsed.as_reference().expect("Should be a reference");
    assert_eq!(reference.source_action_id, "swap-1");
    assert_eq!(reference.output_name, "amountOut");
}

#[test]
fn duplicate_ids_fail_to_load() {
    let json = r#"{"actions": [
        {"id": "a", "actionType": "swap"},
        {"id": "a", "actionType": "transfer"}
    ]}"#;
    let err = load_workflow(json).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateActionId(ref id) if id == "a"));
    assert_eq!(err.to_string(), "duplicate action id 'a'");
}

#[test]
fn invalid_json_returns_error() {
    let err = load_workflow("not valid json").unwrap_err();
    assert!(matches!(err, EngineError::Parse { what: "workflow", .. }));
}

#[test]
fn acyclic_graphs_get_a_full_topological_order() {
    let graphs = vec![
        chain(1),
        chain(6),
        vec![
            action("d", "noop", &[]),
            action("b", "noop", &["d"]),
            action("a", "noop", &["b", "c"]),
            action("c", "noop", &["d"]),
        ],
        vec![
            action("x", "noop", &[]),
            action("y", "noop", &["z"]),
            action("z", "noop", &[]),
        ],
    ];

    for actions in graphs {
        let wf = workflow(actions.clone());
        assert_eq!(wf.execution_order.len(), actions.len());
        assert!(is_topological(&wf.execution_order, &actions), "{:?}", wf.execution_order);
        assert!(wf.is_fully_ordered());
    }
}

#[test]
fn cyclic_graphs_get_a_short_order() {
    let graphs = vec![
        vec![action("a", "noop", &["a"])],
        vec![action("a", "noop", &["b"]), action("b", "noop", &["a"])],
        vec![
            action("start", "noop", &["a"]),
            action("a", "noop", &["b"]),
            action("b", "noop", &["c"]),
            action("c", "noop", &["a"]),
        ],
    ];

    for actions in graphs {
        let wf = workflow(actions.clone());
        assert!(wf.execution_order.len() < actions.len(), "{:?}", wf.execution_order);
        assert!(!wf.unordered_actions().is_empty());
    }
}

#[test]
fn roots_have_no_incoming_edges() {
    let wf = workflow(vec![
        action("a", "noop", &["c"]),
        action("b", "noop", &["c"]),
        action("c", "noop", &[]),
    ]);
    assert_eq!(wf.root_actions, vec!["a", "b"]);
}
