//! Integration tests for the Data-Flow Validator.

#[allow(dead_code)]
mod helpers;

use flowcheck::error::ErrorDetail;
use flowcheck::params::ProcessOptions;
use flowcheck::validate::validate_workflow;
use flowcheck::{ErrorKind, load_workflow};
use helpers::*;
use serde_json::json;

#[test]
fn reference_chain_without_cycle_reports_none() {
    let wf = workflow(vec![
        action("swap-1", "swap", &[]),
        action("swap-2", "swap", &[]),
        action("transfer-1", "transfer", &[]),
    ]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("10.0"))]),
        ("swap-2", &[("amountIn", json!("swap-1.amountOut"))]),
        (
            "transfer-1",
            &[("recipient", json!("0x1234567890abcdef")), ("amount", json!("swap-2.amountOut"))],
        ),
    ]);

    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(result.is_valid, "{:?}", result.errors(&wf));
    assert!(result.data_flow.circular_dependencies.is_empty());
    assert_eq!(result.data_flow.resolved_references.len(), 2);
    assert!(result.data_flow.orphaned_actions.is_empty());
}

#[test]
fn reference_cycle_is_circular_dependency() {
    let wf = load_workflow(include_str!("fixtures/reference_cycle.json")).unwrap();
    assert!(wf.is_fully_ordered(), "no graph edges, so ordering is complete");

    let result = validate_workflow(&wf, &token_catalog(), &Default::default(), &ProcessOptions::default());
    assert!(!result.is_valid);

    let cycles = &result.data_flow.circular_dependencies;
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].cycle, vec!["a", "b"]);

    let errors = result.errors(&wf);
    let cycle_error = errors
        .iter()
        .find(|e| e.kind == ErrorKind::CircularDependency)
        .expect("cycle should be a blocking error");
    assert_eq!(
        cycle_error.detail,
        Some(ErrorDetail::Cycle {
            cycle: vec!["a".into(), "b".into()]
        })
    );
    insta::assert_snapshot!(cycle_error.to_string(), @"[CIRCULAR_DEPENDENCY] Circular dependency: a → b → a (action 'a')");
}

#[test]
fn graph_cycle_is_named_too() {
    let wf = workflow(vec![
        action("a", "swap", &["b"]),
        action("b", "swap", &["a"]),
    ]);
    let values = values(&[("a", &[("amountIn", json!("1.0"))]), ("b", &[("amountIn", json!("1.0"))])]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(result.data_flow.has_cycles());
    assert!(result.all_actions_valid());
}

#[test]
fn unresolved_references() {
    let wf = workflow(vec![action("swap-1", "swap", &["transfer-1"]), action("transfer-1", "transfer", &[])]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("ghost.amountOut"))]),
        ("transfer-1", &[("recipient", json!("swap-1.nothing")), ("amount", json!("1.0"))]),
    ]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());

    let unresolved = &result.data_flow.unresolved_references;
    assert_eq!(unresolved.len(), 2);
    assert_eq!(unresolved[0].reference, "ghost.amountOut");
    assert_eq!(unresolved[1].target_parameter, "recipient");
    assert!(
        result
            .errors(&wf)
            .iter()
            .all(|e| e.kind == ErrorKind::UnresolvedReference)
    );
}

#[test]
fn type_mismatch_carries_both_ends() {
    let wf = workflow(vec![action("swap-1", "swap", &["transfer-1"]), action("transfer-1", "transfer", &[])]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("2.0"))]),
        ("transfer-1", &[("recipient", json!("swap-1.amountOut")), ("amount", json!("1.0"))]),
    ]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());

    let mismatch = &result.data_flow.type_mismatches[0];
    assert_eq!(mismatch.source_action_id, "swap-1");
    assert_eq!(mismatch.source_output, "amountOut");
    assert_eq!(mismatch.target_action_id, "transfer-1");
    assert_eq!(mismatch.target_parameter, "recipient");
    assert!(!mismatch.can_convert);

    let errors = result.errors(&wf);
    let json = serde_json::to_value(&errors[0]).unwrap();
    insta::assert_json_snapshot!(json, @r#"
    {
      "actionId": "transfer-1",
      "detail": {
        "canConvert": false,
        "sourceActionId": "swap-1",
        "sourceOutput": "amountOut",
        "sourceType": "UFix64",
        "targetActionId": "transfer-1",
        "targetParameter": "recipient",
        "targetType": "Address",
        "type": "typeMismatch"
      },
      "kind": "TYPE_MISMATCH",
      "message": "Output 'swap-1.amountOut' is UFix64 but parameter 'recipient' expects Address",
      "parameter": "recipient"
    }
    "#);
}

#[test]
fn address_output_feeds_address_input() {
    let wf = workflow(vec![action("swap-1", "swap", &["transfer-1"]), action("transfer-1", "transfer", &[])]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("2.0"))]),
        ("transfer-1", &[("recipient", json!("swap-1.pool")), ("amount", json!("swap-1.amountOut"))]),
    ]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(result.is_valid, "{:?}", result.errors(&wf));
}

#[test]
fn orphans_are_warnings_only() {
    let wf = workflow(vec![
        action("swap-1", "swap", &["transfer-1"]),
        action("transfer-1", "transfer", &[]),
        action("lonely", "swap", &[]),
    ]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("2.0"))]),
        ("transfer-1", &[("recipient", json!("0x1234567890abcdef")), ("amount", json!("1.0"))]),
        ("lonely", &[("amountIn", json!("2.0"))]),
    ]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(result.is_valid);
    assert_eq!(result.data_flow.orphaned_actions, vec!["lonely"]);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].action_id.as_deref(), Some("lonely"));
}

#[test]
fn reference_counts_as_connection_for_orphans() {
    let wf = workflow(vec![action("swap-1", "swap", &[]), action("transfer-1", "transfer", &[])]);
    let values = values(&[
        ("swap-1", &[("amountIn", json!("2.0"))]),
        ("transfer-1", &[("recipient", json!("0x1234567890abcdef")), ("amount", json!("swap-1.amountOut"))]),
    ]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(result.data_flow.orphaned_actions.is_empty());
}

#[test]
fn network_mismatch_blocks_action() {
    let mut wf = workflow(vec![action("stake-1", "stake", &[])]);
    wf.network = Some("testnet".into());
    let values = values(&[("stake-1", &[("amount", json!("5.0"))])]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(!result.is_valid);
    assert!(result.parameters_configured());
    assert_eq!(result.errors(&wf)[0].kind, ErrorKind::IncompatibleNetwork);
}

#[test]
fn dangling_next_action_is_global_error() {
    let wf = workflow(vec![action("swap-1", "swap", &["missing"])]);
    let values = values(&[("swap-1", &[("amountIn", json!("2.0"))])]);
    let result = validate_workflow(&wf, &token_catalog(), &values, &ProcessOptions::default());
    assert!(!result.is_valid);
    assert_eq!(result.global_errors.len(), 1);
    assert_eq!(result.global_errors[0].kind, ErrorKind::UnresolvedReference);
}

#[test]
fn inline_values_are_used_when_no_override() {
    let wf = workflow(vec![with_param(
        action("swap-1", "swap", &[]),
        "amountIn",
        "UFix64",
        json!("3.5"),
        true,
    )]);
    let result = validate_workflow(&wf, &token_catalog(), &Default::default(), &ProcessOptions::default());
    assert!(result.is_valid);
    assert_eq!(result.action_results["swap-1"].processed_values["amountIn"], json!(3.5));

    let overridden = values(&[("swap-1", &[("amountIn", json!("-1"))])]);
    let result = validate_workflow(&wf, &token_catalog(), &overridden, &ProcessOptions::default());
    assert_eq!(result.errors(&wf)[0].kind, ErrorKind::OutOfRange);
}
