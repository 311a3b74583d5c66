use std::collections::BTreeMap;

use flowcheck::ParsedWorkflow;
use flowcheck::parse::types::*;
use serde_json::Value;

// =============================================================================
// Action builders
// =============================================================================

pub fn action(id: &str, action_type: &str, next: &[&str]) -> Action {
    Action {
        id: id.into(),
        action_type: action_type.into(),
        parameters: vec![],
        next_actions: next.iter().map(|s| s.to_string()).collect(),
    }
}

/// Add an inline parameter declaration to an action.
pub fn with_param(mut action: Action, name: &str, ty: &str, value: Value, required: bool) -> Action {
    action.parameters.push(ActionParameter {
        name: name.into(),
        param_type: ParamType::parse(ty),
        value,
        required,
    });
    action
}

pub fn workflow(actions: Vec<Action>) -> ParsedWorkflow {
    ParsedWorkflow::from_actions(actions).expect("workflow should have unique ids")
}

/// `a → b → c → ...` over ids `a0..aN`.
pub fn chain(len: usize) -> Vec<Action> {
    (0..len)
        .map(|i| {
            let next = if i + 1 < len { vec![format!("a{}", i + 1)] } else { vec![] };
            Action {
                id: format!("a{}", i),
                action_type: "noop".into(),
                parameters: vec![],
                next_actions: next,
            }
        })
        .collect()
}

// =============================================================================
// Metadata builders
// =============================================================================

pub fn field(name: &str, ty: &str, required: bool) -> FieldSpec {
    FieldSpec {
        name: name.into(),
        param_type: ParamType::parse(ty),
        required,
    }
}

pub fn metadata(gas: u64, inputs: Vec<FieldSpec>, outputs: Vec<FieldSpec>) -> ActionMetadata {
    ActionMetadata {
        inputs,
        outputs,
        gas_estimate: gas,
        supported_networks: vec![],
        required_capabilities: vec![],
    }
}

/// swap (amountIn → amountOut), transfer (recipient, amount), and a
/// mainnet-only stake action.
pub fn token_catalog() -> MetadataCatalog {
    let mut stake = metadata(80, vec![field("amount", "UFix64", true)], vec![]);
    stake.supported_networks = vec!["mainnet".into()];

    MetadataCatalog::from([
        (
            "swap".to_string(),
            metadata(
                120,
                vec![field("amountIn", "UFix64", true), field("tokenOut", "String", false)],
                vec![field("amountOut", "UFix64", false), field("pool", "Address", false)],
            ),
        ),
        (
            "transfer".to_string(),
            metadata(
                50,
                vec![field("recipient", "Address", true), field("amount", "UFix64", true)],
                vec![field("receipt", "String", false)],
            ),
        ),
        ("stake".to_string(), stake),
    ])
}

// =============================================================================
// Parameter values
// =============================================================================

/// `values(&[("swap-1", &[("amountIn", json!("1.0"))])])`
pub fn values(entries: &[(&str, &[(&str, Value)])]) -> ParameterValues {
    entries
        .iter()
        .map(|(action, params)| {
            let params: BTreeMap<String, Value> = params
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            (action.to_string(), params)
        })
        .collect()
}

/// Whether `order` respects every known `nextActions` edge.
pub fn is_topological(order: &[String], actions: &[Action]) -> bool {
    let position: BTreeMap<&str, usize> = order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
    actions.iter().all(|a| {
        a.next_actions.iter().all(|next| match (position.get(a.id.as_str()), position.get(next.as_str())) {
            (Some(from), Some(to)) => from < to,
            _ => true,
        })
    })
}
