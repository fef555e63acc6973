// crates/rule-gate-core/tests/evaluator.rs
// ============================================================================
// Module: Request Evaluator Tests
// Description: End-to-end request validation over the in-memory store.
// Purpose: Ensure the evaluator wires coercion, rule loading, and aggregation.
// Dependencies: rule-gate-core, serde_json, time
// ============================================================================
//! ## Overview
//! Drives the full path: author an endpoint through the control surface,
//! then validate request bodies and inspect the aggregated results.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use rule_gate_core::EndpointControl;
use rule_gate_core::EndpointName;
use rule_gate_core::EvaluateError;
use rule_gate_core::MemorySchemaStore;
use rule_gate_core::PropertyName;
use rule_gate_core::PropertySpec;
use rule_gate_core::PropertyType;
use rule_gate_core::RequestEvaluator;
use rule_gate_core::RuleName;
use rule_gate_core::RuleRequest;
use rule_gate_core::RuleType;
use rule_gate_core::ValidationStatus;
use rule_gate_core::codes;
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const FIXED_NOW: OffsetDateTime = datetime!(2025-06-15 12:00:00 UTC);

fn rule(
    name: &str,
    rule_type: RuleType,
    value: serde_json::Value,
    error_message: &str,
) -> RuleRequest {
    RuleRequest {
        name: RuleName::new(name),
        rule_type,
        value,
        error_message: Some(error_message.to_owned()),
    }
}

fn body(entries: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    entries.iter().map(|(name, value)| ((*name).to_owned(), value.clone())).collect()
}

/// Builds a signup-style endpoint with string, numeric, and relative rules.
fn seeded_store() -> MemorySchemaStore {
    let store = MemorySchemaStore::new();
    let control = EndpointControl::new(store.clone());

    let properties = vec![
        PropertySpec {
            name: PropertyName::new("Username"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![
                rule("username-length", RuleType::Between, json!([3, 16]), "length {value1}..{value2}"),
                rule("username-slug", RuleType::Regex, json!("^[a-z0-9_]+$"), "lowercase only"),
            ],
        },
        PropertySpec {
            name: PropertyName::new("Password"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![rule("password-length", RuleType::MoreOrEqual, json!(8), "too short")],
        },
        PropertySpec {
            name: PropertyName::new("ConfirmPassword"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![rule(
                "passwords-match",
                RuleType::Equal,
                json!("{Password}"),
                "passwords differ",
            )],
        },
        PropertySpec {
            name: PropertyName::new("Age"),
            property_type: PropertyType::Int,
            is_optional: true,
            rules: vec![rule("adult", RuleType::MoreOrEqual, json!(18), "must be {value}+")],
        },
    ];

    control
        .create_endpoint(&EndpointName::new("signup"), &properties, FIXED_NOW)
        .unwrap();
    store
}

// ============================================================================
// SECTION: Evaluation Flow
// ============================================================================

/// A conforming body validates with per-rule accounting.
#[test]
fn success_counts_properties_and_rules() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let result = evaluator
        .evaluate(
            &EndpointName::new("signup"),
            &body(&[
                ("Username", json!("alice_01")),
                ("Password", json!("hunter2hunter2")),
                ("ConfirmPassword", json!("hunter2hunter2")),
                ("Age", json!(30)),
            ]),
            FIXED_NOW,
        )
        .unwrap();

    assert_eq!(result.status, ValidationStatus::Success);
    assert_eq!(result.processed_properties, 4);
    assert_eq!(result.applied_rules, 5);
    assert!(result.failures.is_empty());
}

/// Rule failures aggregate per property with the rule name as the code.
#[test]
fn failures_aggregate_per_property() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let result = evaluator
        .evaluate(
            &EndpointName::new("signup"),
            &body(&[
                ("Username", json!("Al")),
                ("Password", json!("hunter2hunter2")),
                ("ConfirmPassword", json!("different")),
            ]),
            FIXED_NOW,
        )
        .unwrap();

    assert_eq!(result.status, ValidationStatus::Failure);
    assert_eq!(result.processed_properties, 3);

    let username = result.failures.get("Username").unwrap();
    assert_eq!(username.len(), 2);
    assert_eq!(username[0].code, "username-length");
    assert_eq!(username[0].message, "length 3..16");

    let confirm = result.failures.get("ConfirmPassword").unwrap();
    assert_eq!(confirm[0].code, "passwords-match");
    assert_eq!(confirm[0].message, "passwords differ");
}

/// Optional properties are skipped when absent; their rules do not count.
#[test]
fn optional_absence_skips_rules() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let result = evaluator
        .evaluate(
            &EndpointName::new("signup"),
            &body(&[
                ("Username", json!("alice_01")),
                ("Password", json!("hunter2hunter2")),
                ("ConfirmPassword", json!("hunter2hunter2")),
            ]),
            FIXED_NOW,
        )
        .unwrap();

    assert_eq!(result.status, ValidationStatus::Success);
    assert_eq!(result.processed_properties, 3);
    assert_eq!(result.applied_rules, 4);
}

/// Coercion failures abort evaluation with structured details.
#[test]
fn coercion_failure_is_invalid_request() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let error = evaluator
        .evaluate(
            &EndpointName::new("signup"),
            &body(&[
                ("Username", json!("alice_01")),
                ("Password", json!("hunter2hunter2")),
                ("ConfirmPassword", json!("hunter2hunter2")),
                ("Age", json!("thirty")),
            ]),
            FIXED_NOW,
        )
        .unwrap_err();

    let EvaluateError::InvalidRequest(failures) = error else {
        panic!("expected an invalid-request error");
    };
    assert_eq!(failures.get("Age").unwrap()[0].code, codes::INVALID_PROPERTY_TYPE);
}

/// Unknown endpoints are reported before any body inspection.
#[test]
fn unknown_endpoint_fails() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let error =
        evaluator.evaluate(&EndpointName::new("missing"), &body(&[]), FIXED_NOW).unwrap_err();

    assert!(matches!(error, EvaluateError::UnknownEndpoint(name) if name == "missing"));
}

/// Endpoint lookup matches case-insensitively.
#[test]
fn endpoint_lookup_is_case_insensitive() {
    let evaluator = RequestEvaluator::new(seeded_store());

    let result = evaluator
        .evaluate(
            &EndpointName::new("SIGNUP"),
            &body(&[
                ("Username", json!("alice_01")),
                ("Password", json!("hunter2hunter2")),
                ("ConfirmPassword", json!("hunter2hunter2")),
            ]),
            FIXED_NOW,
        )
        .unwrap();

    assert_eq!(result.status, ValidationStatus::Success);
}
