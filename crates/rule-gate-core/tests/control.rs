// crates/rule-gate-core/tests/control.rs
// ============================================================================
// Module: Endpoint Control Tests
// Description: Administrative operation tests over the in-memory store.
// Purpose: Ensure schema mutations preserve rule integrity and digests.
// Dependencies: rule-gate-core, serde_json, time
// ============================================================================
//! ## Overview
//! Exercises endpoint/property/rule creation, rename propagation into
//! referencing rules, referential-integrity blocks, and schema digests.

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

use rule_gate_core::ControlError;
use rule_gate_core::EndpointControl;
use rule_gate_core::EndpointName;
use rule_gate_core::MemorySchemaStore;
use rule_gate_core::PropertyName;
use rule_gate_core::PropertySpec;
use rule_gate_core::PropertyType;
use rule_gate_core::RuleName;
use rule_gate_core::RuleRequest;
use rule_gate_core::RuleStore;
use rule_gate_core::RuleType;
use rule_gate_core::codes;
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const FIXED_NOW: OffsetDateTime = datetime!(2025-06-15 12:00:00 UTC);

fn endpoint() -> EndpointName {
    EndpointName::new("accounts")
}

fn rule(name: &str, rule_type: RuleType, value: serde_json::Value) -> RuleRequest {
    RuleRequest {
        name: RuleName::new(name),
        rule_type,
        value,
        error_message: None,
    }
}

fn property(name: &str, rules: Vec<RuleRequest>) -> PropertySpec {
    PropertySpec {
        name: PropertyName::new(name),
        property_type: PropertyType::String,
        is_optional: false,
        rules,
    }
}

/// Creates an endpoint with a referenced property and a referencing rule.
fn seeded() -> (MemorySchemaStore, EndpointControl<MemorySchemaStore>) {
    let store = MemorySchemaStore::new();
    let control = EndpointControl::new(store.clone());
    control
        .create_endpoint(
            &endpoint(),
            &[
                property("Password", vec![rule("min-length", RuleType::MoreOrEqual, json!(8))]),
                property(
                    "ConfirmPassword",
                    vec![rule("match", RuleType::Equal, json!("{Password}"))],
                ),
            ],
            FIXED_NOW,
        )
        .unwrap();
    (store, control)
}

// ============================================================================
// SECTION: Creation
// ============================================================================

/// Creation validates every rule before persisting anything.
#[test]
fn create_rejects_invalid_rules_atomically() {
    let store = MemorySchemaStore::new();
    let control = EndpointControl::new(store.clone());

    let error = control
        .create_endpoint(
            &EndpointName::new("broken"),
            &[property("Name", vec![rule("bad", RuleType::Regex, json!("[a-z"))])],
            FIXED_NOW,
        )
        .unwrap_err();

    let ControlError::Validation(failures) = error else {
        panic!("expected validation failures");
    };
    assert_eq!(failures.get("Name").unwrap()[0].code, codes::INVALID_RULE_VALUE);

    let evaluator = rule_gate_core::RequestEvaluator::new(store);
    let lookup = evaluator.evaluate(
        &EndpointName::new("broken"),
        &std::collections::BTreeMap::new(),
        FIXED_NOW,
    );
    assert!(matches!(lookup, Err(rule_gate_core::EvaluateError::UnknownEndpoint(_))));
}

/// Endpoint names collide case-insensitively.
#[test]
fn duplicate_endpoint_name_conflicts() {
    let (_, control) = seeded();
    let error = control.create_endpoint(&EndpointName::new("ACCOUNTS"), &[], FIXED_NOW).unwrap_err();
    assert!(matches!(error, ControlError::Conflict(_)));
}

/// Endpoint name grammar is enforced.
#[test]
fn invalid_endpoint_name_fails() {
    let store = MemorySchemaStore::new();
    let control = EndpointControl::new(store);
    let error =
        control.create_endpoint(&EndpointName::new("bad name"), &[], FIXED_NOW).unwrap_err();

    let ControlError::Validation(failures) = error else {
        panic!("expected validation failures");
    };
    assert_eq!(failures.get("bad name").unwrap()[0].code, codes::INVALID_ENDPOINT_NAME);
}

/// New rule names must not collide with stored rules on the endpoint.
#[test]
fn add_rules_rejects_stored_collisions() {
    let (_, control) = seeded();

    let error = control
        .add_rules(
            &endpoint(),
            &PropertyName::new("Password"),
            &[rule("MIN-LENGTH", RuleType::LessOrEqual, json!(64))],
            FIXED_NOW,
        )
        .unwrap_err();

    assert!(matches!(error, ControlError::Conflict(message) if message.contains("MIN-LENGTH")));
}

// ============================================================================
// SECTION: Rename Propagation
// ============================================================================

/// Renaming a property rewrites referencing rules' value and raw syntax.
#[test]
fn rename_property_rewrites_references() {
    let (store, control) = seeded();

    control
        .rename_property(
            &endpoint(),
            &PropertyName::new("Password"),
            &PropertyName::new("Secret"),
        )
        .unwrap();

    let rules = store.property_rules(&endpoint(), &PropertyName::new("ConfirmPassword")).unwrap();
    assert_eq!(rules[0].value, "Secret");
    assert_eq!(rules[0].raw_value.as_deref(), Some("{Secret}"));
}

/// Renaming a rule never touches its value.
#[test]
fn rename_rule_keeps_value() {
    let (store, control) = seeded();

    control
        .rename_rule(&endpoint(), &RuleName::new("match"), &RuleName::new("confirm-match"))
        .unwrap();

    let rules = store.property_rules(&endpoint(), &PropertyName::new("ConfirmPassword")).unwrap();
    assert_eq!(rules[0].name.as_str(), "confirm-match");
    assert_eq!(rules[0].normalized_name, "CONFIRM-MATCH");
    assert_eq!(rules[0].value, "Password");
}

/// Rule renames collide case-insensitively across the endpoint.
#[test]
fn rename_rule_rejects_collisions() {
    let (_, control) = seeded();

    let error = control
        .rename_rule(&endpoint(), &RuleName::new("match"), &RuleName::new("Min-Length"))
        .unwrap_err();

    assert!(matches!(error, ControlError::Conflict(_)));
}

// ============================================================================
// SECTION: Referential Integrity
// ============================================================================

/// A property referenced by relative rules cannot be deleted.
#[test]
fn delete_referenced_property_blocked() {
    let (_, control) = seeded();

    let error =
        control.delete_property(&endpoint(), &PropertyName::new("Password")).unwrap_err();
    assert!(matches!(error, ControlError::PropertyReferenced(name) if name == "Password"));
}

/// Dropping the referencing rule unblocks the deletion.
#[test]
fn delete_unreferenced_property_succeeds() {
    let (store, control) = seeded();

    control.delete_rule(&endpoint(), &RuleName::new("match")).unwrap();
    control.delete_property(&endpoint(), &PropertyName::new("Password")).unwrap();

    let rules = store.endpoint_rules(&endpoint()).unwrap();
    assert!(!rules.contains_key(&PropertyName::new("Password")));
}

/// A referenced property cannot become optional.
#[test]
fn loosening_referenced_property_blocked() {
    let (_, control) = seeded();

    let error = control
        .set_property_optionality(&endpoint(), &PropertyName::new("Password"), true)
        .unwrap_err();
    assert!(matches!(error, ControlError::PropertyReferenced(_)));
}

// ============================================================================
// SECTION: Schema Digests
// ============================================================================

/// Identical schemas hash identically; mutations change the digest.
#[test]
fn schema_digest_tracks_mutations() {
    let (_, first_control) = seeded();
    let (_, second_control) = seeded();

    let first = first_control.schema_digest(&endpoint()).unwrap();
    let second = second_control.schema_digest(&endpoint()).unwrap();
    assert_eq!(first, second);

    let receipt = second_control
        .update_rule_error_message(&endpoint(), &RuleName::new("match"), Some("must match"))
        .unwrap();
    assert_ne!(receipt.schema_digest, first);
}
