// crates/rule-gate-core/tests/rule_names.rs
// ============================================================================
// Module: Rule-Name Pre-Pass Tests
// Description: Tests for the shared rule-name validator.
// Purpose: Ensure name checks stop early and span endpoint scope.
// Dependencies: rule-gate-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises empty-name rejection, case-insensitive duplicate detection, the
//! stop-on-first-violation contract, and duplicate tracking across multiple
//! properties of one authoring call.

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

use rule_gate_core::FailureMap;
use rule_gate_core::RuleName;
use rule_gate_core::RuleNameValidator;
use rule_gate_core::RuleRequest;
use rule_gate_core::RuleType;
use rule_gate_core::codes;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn named(name: &str) -> RuleRequest {
    RuleRequest {
        name: RuleName::new(name),
        rule_type: RuleType::Equal,
        value: json!("x"),
        error_message: None,
    }
}

// ============================================================================
// SECTION: Name Checks
// ============================================================================

/// Empty and whitespace names are rejected.
#[test]
fn empty_name_fails() {
    let mut validator = RuleNameValidator::new();
    let mut failures = FailureMap::new();

    validator.validate("key", &[named("   ")], &mut failures);

    let details = failures.get("key").unwrap();
    assert_eq!(details[0].code, codes::EMPTY_RULE_NAME);
}

/// Duplicates match case-insensitively and report the colliding name.
#[test]
fn duplicate_name_fails() {
    let mut validator = RuleNameValidator::new();
    let mut failures = FailureMap::new();

    validator.validate("key", &[named("min-length"), named("MIN-LENGTH")], &mut failures);

    let details = failures.get("key").unwrap();
    assert_eq!(details[0].code, codes::DUPLICATE_RULE_NAME);
    assert!(details[0].message.contains("'MIN-LENGTH'"));
}

/// The pass stops at the first violation for a property.
#[test]
fn stops_after_first_violation() {
    let mut validator = RuleNameValidator::new();
    let mut failures = FailureMap::new();

    validator.validate("key", &[named(""), named(""), named("")], &mut failures);

    assert_eq!(failures.get("key").unwrap().len(), 1);
}

/// The duplicate set spans every property checked by one validator, so rule
/// names are unique per endpoint rather than per property.
#[test]
fn duplicates_span_properties() {
    let mut validator = RuleNameValidator::new();
    let mut failures = FailureMap::new();

    validator.validate("first", &[named("shared")], &mut failures);
    validator.validate("second", &[named("SHARED")], &mut failures);

    assert!(failures.get("first").is_none());
    let details = failures.get("second").unwrap();
    assert_eq!(details[0].code, codes::DUPLICATE_RULE_NAME);
}

/// Distinct names across properties pass cleanly.
#[test]
fn distinct_names_pass() {
    let mut validator = RuleNameValidator::new();
    let mut failures = FailureMap::new();

    validator.validate("first", &[named("a"), named("b")], &mut failures);
    validator.validate("second", &[named("c")], &mut failures);

    assert!(failures.is_empty());
}
