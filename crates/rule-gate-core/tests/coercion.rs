// crates/rule-gate-core/tests/coercion.rs
// ============================================================================
// Module: Property Coercion Tests
// Description: Tests for coercing request bodies into typed property values.
// Purpose: Ensure kind checks, parse failures, and optionality behave correctly.
// Dependencies: rule-gate-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises the pre-evaluation pass: required-property presence, JSON kind
//! checks, per-type parsing, and the collect-all-failures contract.

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

use rule_gate_core::FailureMap;
use rule_gate_core::PropertyCatalog;
use rule_gate_core::PropertyDescriptor;
use rule_gate_core::PropertyName;
use rule_gate_core::PropertyType;
use rule_gate_core::PropertyValue;
use rule_gate_core::codes;
use rule_gate_core::coerce_request;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn catalog(entries: &[(&str, PropertyType, bool)]) -> PropertyCatalog {
    entries
        .iter()
        .map(|(name, property_type, is_optional)| {
            (
                PropertyName::new(*name),
                PropertyDescriptor {
                    name: PropertyName::new(*name),
                    property_type: *property_type,
                    is_optional: *is_optional,
                },
            )
        })
        .collect()
}

fn body(entries: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    entries.iter().map(|(name, value)| ((*name).to_owned(), value.clone())).collect()
}

// ============================================================================
// SECTION: Presence
// ============================================================================

/// A missing required property fails; a missing optional one is skipped.
#[test]
fn missing_properties() {
    let catalog = catalog(&[
        ("Required", PropertyType::String, false),
        ("Optional", PropertyType::Int, true),
    ]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(&catalog, &body(&[]), &mut failures);

    assert!(typed.is_none());
    let details = failures.get("Required").unwrap();
    assert_eq!(details[0].code, codes::PROPERTY_NOT_PRESENT);
    assert!(details[0].message.contains("type 'String'"));
    assert!(failures.get("Optional").is_none());
}

/// Body keys without a declared property are ignored.
#[test]
fn undeclared_keys_are_ignored() {
    let catalog = catalog(&[("Name", PropertyType::String, false)]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(
        &catalog,
        &body(&[("Name", json!("x")), ("Extra", json!(1))]),
        &mut failures,
    )
    .unwrap();

    assert_eq!(typed.len(), 1);
    assert!(typed.contains_key(&PropertyName::new("Name")));
}

// ============================================================================
// SECTION: Kind Checks and Parsing
// ============================================================================

/// Numeric properties require a JSON number.
#[test]
fn numeric_kind_mismatch() {
    let catalog = catalog(&[("Age", PropertyType::Int, false)]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(&catalog, &body(&[("Age", json!("30"))]), &mut failures);

    assert!(typed.is_none());
    let details = failures.get("Age").unwrap();
    assert_eq!(details[0].code, codes::INVALID_PROPERTY_TYPE);
    assert_eq!(details[0].message, "Expected value kind is 'Json.Number'; got: 'Json.String'.");
}

/// Fractional numbers cannot coerce to Int.
#[test]
fn fractional_int_fails() {
    let catalog = catalog(&[("Age", PropertyType::Int, false)]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(&catalog, &body(&[("Age", json!(1.5))]), &mut failures);

    assert!(typed.is_none());
    let details = failures.get("Age").unwrap();
    assert_eq!(details[0].message, "Value is not valid Int.");
}

/// Temporal values parse from their text forms.
#[test]
fn temporal_values_coerce() {
    let catalog = catalog(&[
        ("At", PropertyType::DateTime, false),
        ("On", PropertyType::DateOnly, false),
        ("When", PropertyType::TimeOnly, false),
    ]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(
        &catalog,
        &body(&[
            ("At", json!("2025-01-01T08:30:00Z")),
            ("On", json!("2025-01-01")),
            ("When", json!("08:30")),
        ]),
        &mut failures,
    )
    .unwrap();

    assert!(matches!(typed.get("At").unwrap().value, PropertyValue::DateTime(_)));
    assert!(matches!(typed.get("On").unwrap().value, PropertyValue::Date(_)));
    assert!(matches!(typed.get("When").unwrap().value, PropertyValue::Time(_)));
}

/// Unparseable temporal text fails with the type's name.
#[test]
fn invalid_date_fails() {
    let catalog = catalog(&[("On", PropertyType::DateOnly, false)]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(&catalog, &body(&[("On", json!("01/02/2025"))]), &mut failures);

    assert!(typed.is_none());
    assert_eq!(failures.get("On").unwrap()[0].message, "Value is not valid DateOnly.");
}

/// Every failing property is reported in one pass.
#[test]
fn failures_collect_across_properties() {
    let catalog = catalog(&[
        ("A", PropertyType::Int, false),
        ("B", PropertyType::Float, false),
        ("C", PropertyType::String, false),
    ]);
    let mut failures = FailureMap::new();

    let typed = coerce_request(
        &catalog,
        &body(&[("A", json!("x")), ("B", json!(true))]),
        &mut failures,
    );

    assert!(typed.is_none());
    assert!(failures.get("A").is_some());
    assert!(failures.get("B").is_some());
    assert!(failures.get("C").is_some());
}
