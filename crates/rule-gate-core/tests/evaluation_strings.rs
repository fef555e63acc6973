// crates/rule-gate-core/tests/evaluation_strings.rs
// ============================================================================
// Module: String Evaluation Tests
// Description: Request-time evaluation tests for String property rules.
// Purpose: Ensure string comparisons, modifiers, ranges, and templates behave correctly.
// Dependencies: rule-gate-core, serde_json, time
// ============================================================================
//! ## Overview
//! Evaluates canonical string rules produced by the authoring pipeline
//! against coerced values, covering modifiers, length ranges, patterns, and
//! message templating.

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
use rule_gate_core::Rule;
use rule_gate_core::RuleAuthoring;
use rule_gate_core::RuleName;
use rule_gate_core::RuleRequest;
use rule_gate_core::RuleType;
use rule_gate_core::TypedProperty;
use rule_gate_core::evaluate_property;
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const FIXED_NOW: OffsetDateTime = datetime!(2025-06-15 12:00:00 UTC);

fn string_property(name: &str, value: &str) -> TypedProperty {
    TypedProperty {
        name: PropertyName::new(name),
        property_type: PropertyType::String,
        value: PropertyValue::String(value.to_owned()),
    }
}

fn values(properties: &[TypedProperty]) -> BTreeMap<PropertyName, TypedProperty> {
    properties.iter().map(|property| (property.name.clone(), property.clone())).collect()
}

fn author(
    catalog: &PropertyCatalog,
    rule_type: RuleType,
    value: serde_json::Value,
    error_message: Option<&str>,
) -> Rule {
    let request = RuleRequest {
        name: RuleName::new("rule"),
        rule_type,
        value,
        error_message: error_message.map(str::to_owned),
    };
    let mut authoring = RuleAuthoring::new(catalog, FIXED_NOW);
    let rules = authoring
        .validate("_", &PropertyName::new("Source"), PropertyType::String, &[request])
        .unwrap();
    rules.into_iter().next().unwrap()
}

fn sibling_catalog(name: &str) -> PropertyCatalog {
    std::iter::once((
        PropertyName::new(name),
        PropertyDescriptor {
            name: PropertyName::new(name),
            property_type: PropertyType::String,
            is_optional: false,
        },
    ))
    .collect()
}

fn run(property: &TypedProperty, rule: &Rule, siblings: &[TypedProperty]) -> FailureMap {
    let mut all = siblings.to_vec();
    all.push(property.clone());
    let mut failures = FailureMap::new();
    evaluate_property(property, &[rule.clone()], &values(&all), FIXED_NOW, &mut failures);
    failures
}

// ============================================================================
// SECTION: Comparisons and Modifiers
// ============================================================================

/// A case-insensitive literal matches regardless of casing and fails on a
/// different value.
#[test]
fn case_insensitive_equal() {
    let rule = author(&PropertyCatalog::new(), RuleType::Equal, json!("i:Hello"), None);
    let property = string_property("Username", "HELLO");

    assert!(run(&property, &rule, &[]).is_empty());

    let other = string_property("Username", "World");
    let failures = run(&other, &rule, &[]);
    let details = failures.get("Username").unwrap();
    assert_eq!(details[0].code, "rule");
}

/// A numeric bound compares the character length.
#[test]
fn length_bound_compares_length() {
    let rule = author(&PropertyCatalog::new(), RuleType::MoreOrEqual, json!(3), None);

    assert!(run(&string_property("Name", "abc"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Name", "ab"), &rule, &[]).is_empty());
}

/// A relative rule compares against the sibling's submitted value.
#[test]
fn relative_equal_uses_sibling() {
    let rule =
        author(&sibling_catalog("Password"), RuleType::Equal, json!("{Password}"), None);
    let confirm = string_property("Confirm", "hunter2");
    let password = string_property("Password", "hunter2");

    assert!(run(&confirm, &rule, &[password]).is_empty());

    let mismatch = string_property("Password", "other");
    assert!(!run(&confirm, &rule, &[mismatch]).is_empty());
}

/// The `.Length` option compares lengths of both sides.
#[test]
fn relative_length_compares_lengths() {
    let rule =
        author(&sibling_catalog("Nickname"), RuleType::Equal, json!("{Nickname.Length}"), None);
    let property = string_property("Code", "abcd");

    assert!(run(&property, &rule, &[string_property("Nickname", "wxyz")]).is_empty());
    assert!(!run(&property, &rule, &[string_property("Nickname", "wxy")]).is_empty());
}

// ============================================================================
// SECTION: Length Ranges
// ============================================================================

/// `Between` bounds the length inclusively on both edges.
#[test]
fn between_is_inclusive() {
    let rule = author(&PropertyCatalog::new(), RuleType::Between, json!([2, 4]), None);

    assert!(run(&string_property("Name", "ab"), &rule, &[]).is_empty());
    assert!(run(&string_property("Name", "abcd"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Name", "a"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Name", "abcde"), &rule, &[]).is_empty());
}

/// `Outside` excludes the inclusive range.
#[test]
fn outside_excludes_range() {
    let rule = author(&PropertyCatalog::new(), RuleType::Outside, json!([2, 4]), None);

    assert!(run(&string_property("Name", "a"), &rule, &[]).is_empty());
    assert!(run(&string_property("Name", "abcde"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Name", "abc"), &rule, &[]).is_empty());
}

// ============================================================================
// SECTION: Patterns and Email
// ============================================================================

/// Stored patterns match at evaluation time.
#[test]
fn regex_matches() {
    let rule = author(&PropertyCatalog::new(), RuleType::Regex, json!("^[a-z]+$"), None);

    assert!(run(&string_property("Slug", "abc"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Slug", "Abc1"), &rule, &[]).is_empty());
}

/// Email checks only require an `@`.
#[test]
fn email_requires_at_sign() {
    let rule = author(&PropertyCatalog::new(), RuleType::Email, json!(null), None);

    assert!(run(&string_property("Mail", "a@b"), &rule, &[]).is_empty());
    assert!(!run(&string_property("Mail", "nope"), &rule, &[]).is_empty());
}

// ============================================================================
// SECTION: Message Templates
// ============================================================================

/// Placeholders substitute case-insensitively; `{value}` prefers the
/// authored raw syntax.
#[test]
fn template_substitution() {
    let rule = author(
        &PropertyCatalog::new(),
        RuleType::Equal,
        json!("i:Hello"),
        Some("expected {VALUE}, got {actualvalue}"),
    );
    let failures = run(&string_property("Username", "World"), &rule, &[]);

    let details = failures.get("Username").unwrap();
    assert_eq!(details[0].message, "expected i:Hello, got World");
}

/// Range templates expose both bounds and the submitted length.
#[test]
fn range_template_substitution() {
    let rule = author(
        &PropertyCatalog::new(),
        RuleType::Between,
        json!([2, 4]),
        Some("length must be {value1}..{value2}, got {actualValue}"),
    );
    let failures = run(&string_property("Name", "abcdef"), &rule, &[]);

    let details = failures.get("Name").unwrap();
    assert_eq!(details[0].message, "length must be 2..4, got 6");
}

/// A rule without a template renders the empty string.
#[test]
fn missing_template_renders_empty() {
    let rule = author(&PropertyCatalog::new(), RuleType::Equal, json!("x"), None);
    let failures = run(&string_property("Name", "y"), &rule, &[]);

    assert_eq!(failures.get("Name").unwrap()[0].message, "");
}
