// crates/rule-gate-core/src/runtime/numeric.rs
// ============================================================================
// Module: Rule Gate Numeric Evaluation
// Description: Request-time evaluation of Int and Float property rules.
// Purpose: Apply canonical numeric rules to coerced request values.
// Dependencies: crate::core, crate::runtime::message
// ============================================================================

//! ## Overview
//! Numeric rules compare the coerced value against a literal or a sibling
//! value of the same width. Ranges are inclusive for `Between` and exclusive
//! for `Outside`. `Regex`/`Email` never reach numeric evaluation; authoring
//! rejects them for numeric properties.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ErrorDetail;
use crate::core::FailureMap;
use crate::core::PropertyName;
use crate::core::Rule;
use crate::core::RuleType;
use crate::core::TypedProperty;
use crate::runtime::message;

// ============================================================================
// SECTION: Integer Evaluation
// ============================================================================

/// Evaluates every rule of one Int property.
pub(crate) fn evaluate_int(
    property: &TypedProperty,
    actual: i64,
    rules: &[Rule],
    values: &BTreeMap<PropertyName, TypedProperty>,
    failures: &mut FailureMap,
) {
    for rule in rules {
        let resolve = |text: &str| text.parse::<i64>().ok();
        let sibling = |name: &str| values.get(name).and_then(|p| p.value.as_int());
        if let Some(message) = apply_rule(actual, rule, resolve, sibling) {
            failures.push(property.name.as_str(), ErrorDetail::new(rule.name.as_str(), message));
        }
    }
}

// ============================================================================
// SECTION: Float Evaluation
// ============================================================================

/// Evaluates every rule of one Float property.
pub(crate) fn evaluate_float(
    property: &TypedProperty,
    actual: f64,
    rules: &[Rule],
    values: &BTreeMap<PropertyName, TypedProperty>,
    failures: &mut FailureMap,
) {
    for rule in rules {
        let resolve = |text: &str| text.parse::<f64>().ok();
        let sibling = |name: &str| values.get(name).and_then(|p| p.value.as_float());
        if let Some(message) = apply_rule(actual, rule, resolve, sibling) {
            failures.push(property.name.as_str(), ErrorDetail::new(rule.name.as_str(), message));
        }
    }
}

// ============================================================================
// SECTION: Shared Application
// ============================================================================

/// Applies one numeric rule, returning the rendered failure message when
/// violated. Unresolvable expectations satisfy the rule.
fn apply_rule<T, R, S>(actual: T, rule: &Rule, resolve: R, sibling: S) -> Option<String>
where
    T: PartialOrd + PartialEq + ToString + Copy,
    R: Fn(&str) -> Option<T>,
    S: Fn(&str) -> Option<T>,
{
    if rule.rule_type.is_range() {
        let lower = resolve(&rule.value)?;
        let upper = resolve(rule.extra_info.as_deref()?)?;
        let satisfied = match rule.rule_type {
            RuleType::Between => actual >= lower && actual <= upper,
            _ => actual < lower || actual > upper,
        };
        if satisfied {
            return None;
        }
        return Some(message::range_message(rule, &actual.to_string()));
    }

    let expected =
        if rule.is_relative { sibling(&rule.value)? } else { resolve(&rule.value)? };

    let satisfied = match rule.rule_type {
        RuleType::Less => actual < expected,
        RuleType::More => actual > expected,
        RuleType::LessOrEqual => actual <= expected,
        RuleType::MoreOrEqual => actual >= expected,
        RuleType::Equal => actual == expected,
        RuleType::NotEqual => actual != expected,
        // Regex/Email are rejected for numeric properties at authoring time.
        _ => true,
    };

    if satisfied {
        return None;
    }
    Some(message::comparison_message(rule, &actual.to_string()))
}
