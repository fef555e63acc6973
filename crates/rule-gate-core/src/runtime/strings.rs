// crates/rule-gate-core/src/runtime/strings.rs
// ============================================================================
// Module: Rule Gate String Evaluation
// Description: Request-time evaluation of String property rules.
// Purpose: Apply canonical string rules to coerced request values.
// Dependencies: crate::core, crate::runtime::message, regex
// ============================================================================

//! ## Overview
//! String rules compare ordinally by default; the stored modifier switches to
//! length comparison (`ByLength`) or case-insensitive comparison (`CaseI`).
//! Ranges bound the character length inclusively (`Between`) or exclude it
//! (`Outside`). Stored regex patterns were compiled at authoring time; a
//! pattern that no longer compiles fails the rule rather than raising.
//! Lengths count Unicode scalar values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::Regex;

use crate::core::ErrorDetail;
use crate::core::FailureMap;
use crate::core::PropertyName;
use crate::core::Rule;
use crate::core::RuleType;
use crate::core::TypedProperty;
use crate::core::extra;
use crate::runtime::message;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates every rule of one String property, appending failures keyed by
/// property name with the rule name as the failure code.
pub(crate) fn evaluate(
    property: &TypedProperty,
    rules: &[Rule],
    values: &BTreeMap<PropertyName, TypedProperty>,
    failures: &mut FailureMap,
) {
    let Some(actual) = property.value.as_str() else {
        return;
    };

    for rule in rules {
        if let Some(message) = apply_rule(actual, rule, values) {
            failures.push(property.name.as_str(), ErrorDetail::new(rule.name.as_str(), message));
        }
    }
}

/// Applies one rule, returning the rendered failure message when violated.
fn apply_rule(
    actual: &str,
    rule: &Rule,
    values: &BTreeMap<PropertyName, TypedProperty>,
) -> Option<String> {
    let expected: &str = if rule.is_relative {
        match values.get(rule.value.as_str()).and_then(|sibling| sibling.value.as_str()) {
            Some(sibling) => sibling,
            // Already-validated rules only reference required sibling values.
            None => return None,
        }
    } else {
        &rule.value
    };

    let satisfied = match rule.rule_type {
        RuleType::Less => ordered(actual, expected, rule, Ordering::is_lt),
        RuleType::More => ordered(actual, expected, rule, Ordering::is_gt),
        RuleType::LessOrEqual => ordered(actual, expected, rule, Ordering::is_le),
        RuleType::MoreOrEqual => ordered(actual, expected, rule, Ordering::is_ge),
        RuleType::Equal => ordered(actual, expected, rule, Ordering::is_eq),
        RuleType::NotEqual => ordered(actual, expected, rule, Ordering::is_ne),
        RuleType::Between => return length_range(actual, rule, true),
        RuleType::Outside => return length_range(actual, rule, false),
        RuleType::Regex => matches_pattern(actual, expected),
        RuleType::Email => actual.contains('@'),
    };

    if satisfied {
        return None;
    }
    Some(message::comparison_message(rule, &actual_display(actual, rule)))
}

// ============================================================================
// SECTION: Comparison Helpers
// ============================================================================

/// Compares actual and expected under the rule's modifier and tests the
/// resulting ordering. An unresolvable comparison satisfies the rule.
fn ordered(actual: &str, expected: &str, rule: &Rule, test: fn(Ordering) -> bool) -> bool {
    compare(actual, expected, rule).is_none_or(test)
}

/// Computes the modifier-aware ordering of actual against expected.
fn compare(actual: &str, expected: &str, rule: &Rule) -> Option<Ordering> {
    match rule.extra_info.as_deref() {
        None => Some(actual.cmp(expected)),
        Some(extra::BY_LENGTH) => {
            let expected_length = if rule.is_relative {
                char_count(expected)
            } else {
                expected.parse::<i64>().ok()?
            };
            Some(char_count(actual).cmp(&expected_length))
        }
        Some(extra::CASE_INSENSITIVE) => Some(actual.to_lowercase().cmp(&expected.to_lowercase())),
        Some(_) => None,
    }
}

/// Tests a length range rule, returning the rendered message on violation.
fn length_range(actual: &str, rule: &Rule, inclusive: bool) -> Option<String> {
    let (Some(lower), Some(upper)) = (
        rule.value.parse::<i64>().ok(),
        rule.extra_info.as_deref().and_then(|bound| bound.parse::<i64>().ok()),
    ) else {
        return None;
    };

    let length = char_count(actual);
    let satisfied = if inclusive {
        length >= lower && length <= upper
    } else {
        length < lower || length > upper
    };

    if satisfied {
        return None;
    }
    Some(message::range_message(rule, &length.to_string()))
}

/// Matches the stored pattern, failing closed when it no longer compiles.
fn matches_pattern(actual: &str, pattern: &str) -> bool {
    Regex::new(pattern).map(|regex| regex.is_match(actual)).unwrap_or(false)
}

/// Returns the `{actualValue}` substitution: the length for length rules,
/// the submitted text otherwise.
fn actual_display(actual: &str, rule: &Rule) -> String {
    if rule.extra_info.as_deref() == Some(extra::BY_LENGTH) {
        char_count(actual).to_string()
    } else {
        actual.to_owned()
    }
}

/// Counts Unicode scalar values without risking length truncation.
fn char_count(text: &str) -> i64 {
    i64::try_from(text.chars().count()).unwrap_or(i64::MAX)
}
