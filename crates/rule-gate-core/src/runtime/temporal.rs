// crates/rule-gate-core/src/runtime/temporal.rs
// ============================================================================
// Module: Rule Gate Temporal Evaluation
// Description: Request-time evaluation of DateTime, DateOnly, and TimeOnly rules.
// Purpose: Re-resolve canonical temporal rules against live data and the call snapshot.
// Dependencies: crate::core, crate::runtime::message, time
// ============================================================================

//! ## Overview
//! Temporal rules resolve their expected side at request time: a sibling
//! value for relative rules, the call's `now` snapshot for `now`-prefixed
//! values, or a parsed literal. Stored offsets apply to the resolved base.
//! Range bounds re-resolve against the same snapshot used for every bound in
//! the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::core::ErrorDetail;
use crate::core::FailureMap;
use crate::core::OffsetSpan;
use crate::core::PropertyName;
use crate::core::Rule;
use crate::core::RuleType;
use crate::core::TypedProperty;
use crate::core::temporal::TemporalValue;
use crate::runtime::message;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates every rule of one temporal property of type `T`.
pub(crate) fn evaluate<T: TemporalValue>(
    property: &TypedProperty,
    actual: T,
    rules: &[Rule],
    values: &BTreeMap<PropertyName, TypedProperty>,
    now: OffsetDateTime,
    failures: &mut FailureMap,
) {
    for rule in rules {
        if let Some(message) = apply_rule(actual, rule, values, now) {
            failures.push(property.name.as_str(), ErrorDetail::new(rule.name.as_str(), message));
        }
    }
}

/// Applies one rule, returning the rendered failure message when violated.
fn apply_rule<T: TemporalValue>(
    actual: T,
    rule: &Rule,
    values: &BTreeMap<PropertyName, TypedProperty>,
    now: OffsetDateTime,
) -> Option<String> {
    if rule.rule_type.is_range() {
        let lower = resolve_bound::<T>(&rule.value, now)?;
        let upper = resolve_bound::<T>(rule.extra_info.as_deref()?, now)?;
        let satisfied = match rule.rule_type {
            RuleType::Between => at_least(actual, lower) && at_most(actual, upper),
            _ => !at_least(actual, lower) || !at_most(actual, upper),
        };
        if satisfied {
            return None;
        }
        return Some(message::range_message(rule, &actual.display()));
    }

    let expected = resolve_expected::<T>(rule, values, now)?;
    let ordering = actual.partial_cmp(&expected)?;

    let satisfied = match rule.rule_type {
        RuleType::Less => ordering.is_lt(),
        RuleType::More => ordering.is_gt(),
        RuleType::LessOrEqual => ordering.is_le(),
        RuleType::MoreOrEqual => ordering.is_ge(),
        RuleType::Equal => ordering.is_eq(),
        RuleType::NotEqual => ordering.is_ne(),
        // Regex/Email are rejected for temporal properties at authoring time.
        _ => true,
    };

    if satisfied {
        return None;
    }
    Some(message::comparison_message(rule, &actual.display()))
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the expected side of a comparison rule.
fn resolve_expected<T: TemporalValue>(
    rule: &Rule,
    values: &BTreeMap<PropertyName, TypedProperty>,
    now: OffsetDateTime,
) -> Option<T> {
    let offset = rule.extra_info.as_deref().and_then(OffsetSpan::parse);

    if rule.is_relative {
        let sibling = values.get(rule.value.as_str())?;
        let base = T::from_value(&sibling.value)?;
        return Some(offset.map_or(base, |span| base.shifted(&span)));
    }

    if rule.value.starts_with(['n', 'N']) {
        let instant = offset.map_or(now, |span| T::shift_instant(now, &span));
        return Some(T::from_instant(instant));
    }

    T::parse_literal(&rule.value)
}

/// Resolves one canonical range bound against the call snapshot.
fn resolve_bound<T: TemporalValue>(text: &str, now: OffsetDateTime) -> Option<T> {
    if !text.starts_with(['n', 'N']) {
        return T::parse_literal(text);
    }

    let rest = text.get(3..)?;
    if rest.is_empty() {
        return Some(T::from_instant(now));
    }
    let span = OffsetSpan::parse(rest)?;
    Some(T::from_instant(T::shift_instant(now, &span)))
}

// ============================================================================
// SECTION: Ordering Helpers
// ============================================================================

/// Reports whether `value` orders at or above `bound`.
fn at_least<T: TemporalValue>(value: T, bound: T) -> bool {
    matches!(value.partial_cmp(&bound), Some(Ordering::Greater | Ordering::Equal))
}

/// Reports whether `value` orders at or below `bound`.
fn at_most<T: TemporalValue>(value: T, bound: T) -> bool {
    matches!(value.partial_cmp(&bound), Some(Ordering::Less | Ordering::Equal))
}
