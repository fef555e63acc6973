// crates/rule-gate-core/src/authoring/temporal.rs
// ============================================================================
// Module: Rule Gate Temporal Authoring
// Description: Authoring-time validation for DateTime, DateOnly, and TimeOnly rules.
// Purpose: Parse temporal literals, now-tokens, and offset-qualified references.
// Dependencies: crate::authoring, crate::core, time
// ============================================================================

//! ## Overview
//! Temporal comparisons accept a literal in the type's text form, a
//! `now[±offset]` token, or a `{Property[±offset]}` sibling reference of the
//! same temporal type. Ranges take two bounds in the same grammar, resolved
//! against one shared `now` snapshot.
//!
//! A dynamic lower bound forbids a fixed upper bound: the moving lower edge
//! would eventually overtake any fixed instant. The reverse pairing (fixed
//! lower, dynamic upper) stays allowed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::authoring::CanonicalForm;
use crate::authoring::invalid_value_kind;
use crate::authoring::range_elements;
use crate::authoring::rule_failure;
use crate::authoring::token;
use crate::authoring::token::TokenError;
use crate::authoring::validate_target_property;
use crate::core::ErrorDetail;
use crate::core::NOW;
use crate::core::OffsetSpan;
use crate::core::PropertyCatalog;
use crate::core::PropertyName;
use crate::core::RuleName;
use crate::core::RuleRequest;
use crate::core::RuleType;
use crate::core::RuleValueKind;
use crate::core::codes;
use crate::core::temporal::TemporalValue;

// ============================================================================
// SECTION: Rule Dispatch
// ============================================================================

/// Validates one rule against a temporal property of type `T`.
pub(crate) fn author_rule<T: TemporalValue>(
    catalog: &PropertyCatalog,
    now: OffsetDateTime,
    property: &PropertyName,
    request: &RuleRequest,
) -> Result<CanonicalForm, ErrorDetail> {
    match request.rule_type {
        RuleType::Less
        | RuleType::More
        | RuleType::LessOrEqual
        | RuleType::MoreOrEqual
        | RuleType::Equal
        | RuleType::NotEqual => comparison::<T>(catalog, property, request),
        RuleType::Between | RuleType::Outside => range::<T>(now, request),
        RuleType::Regex | RuleType::Email => {
            Err(rule_failure(codes::INVALID_RULE_TYPE, &request.name, "Rule is not supported."))
        }
    }
}

// ============================================================================
// SECTION: Comparison Values
// ============================================================================

/// Validates a temporal comparison value: a literal, a now-token, or an
/// offset-qualified sibling reference.
fn comparison<T: TemporalValue>(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;
    let type_name = T::PROPERTY_TYPE.display_name();

    let Some(raw) = request.value.as_str() else {
        return Err(invalid_value_kind(rule, "String", &request.value));
    };
    if raw.trim().is_empty() {
        return Err(rule_failure(codes::EMPTY_RULE_VALUE, rule, "Empty value."));
    }

    if raw.starts_with('{') {
        let parsed = token::property_offset_token(raw).map_err(|error| match error {
            TokenError::UnterminatedBrace => {
                rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid {type_name}."))
            }
            TokenError::EmptyPropertyName => {
                rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty property name.")
            }
            TokenError::InvalidOffset => {
                rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid offset.")
            }
            _ => rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid property/offset."),
        })?;

        validate_target_property(catalog, property, parsed.name, T::PROPERTY_TYPE, rule)?;

        return Ok(CanonicalForm {
            value: parsed.name.to_owned(),
            raw_value: Some(raw.to_owned()),
            value_kind: RuleValueKind::String,
            extra_info: parsed.offset,
            is_relative: true,
        });
    }

    if raw.starts_with(['n', 'N']) {
        let offset = token::now_token(raw).map_err(|error| match error {
            TokenError::InvalidOffset => {
                rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid offset.")
            }
            _ => rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid {type_name}.")),
        })?;

        // The raw syntax is only worth keeping when an offset qualifies it.
        let raw_value = offset.is_some().then(|| raw.to_owned());
        return Ok(CanonicalForm {
            value: NOW.to_owned(),
            raw_value,
            value_kind: RuleValueKind::String,
            extra_info: offset,
            is_relative: false,
        });
    }

    if T::parse_literal(raw).is_none() {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid {type_name}.")));
    }

    Ok(CanonicalForm {
        value: raw.to_owned(),
        raw_value: None,
        value_kind: RuleValueKind::String,
        extra_info: None,
        is_relative: false,
    })
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

/// Range bound resolved against the shared `now` snapshot.
struct ResolvedBound<T> {
    /// Concrete bound value at the snapshot instant.
    value: T,
    /// Indicates a `now`-relative bound.
    dynamic: bool,
    /// Canonical bound encoding persisted in the rule.
    canonical: String,
}

/// Validates a `Between`/`Outside` range over two temporal bounds.
fn range<T: TemporalValue>(
    now: OffsetDateTime,
    request: &RuleRequest,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;
    let type_name = T::PROPERTY_TYPE.display_name();
    let (lower, upper) = range_elements(rule, &request.value)?;

    let (Some(lower_text), Some(upper_text)) = (lower.as_str(), upper.as_str()) else {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!(
                "Both values must be of the same type 'Json.String' representing valid \
                 {type_name} values."
            ),
        ));
    };

    if lower_text.trim().is_empty() {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty value (lower bound)."));
    }
    if upper_text.trim().is_empty() {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty value (upper bound)."));
    }

    let lower_bound = resolve_bound::<T>(rule, lower_text, "lower bound", now)?;
    let upper_bound = resolve_bound::<T>(rule, upper_text, "upper bound", now)?;

    if lower_bound.dynamic && !upper_bound.dynamic {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Upper bound cannot be fixed value while lower bound is 'now'.",
        ));
    }

    if !matches!(lower_bound.value.partial_cmp(&upper_bound.value), Some(Ordering::Less)) {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Lower bound cannot be equal to or greater than Upper bound.",
        ));
    }

    Ok(CanonicalForm {
        value: lower_bound.canonical,
        raw_value: Some(request.value.to_string()),
        value_kind: RuleValueKind::Range,
        extra_info: Some(upper_bound.canonical),
        is_relative: false,
    })
}

/// Resolves one range bound to a concrete value and its canonical encoding.
fn resolve_bound<T: TemporalValue>(
    rule: &RuleName,
    text: &str,
    bound: &str,
    now: OffsetDateTime,
) -> Result<ResolvedBound<T>, ErrorDetail> {
    let type_name = T::PROPERTY_TYPE.display_name();

    if !text.starts_with(['n', 'N']) {
        let value = T::parse_literal(text).ok_or_else(|| {
            rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid {type_name} ({bound})."))
        })?;
        return Ok(ResolvedBound {
            value,
            dynamic: false,
            canonical: text.to_owned(),
        });
    }

    let offset = token::now_token(text).map_err(|error| match error {
        TokenError::InvalidOffset => {
            rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid offset ({bound})."))
        }
        _ => {
            rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid {type_name} ({bound})."))
        }
    })?;

    let instant =
        offset.as_deref().and_then(OffsetSpan::parse).map_or(now, |span| T::shift_instant(now, &span));
    let canonical = offset.map_or_else(|| NOW.to_owned(), |suffix| format!("{NOW}{suffix}"));

    Ok(ResolvedBound {
        value: T::from_instant(instant),
        dynamic: true,
        canonical,
    })
}
