// crates/rule-gate-core/src/authoring/numeric.rs
// ============================================================================
// Module: Rule Gate Numeric Authoring
// Description: Authoring-time validation for Int and Float property rules.
// Purpose: Parse numeric rule values and sibling references into canonical form.
// Dependencies: crate::authoring, crate::core, serde_json
// ============================================================================

//! ## Overview
//! Numeric comparisons accept a JSON number of the property's width or a
//! plain `{Property}` sibling reference (no options, no offsets). Ranges take
//! two JSON numbers with a strict lower-below-upper ordering. `Regex` and
//! `Email` are not supported for numeric properties.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::authoring::CanonicalForm;
use crate::authoring::invalid_value_kind;
use crate::authoring::range_elements;
use crate::authoring::rule_failure;
use crate::authoring::validate_target_property;
use crate::core::ErrorDetail;
use crate::core::PropertyCatalog;
use crate::core::PropertyName;
use crate::core::PropertyType;
use crate::core::RuleName;
use crate::core::RuleRequest;
use crate::core::RuleType;
use crate::core::RuleValueKind;
use crate::core::codes;

// ============================================================================
// SECTION: Numeric Kinds
// ============================================================================

/// Width of the numeric property being authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericKind {
    /// 64-bit signed integers.
    Int,
    /// 64-bit floats.
    Float,
}

impl NumericKind {
    /// Returns the property type for cross-property reference checks.
    pub(crate) const fn property_type(self) -> PropertyType {
        match self {
            Self::Int => PropertyType::Int,
            Self::Float => PropertyType::Float,
        }
    }

    /// Returns the canonical value kind for literal comparisons.
    const fn value_kind(self) -> RuleValueKind {
        match self {
            Self::Int => RuleValueKind::Int,
            Self::Float => RuleValueKind::Float,
        }
    }

    /// Parses a JSON number into canonical literal text.
    fn literal_text(self, value: &serde_json::Value) -> Option<String> {
        match self {
            Self::Int => value.as_i64().map(|number| number.to_string()),
            Self::Float => value.as_f64().map(|number| number.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Rule Dispatch
// ============================================================================

/// Validates one rule against an Int or Float property.
pub(crate) fn author_rule(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
    kind: NumericKind,
) -> Result<CanonicalForm, ErrorDetail> {
    match request.rule_type {
        RuleType::Less
        | RuleType::More
        | RuleType::LessOrEqual
        | RuleType::MoreOrEqual
        | RuleType::Equal
        | RuleType::NotEqual => comparison(catalog, property, request, kind),
        RuleType::Between | RuleType::Outside => range(request, kind),
        RuleType::Regex | RuleType::Email => {
            Err(rule_failure(codes::INVALID_RULE_TYPE, &request.name, "Rule is not supported."))
        }
    }
}

// ============================================================================
// SECTION: Comparison Values
// ============================================================================

/// Validates a numeric comparison value: a literal or a sibling reference.
fn comparison(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
    kind: NumericKind,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    match &request.value {
        serde_json::Value::Number(_) => {
            let value = kind.literal_text(&request.value).ok_or_else(|| {
                rule_failure(
                    codes::INVALID_RULE_VALUE,
                    rule,
                    &format!("Invalid {}.", kind.property_type()),
                )
            })?;
            Ok(CanonicalForm {
                value,
                raw_value: None,
                value_kind: kind.value_kind(),
                extra_info: None,
                is_relative: false,
            })
        }
        serde_json::Value::String(raw) => relative_reference(catalog, property, request, raw, kind),
        other => Err(invalid_value_kind(rule, "Number, String", other)),
    }
}

/// Validates a plain `{Property}` sibling reference for numeric comparisons.
fn relative_reference(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
    raw: &str,
    kind: NumericKind,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    if raw.trim().is_empty() {
        return Err(rule_failure(codes::EMPTY_RULE_VALUE, rule, "Value is required."));
    }
    if !raw.starts_with('{') {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!("Invalid {}.", kind.property_type()),
        ));
    }
    if !raw.ends_with('}') {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Value missing closing brace '}'.",
        ));
    }
    if raw.len() < 3 {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty property name."));
    }

    let target = &raw[1..raw.len() - 1];
    if !PropertyName::is_valid_text(target) {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid property name."));
    }

    validate_target_property(catalog, property, target, kind.property_type(), rule)?;

    Ok(CanonicalForm {
        value: target.to_owned(),
        raw_value: Some(raw.to_owned()),
        value_kind: RuleValueKind::String,
        extra_info: None,
        is_relative: true,
    })
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

/// Validates a `Between`/`Outside` range over two numeric bounds.
fn range(request: &RuleRequest, kind: NumericKind) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;
    let (lower, upper) = range_elements(rule, &request.value)?;

    if !lower.is_number() || !upper.is_number() {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!(
                "Both values must be of the same type 'Json.Number' representing valid {} values.",
                kind.property_type()
            ),
        ));
    }

    let inverted = match kind {
        NumericKind::Int => {
            let lower_bound = int_bound(rule, lower, "lower bound")?;
            let upper_bound = int_bound(rule, upper, "upper bound")?;
            lower_bound >= upper_bound
        }
        NumericKind::Float => {
            let lower_bound = float_bound(rule, lower, "lower bound")?;
            let upper_bound = float_bound(rule, upper, "upper bound")?;
            lower_bound >= upper_bound
        }
    };

    if inverted {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Lower bound cannot be equal to or greater than Upper bound.",
        ));
    }

    let bound_text = |value: &serde_json::Value| {
        kind.literal_text(value).unwrap_or_default()
    };

    Ok(CanonicalForm {
        value: bound_text(lower),
        raw_value: Some(request.value.to_string()),
        value_kind: RuleValueKind::Range,
        extra_info: Some(bound_text(upper)),
        is_relative: false,
    })
}

/// Reads an integer range bound.
fn int_bound(rule: &RuleName, value: &serde_json::Value, bound: &str) -> Result<i64, ErrorDetail> {
    value.as_i64().ok_or_else(|| {
        rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid Int ({bound})."))
    })
}

/// Reads a float range bound.
fn float_bound(rule: &RuleName, value: &serde_json::Value, bound: &str) -> Result<f64, ErrorDetail> {
    value.as_f64().ok_or_else(|| {
        rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("Invalid Float ({bound})."))
    })
}
