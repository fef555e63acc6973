// crates/rule-gate-core/src/authoring/strings.rs
// ============================================================================
// Module: Rule Gate String Authoring
// Description: Authoring-time validation for String property rules.
// Purpose: Parse string rule values into canonical form, including modifiers and patterns.
// Dependencies: crate::authoring, crate::core, regex, serde_json
// ============================================================================

//! ## Overview
//! String comparisons accept literals, escaped literals (`\` prefix keeps the
//! remainder verbatim), case-insensitive literals (`i:` prefix), bare numbers
//! as length bounds, and sibling references with optional `.Length` /
//! `.case:i` modifiers. Ranges bound the string length with two integers.
//! `Regex` values must compile; `Email` takes no value at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::authoring::CanonicalForm;
use crate::authoring::invalid_value_kind;
use crate::authoring::range_elements;
use crate::authoring::rule_failure;
use crate::authoring::token;
use crate::authoring::token::StringOption;
use crate::authoring::token::TokenError;
use crate::authoring::validate_target_property;
use crate::core::ErrorDetail;
use crate::core::PropertyCatalog;
use crate::core::PropertyName;
use crate::core::PropertyType;
use crate::core::RuleRequest;
use crate::core::RuleType;
use crate::core::RuleValueKind;
use crate::core::codes;
use crate::core::extra;

// ============================================================================
// SECTION: Rule Dispatch
// ============================================================================

/// Validates one rule against a String property.
pub(crate) fn author_rule(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
) -> Result<CanonicalForm, ErrorDetail> {
    match request.rule_type {
        RuleType::Less
        | RuleType::More
        | RuleType::LessOrEqual
        | RuleType::MoreOrEqual
        | RuleType::Equal
        | RuleType::NotEqual => comparison(catalog, property, request),
        RuleType::Between | RuleType::Outside => length_range(request),
        RuleType::Regex => pattern(request),
        RuleType::Email => Ok(CanonicalForm {
            value: String::new(),
            raw_value: None,
            value_kind: RuleValueKind::String,
            extra_info: None,
            is_relative: false,
        }),
    }
}

// ============================================================================
// SECTION: Comparison Values
// ============================================================================

/// Validates a comparison rule value in the string grammar.
fn comparison(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    match &request.value {
        serde_json::Value::Number(_) => {
            let length_bound = request
                .value
                .as_i64()
                .filter(|value| i32::try_from(*value).is_ok())
                .ok_or_else(|| {
                    rule_failure(
                        codes::INVALID_RULE_VALUE,
                        rule,
                        "Value is not a valid Number (Int32).",
                    )
                })?;
            Ok(CanonicalForm {
                value: length_bound.to_string(),
                raw_value: None,
                value_kind: RuleValueKind::Int,
                extra_info: Some(extra::BY_LENGTH.to_owned()),
                is_relative: false,
            })
        }
        serde_json::Value::String(raw) => comparison_text(catalog, property, request, raw),
        other => Err(invalid_value_kind(rule, "Number, String", other)),
    }
}

/// Validates the string-typed comparison forms: escaped, relative,
/// case-insensitive, and plain literals.
fn comparison_text(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
    raw: &str,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    if raw.trim().is_empty() {
        return Err(rule_failure(codes::EMPTY_RULE_VALUE, rule, "Value is required."));
    }

    if let Some(rest) = raw.strip_prefix('\\') {
        if rest.is_empty() {
            return Err(rule_failure(codes::EMPTY_RULE_VALUE, rule, "Empty value."));
        }
        return Ok(CanonicalForm {
            value: rest.to_owned(),
            raw_value: Some(raw.to_owned()),
            value_kind: RuleValueKind::String,
            extra_info: None,
            is_relative: false,
        });
    }

    if raw.starts_with('{') {
        return relative_reference(catalog, property, request, raw);
    }

    if raw.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("i:")) {
        let rest = &raw[2..];
        if rest.is_empty() {
            return Err(rule_failure(
                codes::INVALID_RULE_VALUE,
                rule,
                "No value provided after the case-insensitive option. \
                 Consider prepending '\\' for exact comparison.",
            ));
        }
        return Ok(CanonicalForm {
            value: rest.to_owned(),
            raw_value: Some(raw.to_owned()),
            value_kind: RuleValueKind::String,
            extra_info: Some(extra::CASE_INSENSITIVE.to_owned()),
            is_relative: false,
        });
    }

    Ok(CanonicalForm {
        value: raw.to_owned(),
        raw_value: None,
        value_kind: RuleValueKind::String,
        extra_info: None,
        is_relative: false,
    })
}

/// Validates a `{Property}` / `{Property.option}` sibling reference.
fn relative_reference(
    catalog: &PropertyCatalog,
    property: &PropertyName,
    request: &RuleRequest,
    raw: &str,
) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    let parsed = token::property_option_token(raw).map_err(|error| match error {
        TokenError::UnterminatedBrace => rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Value missing closing brace '}'. Consider prepending '\\' for the exact comparison.",
        ),
        TokenError::EmptyPropertyName => {
            rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty property name.")
        }
        TokenError::InvalidOption => rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Invalid rule-option. Allowed options for 'String' property: '.Length', '.case:i'.",
        ),
        _ => rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid property name."),
    })?;

    validate_target_property(catalog, property, parsed.name, PropertyType::String, rule)?;

    let extra_info = parsed.option.map(|option| match option {
        StringOption::ByLength => extra::BY_LENGTH.to_owned(),
        StringOption::CaseInsensitive => extra::CASE_INSENSITIVE.to_owned(),
    });

    Ok(CanonicalForm {
        value: parsed.name.to_owned(),
        raw_value: Some(raw.to_owned()),
        value_kind: RuleValueKind::String,
        extra_info,
        is_relative: true,
    })
}

// ============================================================================
// SECTION: Length Ranges
// ============================================================================

/// Validates a `Between`/`Outside` length range over two integer bounds.
fn length_range(request: &RuleRequest) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;
    let (lower, upper) = range_elements(rule, &request.value)?;

    if !lower.is_number() || !upper.is_number() {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Both values must be of the same type 'Json.Number' representing valid Int32 values.",
        ));
    }

    let lower_bound = int32_bound(lower)
        .ok_or_else(|| rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid Int32 (lower bound)."))?;
    let upper_bound = int32_bound(upper)
        .ok_or_else(|| rule_failure(codes::INVALID_RULE_VALUE, rule, "Invalid Int32 (upper bound)."))?;

    if lower_bound >= upper_bound {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Lower bound cannot be equal to or greater than Upper bound.",
        ));
    }

    Ok(CanonicalForm {
        value: lower_bound.to_string(),
        raw_value: Some(request.value.to_string()),
        value_kind: RuleValueKind::Range,
        extra_info: Some(upper_bound.to_string()),
        is_relative: false,
    })
}

/// Reads a JSON number as an `i32`-representable bound.
fn int32_bound(value: &serde_json::Value) -> Option<i64> {
    value.as_i64().filter(|bound| i32::try_from(*bound).is_ok())
}

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Validates a `Regex` rule value by compiling the pattern.
fn pattern(request: &RuleRequest) -> Result<CanonicalForm, ErrorDetail> {
    let rule = &request.name;

    let Some(raw) = request.value.as_str() else {
        return Err(invalid_value_kind(rule, "String", &request.value));
    };
    if raw.trim().is_empty() {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, "Empty Regex expression."));
    }

    if let Err(error) = Regex::new(raw) {
        return Err(rule_failure(codes::INVALID_RULE_VALUE, rule, &format!("{error}.")));
    }

    Ok(CanonicalForm {
        value: raw.to_owned(),
        raw_value: None,
        value_kind: RuleValueKind::String,
        extra_info: None,
        is_relative: false,
    })
}
