// crates/rule-gate-core/src/authoring/mod.rs
// ============================================================================
// Module: Rule Gate Authoring
// Description: Authoring-time validation of raw rules into canonical form.
// Purpose: Parse the rule-value grammar per property type and record structured failures.
// Dependencies: crate::core, serde_json, time
// ============================================================================

//! ## Overview
//! [`RuleAuthoring`] validates raw rule tuples against one property at a time
//! and produces canonical [`Rule`] records. Each rule resolves independently:
//! a failing rule records an [`ErrorDetail`] and processing continues with
//! the next rule. A property's rule list is returned only when the shared
//! failure map is clean; otherwise the caller inspects the map.
//!
//! The `now` snapshot is captured once per authoring call and reused for
//! every dynamic bound, keeping range-inversion checks deterministic within
//! the call.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod names;
pub(crate) mod numeric;
pub(crate) mod strings;
pub(crate) mod temporal;
pub(crate) mod token;

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::OffsetDateTime;
use time::Time;

use crate::core::ErrorDetail;
use crate::core::FailureMap;
use crate::core::PropertyCatalog;
use crate::core::PropertyName;
use crate::core::PropertyType;
use crate::core::Rule;
use crate::core::RuleName;
use crate::core::RuleRequest;
use crate::core::RuleValueKind;
use crate::core::codes;
use crate::core::property::json_kind_name;

pub use names::RuleNameValidator;

// ============================================================================
// SECTION: Rule Authoring
// ============================================================================

/// Authoring-time rule validator for one endpoint's properties.
pub struct RuleAuthoring<'a> {
    /// Sibling property catalog for cross-property reference checks.
    catalog: &'a PropertyCatalog,
    /// Snapshot of the current instant, captured once per authoring call.
    now: OffsetDateTime,
    /// Structured failures keyed by caller-supplied failure key.
    failures: FailureMap,
}

impl<'a> RuleAuthoring<'a> {
    /// Creates a new authoring validator over the full property catalog.
    #[must_use]
    pub fn new(catalog: &'a PropertyCatalog, now: OffsetDateTime) -> Self {
        Self {
            catalog,
            now,
            failures: FailureMap::new(),
        }
    }

    /// Reports whether no failures have been recorded so far.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failures recorded so far.
    #[must_use]
    pub const fn failures(&self) -> &FailureMap {
        &self.failures
    }

    /// Consumes the validator and returns the recorded failures.
    #[must_use]
    pub fn into_failures(self) -> FailureMap {
        self.failures
    }

    /// Validates one property's rules, returning canonical rules only when
    /// the whole validator is failure-free.
    pub fn validate(
        &mut self,
        failure_key: &str,
        property: &PropertyName,
        property_type: PropertyType,
        rules: &[RuleRequest],
    ) -> Option<Vec<Rule>> {
        let mut validated = Vec::with_capacity(rules.len());

        for request in rules {
            let outcome = match property_type {
                PropertyType::String => strings::author_rule(self.catalog, property, request),
                PropertyType::Int => {
                    numeric::author_rule(self.catalog, property, request, numeric::NumericKind::Int)
                }
                PropertyType::Float => numeric::author_rule(
                    self.catalog,
                    property,
                    request,
                    numeric::NumericKind::Float,
                ),
                PropertyType::DateTime => temporal::author_rule::<OffsetDateTime>(
                    self.catalog,
                    self.now,
                    property,
                    request,
                ),
                PropertyType::DateOnly => {
                    temporal::author_rule::<Date>(self.catalog, self.now, property, request)
                }
                PropertyType::TimeOnly => {
                    temporal::author_rule::<Time>(self.catalog, self.now, property, request)
                }
            };

            match outcome {
                Ok(form) => validated.push(form.into_rule(request)),
                Err(detail) => self.failures.push(failure_key, detail),
            }
        }

        self.failures.is_empty().then_some(validated)
    }
}

// ============================================================================
// SECTION: Canonical Form
// ============================================================================

/// Canonical value tuple produced by one successfully validated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CanonicalForm {
    /// Canonical rule value.
    pub(crate) value: String,
    /// Authored syntax, retained when it differs from the canonical value.
    pub(crate) raw_value: Option<String>,
    /// Kind of the canonical value.
    pub(crate) value_kind: RuleValueKind,
    /// Secondary tag (modifier, offset, or range upper bound).
    pub(crate) extra_info: Option<String>,
    /// Indicates whether the value names a sibling property.
    pub(crate) is_relative: bool,
}

impl CanonicalForm {
    /// Combines the canonical tuple with its originating request into a
    /// persisted rule.
    pub(crate) fn into_rule(self, request: &RuleRequest) -> Rule {
        Rule {
            name: request.name.clone(),
            normalized_name: request.name.normalized(),
            rule_type: request.rule_type,
            value: self.value,
            raw_value: self.raw_value,
            value_kind: self.value_kind,
            extra_info: self.extra_info,
            is_relative: self.is_relative,
            error_message: request.error_message.clone(),
        }
    }
}

// ============================================================================
// SECTION: Shared Failure Helpers
// ============================================================================

/// Builds a rule-scoped failure detail with the `[RuleName]` message prefix.
pub(crate) fn rule_failure(code: &str, rule: &RuleName, message: &str) -> ErrorDetail {
    ErrorDetail::new(code, format!("[{rule}] {message}"))
}

/// Builds the mismatched-JSON-kind failure shared by every validator.
pub(crate) fn invalid_value_kind(
    rule: &RuleName,
    expected: &str,
    value: &serde_json::Value,
) -> ErrorDetail {
    rule_failure(
        codes::INVALID_RULE_VALUE,
        rule,
        &format!(
            "Value must be one of the following types: {expected}; got: {}.",
            json_kind_name(value)
        ),
    )
}

/// Extracts the two elements of a range value array.
pub(crate) fn range_elements<'v>(
    rule: &RuleName,
    value: &'v serde_json::Value,
) -> Result<(&'v serde_json::Value, &'v serde_json::Value), ErrorDetail> {
    let Some(items) = value.as_array() else {
        return Err(invalid_value_kind(rule, "Array", value));
    };
    if let [lower, upper] = items.as_slice() {
        return Ok((lower, upper));
    }
    Err(rule_failure(
        codes::INVALID_RULE_VALUE,
        rule,
        &format!("Array must contain 2 elements; got: {}.", items.len()),
    ))
}

/// Validates a cross-property reference target against the catalog.
pub(crate) fn validate_target_property(
    catalog: &PropertyCatalog,
    source: &PropertyName,
    target: &str,
    expected_type: PropertyType,
    rule: &RuleName,
) -> Result<(), ErrorDetail> {
    if source.as_str() == target {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            "Rule must not reference its own property.",
        ));
    }

    let Some(descriptor) = catalog.get(target) else {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!("Target property '{target}' not found (case-sensitive)."),
        ));
    };

    if descriptor.property_type != expected_type {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!("Target property '{target}' must be of the same type ({expected_type})."),
        ));
    }

    if descriptor.is_optional {
        return Err(rule_failure(
            codes::INVALID_RULE_VALUE,
            rule,
            &format!("Target property '{target}' must not be optional."),
        ));
    }

    Ok(())
}
