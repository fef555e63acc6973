// crates/rule-gate-core/src/authoring/names.rs
// ============================================================================
// Module: Rule Gate Rule-Name Pre-Pass
// Description: Shared rule-name validation run before value validation.
// Purpose: Enforce non-empty, endpoint-unique rule names across authoring calls.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Every authoring path runs this pre-pass before any per-type value
//! validation. The duplicate set lives in the validator instance, so one
//! validator spans every property of an authoring call and enforces
//! case-insensitive uniqueness at endpoint scope. On the first violation for
//! a property the pass stops checking that property's remaining names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use crate::core::FailureMap;
use crate::core::RuleRequest;
use crate::core::codes;

// ============================================================================
// SECTION: Rule Name Validator
// ============================================================================

/// Rule-name pre-pass with endpoint-scoped duplicate tracking.
#[derive(Debug, Default)]
pub struct RuleNameValidator {
    /// Upper-invariant names seen so far in this authoring call.
    seen: HashSet<String>,
}

impl RuleNameValidator {
    /// Creates a new validator with an empty duplicate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the rule names of one property, appending failures under the
    /// given key and stopping at the first violation.
    pub fn validate(&mut self, failure_key: &str, rules: &[RuleRequest], failures: &mut FailureMap) {
        for rule in rules {
            if rule.name.as_str().trim().is_empty() {
                failures.append(failure_key, codes::EMPTY_RULE_NAME, "Rule names must not be empty.");
                break;
            }
            if !self.seen.insert(rule.name.normalized()) {
                failures.append(
                    failure_key,
                    codes::DUPLICATE_RULE_NAME,
                    format!(
                        "Rule names must be unique per endpoint (case-insensitive). Specifically '{}'.",
                        rule.name
                    ),
                );
                break;
            }
        }
    }
}
