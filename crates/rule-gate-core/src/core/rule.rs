// crates/rule-gate-core/src/core/rule.rs
// ============================================================================
// Module: Rule Gate Canonical Rules
// Description: Rule types, authoring requests, and the canonical rule record.
// Purpose: Define the persistable constraint form shared by authoring and evaluation.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Rule`] is the canonical, persisted form of one property constraint.
//! Authoring produces it from a raw [`RuleRequest`]; evaluation consumes it
//! unmodified. The `value`/`raw_value`/`value_kind`/`extra_info`/`is_relative`
//! tuple fully encodes the constraint:
//!
//! - `is_relative == true` means `value` names a sibling property rather than
//!   holding a literal.
//! - `value_kind == Range` means `value` is the lower bound and `extra_info`
//!   the upper bound, each possibly `now`-prefixed for temporal properties.
//! - For comparison rules, `extra_info` carries a secondary tag: a string
//!   comparison modifier ([`extra::BY_LENGTH`], [`extra::CASE_INSENSITIVE`])
//!   or a temporal offset span.
//! - `raw_value` is present only when the authored syntax differs from the
//!   canonical `value` (escaped literal, offset-qualified token,
//!   case-insensitive literal, range array); it is kept for display and for
//!   rename propagation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RuleName;

// ============================================================================
// SECTION: Rule Types
// ============================================================================

/// Constraint operator attached to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleType {
    /// Actual value must order strictly below the expected value.
    #[serde(rename = "<")]
    Less,
    /// Actual value must order strictly above the expected value.
    #[serde(rename = ">")]
    More,
    /// Actual value must order at or below the expected value.
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Actual value must order at or above the expected value.
    #[serde(rename = ">=")]
    MoreOrEqual,
    /// Actual value must equal the expected value.
    #[serde(rename = "==")]
    Equal,
    /// Actual value must not equal the expected value.
    #[serde(rename = "!=")]
    NotEqual,
    /// Actual value must fall inside an inclusive range.
    #[serde(rename = "between")]
    Between,
    /// Actual value must fall outside an inclusive range.
    #[serde(rename = "outside")]
    Outside,
    /// Actual string must match a regular expression (String only).
    #[serde(rename = "regex")]
    Regex,
    /// Actual string must look like an email address (String only).
    #[serde(rename = "email")]
    Email,
}

impl RuleType {
    /// Reports whether this operator is one of the six relational comparisons.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::More
                | Self::LessOrEqual
                | Self::MoreOrEqual
                | Self::Equal
                | Self::NotEqual
        )
    }

    /// Reports whether this operator takes a two-element range value.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Between | Self::Outside)
    }
}

/// Kind of the canonical rule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleValueKind {
    /// Canonical value is an integer literal.
    Int,
    /// Canonical value is a floating point literal.
    Float,
    /// Canonical value is a string literal, token target, or temporal text.
    String,
    /// Canonical value/extra-info pair encodes a range's bounds.
    Range,
}

// ============================================================================
// SECTION: Extra-Info Tags and Placeholders
// ============================================================================

/// Secondary comparison tags stored in a rule's `extra_info`.
pub mod extra {
    /// Compare string lengths instead of string contents.
    pub const BY_LENGTH: &str = "ByLength";
    /// Compare strings case-insensitively.
    pub const CASE_INSENSITIVE: &str = "CaseI";
}

/// Placeholder tokens replaced inside user error-message templates.
pub mod placeholders {
    /// Expected value.
    pub const VALUE: &str = "{value}";
    /// Expected range lower bound.
    pub const VALUE1: &str = "{value1}";
    /// Expected range upper bound.
    pub const VALUE2: &str = "{value2}";
    /// Submitted value (or its length for length comparisons).
    pub const ACTUAL_VALUE: &str = "{actualValue}";
}

/// Canonical keyword for the dynamic "current instant" token.
pub const NOW: &str = "now";

// ============================================================================
// SECTION: Authoring Requests
// ============================================================================

/// Raw rule tuple submitted at authoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRequest {
    /// Rule name, unique case-insensitively per endpoint.
    pub name: RuleName,
    /// Constraint operator.
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Raw JSON rule value in the per-type grammar.
    pub value: serde_json::Value,
    /// Optional user error-message template with placeholder tokens.
    #[serde(default)]
    pub error_message: Option<String>,
}

// ============================================================================
// SECTION: Canonical Rules
// ============================================================================

/// Canonical, persisted property constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name as authored.
    pub name: RuleName,
    /// Upper-invariant rule name, unique per endpoint.
    pub normalized_name: String,
    /// Constraint operator.
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Canonical rule value (literal, sibling property name, temporal token,
    /// or range lower bound).
    pub value: String,
    /// Authored syntax when it differs from the canonical `value`.
    #[serde(default)]
    pub raw_value: Option<String>,
    /// Kind of the canonical value.
    pub value_kind: RuleValueKind,
    /// Secondary tag: comparison modifier, temporal offset, or range upper
    /// bound, depending on the operator.
    #[serde(default)]
    pub extra_info: Option<String>,
    /// Indicates whether `value` names a sibling property.
    pub is_relative: bool,
    /// Optional user error-message template.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Rule {
    /// Returns the display form of the expected value for error messages,
    /// preferring the authored syntax when it was retained.
    #[must_use]
    pub fn display_value(&self) -> &str {
        self.raw_value.as_deref().unwrap_or(&self.value)
    }
}
