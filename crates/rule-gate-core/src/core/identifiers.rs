// crates/rule-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Rule Gate Identifiers
// Description: Canonical name types for endpoints, properties, and rules.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the string-based names used throughout Rule Gate.
//! Names serialize transparently as strings. Grammar checks are exposed as
//! associated helpers and enforced at the administrative boundary rather than
//! inside the wrappers, so stored data round-trips unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Endpoint Names
// ============================================================================

/// Endpoint name identifying one validation schema.
///
/// Endpoint names are unique case-insensitively; [`EndpointName::normalized`]
/// yields the upper-invariant form used for uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointName(String);

impl EndpointName {
    /// Creates a new endpoint name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-invariant form used for case-insensitive uniqueness.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }

    /// Reports whether the text satisfies the endpoint name grammar
    /// (one or more ASCII letters, digits, `-`, or `.`).
    #[must_use]
    pub fn is_valid_text(text: &str) -> bool {
        !text.is_empty()
            && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EndpointName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EndpointName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Property Names
// ============================================================================

/// Property name within an endpoint schema.
///
/// Property names are unique case-sensitively per endpoint and double as the
/// lookup key for cross-property rule references.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyName(String);

impl PropertyName {
    /// Creates a new property name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reports whether the text satisfies the property name grammar
    /// (an ASCII letter or `_`, followed by ASCII letters, digits, or `_`).
    #[must_use]
    pub fn is_valid_text(text: &str) -> bool {
        let mut chars = text.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PropertyName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PropertyName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Rule Names
// ============================================================================

/// Rule name attached to a property constraint.
///
/// Rule names are unique case-insensitively per endpoint;
/// [`RuleName::normalized`] yields the upper-invariant form stored alongside
/// the canonical rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new rule name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-invariant form used for case-insensitive uniqueness.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RuleName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RuleName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for RuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
