// crates/rule-gate-core/src/core/failure.rs
// ============================================================================
// Module: Rule Gate Failures
// Description: Failure codes, structured error details, and validation results.
// Purpose: Provide the structured failure surface shared by authoring and evaluation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! User and configuration errors are never thrown: they accumulate as
//! [`ErrorDetail`] entries inside a [`FailureMap`] keyed by property name or
//! caller-supplied failure key. Request evaluation aggregates its outcome into
//! a [`ValidationResult`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Failure Codes
// ============================================================================

/// Stable failure codes carried by [`ErrorDetail`] entries.
pub mod codes {
    /// Rule value is empty or whitespace.
    pub const EMPTY_RULE_VALUE: &str = "EMPTY_RULE_VALUE";
    /// Rule value is malformed for the property type.
    pub const INVALID_RULE_VALUE: &str = "INVALID_RULE_VALUE";
    /// Rule operator is not supported for the property type.
    pub const INVALID_RULE_TYPE: &str = "INVALID_RULE_TYPE";
    /// Rule name is empty or whitespace.
    pub const EMPTY_RULE_NAME: &str = "EMPTY_RULE_NAME";
    /// Rule name collides case-insensitively within the endpoint.
    pub const DUPLICATE_RULE_NAME: &str = "DUPLICATE_RULE_NAME";

    /// Required property is absent from the request body.
    pub const PROPERTY_NOT_PRESENT: &str = "PROPERTY_NOT_PRESENT";
    /// Submitted value cannot be coerced into the declared property type.
    pub const INVALID_PROPERTY_TYPE: &str = "INVALID_PROPERTY_TYPE";
    /// Property name is empty or whitespace.
    pub const EMPTY_PROPERTY_NAME: &str = "EMPTY_PROPERTY_NAME";
    /// Property name violates the property name grammar.
    pub const INVALID_PROPERTY_NAME: &str = "INVALID_PROPERTY_NAME";
    /// Property name collides case-sensitively within the endpoint.
    pub const DUPLICATE_PROPERTY_NAME: &str = "DUPLICATE_PROPERTY_NAME";

    /// Endpoint name is empty or whitespace.
    pub const EMPTY_ENDPOINT_NAME: &str = "EMPTY_ENDPOINT_NAME";
    /// Endpoint name violates the endpoint name grammar.
    pub const INVALID_ENDPOINT_NAME: &str = "INVALID_ENDPOINT_NAME";
    /// Endpoint name collides case-insensitively.
    pub const DUPLICATE_ENDPOINT_NAME: &str = "DUPLICATE_ENDPOINT_NAME";
}

// ============================================================================
// SECTION: Error Details
// ============================================================================

/// Structured failure entry with a stable code and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable failure code (or the failing rule's name for evaluation
    /// failures).
    pub code: String,
    /// User-facing failure message.
    pub message: String,
}

impl ErrorDetail {
    /// Creates a new error detail.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Failure Map
// ============================================================================

/// Ordered collection of failures keyed by property name or failure key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureMap {
    /// Failure entries per key, in insertion order per key.
    entries: BTreeMap<String, Vec<ErrorDetail>>,
}

impl FailureMap {
    /// Creates an empty failure map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure entry under the given key.
    pub fn append(&mut self, key: &str, code: &str, message: impl Into<String>) {
        self.push(key, ErrorDetail::new(code, message));
    }

    /// Appends a prebuilt failure entry under the given key.
    pub fn push(&mut self, key: &str, detail: ErrorDetail) {
        self.entries.entry(key.to_string()).or_default().push(detail);
    }

    /// Reports whether no failures have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of keys with recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the failures recorded under a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[ErrorDetail]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterates over keys and their failure entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ErrorDetail])> {
        self.entries.iter().map(|(key, details)| (key.as_str(), details.as_slice()))
    }

    /// Consumes the map and returns the underlying entries.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<ErrorDetail>> {
        self.entries
    }
}

// ============================================================================
// SECTION: Validation Results
// ============================================================================

/// Terminal status of one request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Every applied rule was satisfied.
    Success,
    /// At least one rule failed.
    Failure,
}

/// Aggregated outcome of validating one request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Terminal validation status.
    pub status: ValidationStatus,
    /// Number of properties coerced and considered.
    pub processed_properties: usize,
    /// Number of rules applied across those properties.
    pub applied_rules: usize,
    /// Rule failures keyed by property name; empty on success.
    pub failures: FailureMap,
}

impl ValidationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(processed_properties: usize, applied_rules: usize) -> Self {
        Self {
            status: ValidationStatus::Success,
            processed_properties,
            applied_rules,
            failures: FailureMap::new(),
        }
    }

    /// Creates a failed result carrying the recorded failures.
    #[must_use]
    pub const fn failure(
        processed_properties: usize,
        applied_rules: usize,
        failures: FailureMap,
    ) -> Self {
        Self {
            status: ValidationStatus::Failure,
            processed_properties,
            applied_rules,
            failures,
        }
    }
}
