// crates/rule-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Rule Gate Interfaces
// Description: Backend-agnostic storage interfaces for schemas and rules.
// Purpose: Define the contract surfaces used by the Rule Gate runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Rule Gate integrates with persistence without
//! embedding backend-specific details. Implementations must be deterministic;
//! the engine loads full catalogs up front because cross-property reference
//! checks are never lazy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::EndpointName;
use crate::core::PropertyCatalog;
use crate::core::PropertyDescriptor;
use crate::core::PropertyName;
use crate::core::Rule;
use crate::core::RuleName;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Schema store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("schema store io error: {0}")]
    Io(String),
    /// Requested record does not exist.
    #[error("schema store record not found: {0}")]
    NotFound(String),
    /// Record creation collides with an existing record.
    #[error("schema store conflict: {0}")]
    Conflict(String),
    /// Store data is invalid.
    #[error("schema store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Endpoint Store
// ============================================================================

/// Endpoint persistence boundary.
pub trait EndpointStore {
    /// Reports whether an endpoint exists, matching case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn endpoint_exists(&self, endpoint: &EndpointName) -> Result<bool, StoreError>;

    /// Creates an empty endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the name is already taken
    /// case-insensitively.
    fn create_endpoint(&self, endpoint: &EndpointName) -> Result<(), StoreError>;

    /// Renames an endpoint, preserving its properties and rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the endpoint is missing or the new name
    /// collides.
    fn rename_endpoint(
        &self,
        endpoint: &EndpointName,
        new_name: &EndpointName,
    ) -> Result<(), StoreError>;

    /// Deletes an endpoint and everything attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the endpoint is missing.
    fn delete_endpoint(&self, endpoint: &EndpointName) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Property Store
// ============================================================================

/// Property persistence boundary.
pub trait PropertyStore {
    /// Loads the full property catalog of an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the endpoint is missing.
    fn properties(&self, endpoint: &EndpointName) -> Result<PropertyCatalog, StoreError>;

    /// Inserts a property into an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the endpoint is missing or the property
    /// name is already taken case-sensitively.
    fn insert_property(
        &self,
        endpoint: &EndpointName,
        descriptor: &PropertyDescriptor,
    ) -> Result<(), StoreError>;

    /// Renames a property, keeping its rules attached.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the property is missing or the new name
    /// collides.
    fn rename_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        new_name: &PropertyName,
    ) -> Result<(), StoreError>;

    /// Updates a property's optionality flag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the property is missing.
    fn set_property_optionality(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        is_optional: bool,
    ) -> Result<(), StoreError>;

    /// Deletes a property and its own rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the property is missing.
    fn delete_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Rule Store
// ============================================================================

/// Rule persistence boundary.
pub trait RuleStore {
    /// Loads every rule of an endpoint, grouped by owning property.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the endpoint is missing.
    fn endpoint_rules(
        &self,
        endpoint: &EndpointName,
    ) -> Result<BTreeMap<PropertyName, Vec<Rule>>, StoreError>;

    /// Loads the rules attached to one property.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the property is missing.
    fn property_rules(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<Vec<Rule>, StoreError>;

    /// Appends canonical rules to a property.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the property is missing.
    fn insert_rules(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        rules: &[Rule],
    ) -> Result<(), StoreError>;

    /// Renames a rule, updating its normalized form; the rule value is never
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the rule is missing or the new name
    /// collides case-insensitively.
    fn rename_rule(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        new_name: &RuleName,
    ) -> Result<(), StoreError>;

    /// Replaces a rule's error-message template.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the rule is missing.
    fn set_rule_error_message(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        message: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Deletes a rule.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the rule is missing.
    fn delete_rule(&self, endpoint: &EndpointName, rule: &RuleName) -> Result<(), StoreError>;

    /// Rewrites relative rules referencing `property` to reference
    /// `new_name`, updating both the canonical value and the retained raw
    /// syntax. Returns the number of rewritten rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the endpoint is missing.
    fn rewrite_rule_references(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        new_name: &PropertyName,
    ) -> Result<usize, StoreError>;
}
