// crates/rule-gate-core/src/runtime/control.rs
// ============================================================================
// Module: Rule Gate Endpoint Control
// Description: Administrative operations over endpoint schemas and rules.
// Purpose: Create, rename, and delete schema records while preserving rule integrity.
// Dependencies: crate::{authoring, core, interfaces}
// ============================================================================

//! ## Overview
//! `EndpointControl` is the single administrative path over the store traits.
//! All mutations validate before persisting: names against their grammars,
//! rules through the authoring validator with the full sibling catalog.
//! Renaming a property rewrites referencing rules; deleting or loosening a
//! property is blocked while other properties' relative rules depend on it.
//! Mutations return a receipt carrying the endpoint's canonical schema
//! digest for drift detection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::authoring::RuleAuthoring;
use crate::authoring::RuleNameValidator;
use crate::core::DEFAULT_HASH_ALGORITHM;
use crate::core::EndpointName;
use crate::core::FailureMap;
use crate::core::HashDigest;
use crate::core::HashError;
use crate::core::PropertyCatalog;
use crate::core::PropertyDescriptor;
use crate::core::PropertyName;
use crate::core::PropertySpec;
use crate::core::Rule;
use crate::core::RuleName;
use crate::core::RuleRequest;
use crate::core::codes;
use crate::core::hashing::hash_canonical_json;
use crate::interfaces::EndpointStore;
use crate::interfaces::PropertyStore;
use crate::interfaces::RuleStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors and Receipts
// ============================================================================

/// Administrative operation errors.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Requested endpoint does not exist.
    #[error("endpoint '{0}' does not exist")]
    UnknownEndpoint(String),
    /// Requested property does not exist.
    #[error("property '{0}' does not exist")]
    UnknownProperty(String),
    /// Name collides with an existing record.
    #[error("{0}")]
    Conflict(String),
    /// Property is referenced by other properties' relative rules.
    #[error("property '{0}' is referenced by relative rules of other properties")]
    PropertyReferenced(String),
    /// Structured validation failures were recorded.
    #[error("validation failed for {} key(s)", .0.len())]
    Validation(FailureMap),
    /// Canonical schema hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// Underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Receipt returned by successful administrative mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlReceipt {
    /// Endpoint the mutation applied to.
    pub endpoint: EndpointName,
    /// Canonical digest of the endpoint schema after the mutation.
    pub schema_digest: HashDigest,
}

/// Serializable endpoint snapshot hashed into schema digests.
#[derive(Debug, Serialize)]
struct EndpointSnapshot<'a> {
    /// Endpoint name.
    endpoint: &'a EndpointName,
    /// Properties in catalog order.
    properties: Vec<PropertySnapshot<'a>>,
}

/// One property with its rules inside a schema snapshot.
#[derive(Debug, Serialize)]
struct PropertySnapshot<'a> {
    /// Property descriptor.
    descriptor: &'a PropertyDescriptor,
    /// Canonical rules attached to the property.
    rules: &'a [Rule],
}

// ============================================================================
// SECTION: Endpoint Control
// ============================================================================

/// Store-backed administrative control surface.
pub struct EndpointControl<S> {
    /// Backing schema store.
    store: S,
}

impl<S> EndpointControl<S>
where
    S: EndpointStore + PropertyStore + RuleStore,
{
    /// Creates a new control surface over the given store.
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Creates an endpoint with its properties and authored rules. Nothing is
    /// persisted unless every name and every rule validates.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Validation`] with structured failures,
    /// [`ControlError::Conflict`] on name collisions, and store errors.
    pub fn create_endpoint(
        &self,
        endpoint: &EndpointName,
        properties: &[PropertySpec],
        now: OffsetDateTime,
    ) -> Result<ControlReceipt, ControlError> {
        let mut failures = FailureMap::new();
        validate_endpoint_name(endpoint, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }
        if self.store.endpoint_exists(endpoint)? {
            return Err(ControlError::Conflict(format!(
                "Endpoint '{endpoint}' already exists (case-insensitive)."
            )));
        }

        let mut seen = BTreeSet::new();
        for property in properties {
            validate_property_name(&property.name, &mut failures);
            if !seen.insert(property.name.clone()) {
                failures.append(
                    property.name.as_str(),
                    codes::DUPLICATE_PROPERTY_NAME,
                    format!(
                        "Property names must be unique per endpoint (case-sensitive). \
                         Specifically '{}'.",
                        property.name
                    ),
                );
            }
        }

        let mut names = RuleNameValidator::new();
        for property in properties {
            names.validate(property.name.as_str(), &property.rules, &mut failures);
        }
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }

        let catalog: PropertyCatalog = properties
            .iter()
            .map(|property| (property.name.clone(), property.descriptor()))
            .collect();

        let mut authoring = RuleAuthoring::new(&catalog, now);
        let mut authored: Vec<(PropertyName, Vec<Rule>)> = Vec::with_capacity(properties.len());
        for property in properties {
            let validated = authoring.validate(
                property.name.as_str(),
                &property.name,
                property.property_type,
                &property.rules,
            );
            if let Some(rules) = validated {
                authored.push((property.name.clone(), rules));
            }
        }
        if !authoring.is_valid() {
            return Err(ControlError::Validation(authoring.into_failures()));
        }

        self.store.create_endpoint(endpoint)?;
        for property in properties {
            self.store.insert_property(endpoint, &property.descriptor())?;
        }
        for (property, rules) in &authored {
            if !rules.is_empty() {
                self.store.insert_rules(endpoint, property, rules)?;
            }
        }

        self.receipt(endpoint)
    }

    /// Adds a property (and its rules) to an existing endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the endpoint is missing, the name
    /// collides, or validation fails.
    pub fn add_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertySpec,
        now: OffsetDateTime,
    ) -> Result<ControlReceipt, ControlError> {
        let catalog = self.require_endpoint(endpoint)?;

        let mut failures = FailureMap::new();
        validate_property_name(&property.name, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }
        if catalog.contains_key(&property.name) {
            return Err(ControlError::Conflict(format!(
                "Property with the name '{}' already exists (case-sensitive).",
                property.name
            )));
        }

        self.check_rule_name_collisions(endpoint, &property.rules)?;

        let mut names = RuleNameValidator::new();
        names.validate(property.name.as_str(), &property.rules, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }

        let mut catalog = catalog;
        catalog.insert(property.name.clone(), property.descriptor());

        let mut authoring = RuleAuthoring::new(&catalog, now);
        let validated = authoring.validate(
            property.name.as_str(),
            &property.name,
            property.property_type,
            &property.rules,
        );
        let Some(rules) = validated else {
            return Err(ControlError::Validation(authoring.into_failures()));
        };

        self.store.insert_property(endpoint, &property.descriptor())?;
        if !rules.is_empty() {
            self.store.insert_rules(endpoint, &property.name, &rules)?;
        }

        self.receipt(endpoint)
    }

    /// Adds rules to an existing property.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the endpoint or property is missing, a
    /// rule name collides with existing rules, or validation fails.
    pub fn add_rules(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        rules: &[RuleRequest],
        now: OffsetDateTime,
    ) -> Result<ControlReceipt, ControlError> {
        let catalog = self.require_endpoint(endpoint)?;
        let Some(descriptor) = catalog.get(property).cloned() else {
            return Err(ControlError::UnknownProperty(property.as_str().to_owned()));
        };

        self.check_rule_name_collisions(endpoint, rules)?;

        let mut failures = FailureMap::new();
        let mut names = RuleNameValidator::new();
        names.validate(property.as_str(), rules, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }

        let mut authoring = RuleAuthoring::new(&catalog, now);
        let validated =
            authoring.validate(property.as_str(), property, descriptor.property_type, rules);
        let Some(validated_rules) = validated else {
            return Err(ControlError::Validation(authoring.into_failures()));
        };

        if !validated_rules.is_empty() {
            self.store.insert_rules(endpoint, property, &validated_rules)?;
        }

        self.receipt(endpoint)
    }

    /// Renames an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the endpoint is missing or the new name
    /// is invalid or taken.
    pub fn rename_endpoint(
        &self,
        endpoint: &EndpointName,
        new_name: &EndpointName,
    ) -> Result<ControlReceipt, ControlError> {
        let mut failures = FailureMap::new();
        validate_endpoint_name(new_name, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }
        if !self.store.endpoint_exists(endpoint)? {
            return Err(ControlError::UnknownEndpoint(endpoint.as_str().to_owned()));
        }
        if endpoint.normalized() != new_name.normalized() && self.store.endpoint_exists(new_name)? {
            return Err(ControlError::Conflict(format!(
                "Endpoint '{new_name}' already exists (case-insensitive)."
            )));
        }
        self.store.rename_endpoint(endpoint, new_name)?;
        self.receipt(new_name)
    }

    /// Renames a property and rewrites the rules that reference it.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the property is missing or the new name
    /// is invalid or taken.
    pub fn rename_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        new_name: &PropertyName,
    ) -> Result<ControlReceipt, ControlError> {
        let catalog = self.require_endpoint(endpoint)?;
        if !catalog.contains_key(property) {
            return Err(ControlError::UnknownProperty(property.as_str().to_owned()));
        }

        let mut failures = FailureMap::new();
        validate_property_name(new_name, &mut failures);
        if !failures.is_empty() {
            return Err(ControlError::Validation(failures));
        }
        if catalog.contains_key(new_name) {
            return Err(ControlError::Conflict(format!(
                "Property with the name '{new_name}' already exists (case-sensitive)."
            )));
        }

        self.store.rename_property(endpoint, property, new_name)?;
        self.store.rewrite_rule_references(endpoint, property, new_name)?;
        self.receipt(endpoint)
    }

    /// Renames a rule; the rule's value is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the rule is missing or the new name is
    /// empty or taken case-insensitively.
    pub fn rename_rule(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        new_name: &RuleName,
    ) -> Result<ControlReceipt, ControlError> {
        if new_name.as_str().trim().is_empty() {
            let mut failures = FailureMap::new();
            failures.append(rule.as_str(), codes::EMPTY_RULE_NAME, "Rule names must not be empty.");
            return Err(ControlError::Validation(failures));
        }

        let normalized = new_name.normalized();
        if normalized != rule.normalized() {
            let rules = self.store.endpoint_rules(endpoint)?;
            let taken = rules
                .values()
                .flatten()
                .any(|existing| existing.normalized_name == normalized);
            if taken {
                return Err(ControlError::Conflict(format!(
                    "Rule with the name '{new_name}' already exists (case-insensitive)."
                )));
            }
        }

        self.store.rename_rule(endpoint, rule, new_name)?;
        self.receipt(endpoint)
    }

    /// Replaces a rule's error-message template.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Store`] when the rule is missing.
    pub fn update_rule_error_message(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        message: Option<&str>,
    ) -> Result<ControlReceipt, ControlError> {
        self.store.set_rule_error_message(endpoint, rule, message)?;
        self.receipt(endpoint)
    }

    /// Updates a property's optionality. Loosening a property is blocked
    /// while relative rules reference it, since those rules require the
    /// target to always be present.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::PropertyReferenced`] when loosening a
    /// referenced property, or store errors.
    pub fn set_property_optionality(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        is_optional: bool,
    ) -> Result<ControlReceipt, ControlError> {
        if is_optional && self.is_referenced(endpoint, property)? {
            return Err(ControlError::PropertyReferenced(property.as_str().to_owned()));
        }
        self.store.set_property_optionality(endpoint, property, is_optional)?;
        self.receipt(endpoint)
    }

    /// Deletes a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Store`] when the rule is missing.
    pub fn delete_rule(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
    ) -> Result<ControlReceipt, ControlError> {
        self.store.delete_rule(endpoint, rule)?;
        self.receipt(endpoint)
    }

    /// Deletes a property and its own rules. Deletion is blocked while other
    /// properties' relative rules reference the property.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::PropertyReferenced`] when referenced, or store
    /// errors.
    pub fn delete_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<ControlReceipt, ControlError> {
        if self.is_referenced(endpoint, property)? {
            return Err(ControlError::PropertyReferenced(property.as_str().to_owned()));
        }
        self.store.delete_property(endpoint, property)?;
        self.receipt(endpoint)
    }

    /// Deletes an endpoint with everything attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Store`] when the endpoint is missing.
    pub fn delete_endpoint(&self, endpoint: &EndpointName) -> Result<(), ControlError> {
        self.store.delete_endpoint(endpoint)?;
        Ok(())
    }

    /// Computes the canonical digest of an endpoint's schema.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when loading or hashing fails.
    pub fn schema_digest(&self, endpoint: &EndpointName) -> Result<HashDigest, ControlError> {
        let catalog = self.store.properties(endpoint)?;
        let rules = self.store.endpoint_rules(endpoint)?;

        let properties: Vec<PropertySnapshot<'_>> = catalog
            .values()
            .map(|descriptor| PropertySnapshot {
                descriptor,
                rules: rules.get(&descriptor.name).map_or(&[], Vec::as_slice),
            })
            .collect();
        let snapshot = EndpointSnapshot {
            endpoint,
            properties,
        };

        Ok(hash_canonical_json(DEFAULT_HASH_ALGORITHM, &snapshot)?)
    }

    /// Loads an endpoint's catalog, mapping a missing endpoint to
    /// [`ControlError::UnknownEndpoint`].
    fn require_endpoint(&self, endpoint: &EndpointName) -> Result<PropertyCatalog, ControlError> {
        if !self.store.endpoint_exists(endpoint)? {
            return Err(ControlError::UnknownEndpoint(endpoint.as_str().to_owned()));
        }
        Ok(self.store.properties(endpoint)?)
    }

    /// Rejects new rule names colliding with stored rules case-insensitively.
    fn check_rule_name_collisions(
        &self,
        endpoint: &EndpointName,
        rules: &[RuleRequest],
    ) -> Result<(), ControlError> {
        let stored = self.store.endpoint_rules(endpoint)?;
        let taken: BTreeSet<String> =
            stored.values().flatten().map(|rule| rule.normalized_name.clone()).collect();
        for request in rules {
            if taken.contains(&request.name.normalized()) {
                return Err(ControlError::Conflict(format!(
                    "Rule with the name '{}' already exists (case-insensitive).",
                    request.name
                )));
            }
        }
        Ok(())
    }

    /// Reports whether other properties hold relative rules referencing the
    /// property.
    fn is_referenced(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<bool, ControlError> {
        let rules = self.store.endpoint_rules(endpoint)?;
        Ok(rules.iter().any(|(owner, owned_rules)| {
            owner != property
                && owned_rules
                    .iter()
                    .any(|rule| rule.is_relative && rule.value == property.as_str())
        }))
    }

    /// Builds the mutation receipt for an endpoint.
    fn receipt(&self, endpoint: &EndpointName) -> Result<ControlReceipt, ControlError> {
        Ok(ControlReceipt {
            endpoint: endpoint.clone(),
            schema_digest: self.schema_digest(endpoint)?,
        })
    }
}

// ============================================================================
// SECTION: Name Validation
// ============================================================================

/// Validates an endpoint name against its grammar.
fn validate_endpoint_name(endpoint: &EndpointName, failures: &mut FailureMap) {
    if endpoint.as_str().trim().is_empty() {
        failures.append(
            endpoint.as_str(),
            codes::EMPTY_ENDPOINT_NAME,
            "Endpoint names must not be empty.",
        );
        return;
    }
    if !EndpointName::is_valid_text(endpoint.as_str()) {
        failures.append(
            endpoint.as_str(),
            codes::INVALID_ENDPOINT_NAME,
            "Endpoint names may only contain letters, digits, '-', and '.'.",
        );
    }
}

/// Validates a property name against its grammar.
fn validate_property_name(property: &PropertyName, failures: &mut FailureMap) {
    if property.as_str().trim().is_empty() {
        failures.append(
            property.as_str(),
            codes::EMPTY_PROPERTY_NAME,
            "Property names must not be empty.",
        );
        return;
    }
    if !PropertyName::is_valid_text(property.as_str()) {
        failures.append(
            property.as_str(),
            codes::INVALID_PROPERTY_NAME,
            "Property names must start with a letter or '_' \
             and contain only letters, digits, and '_'.",
        );
    }
}
