// crates/rule-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Rule Gate In-Memory Store
// Description: Simple in-memory schema store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of the schema
//! store traits for tests and local demos. It is not intended for production
//! use. Endpoints are keyed by their upper-invariant names so existence
//! checks match case-insensitively; properties and rules keep deterministic
//! `BTreeMap` ordering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::EndpointName;
use crate::core::PropertyCatalog;
use crate::core::PropertyDescriptor;
use crate::core::PropertyName;
use crate::core::Rule;
use crate::core::RuleName;
use crate::interfaces::EndpointStore;
use crate::interfaces::PropertyStore;
use crate::interfaces::RuleStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Stored endpoint with its properties and rules.
#[derive(Debug, Clone, Default)]
struct EndpointRecord {
    /// Property catalog keyed by property name.
    properties: PropertyCatalog,
    /// Rules grouped by owning property name.
    rules: BTreeMap<PropertyName, Vec<Rule>>,
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory schema store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct MemorySchemaStore {
    /// Endpoint records keyed by normalized endpoint name.
    endpoints: Arc<Mutex<BTreeMap<String, EndpointRecord>>>,
}

impl MemorySchemaStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the endpoint map, converting poisoning into a store error.
    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<String, EndpointRecord>>, StoreError> {
        self.endpoints.lock().map_err(|_| StoreError::Io("schema store mutex poisoned".to_string()))
    }
}

/// Builds the missing-endpoint error.
fn endpoint_not_found(endpoint: &EndpointName) -> StoreError {
    StoreError::NotFound(format!("endpoint '{endpoint}'"))
}

/// Builds the missing-property error.
fn property_not_found(property: &PropertyName) -> StoreError {
    StoreError::NotFound(format!("property '{property}'"))
}

/// Fetches an endpoint record mutably.
fn record_mut<'a>(
    guard: &'a mut MutexGuard<'_, BTreeMap<String, EndpointRecord>>,
    endpoint: &EndpointName,
) -> Result<&'a mut EndpointRecord, StoreError> {
    guard.get_mut(&endpoint.normalized()).ok_or_else(|| endpoint_not_found(endpoint))
}

impl EndpointStore for MemorySchemaStore {
    fn endpoint_exists(&self, endpoint: &EndpointName) -> Result<bool, StoreError> {
        Ok(self.guard()?.contains_key(&endpoint.normalized()))
    }

    fn create_endpoint(&self, endpoint: &EndpointName) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let key = endpoint.normalized();
        if guard.contains_key(&key) {
            return Err(StoreError::Conflict(format!("endpoint '{endpoint}' already exists")));
        }
        guard.insert(key, EndpointRecord::default());
        Ok(())
    }

    fn rename_endpoint(
        &self,
        endpoint: &EndpointName,
        new_name: &EndpointName,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let old_key = endpoint.normalized();
        let new_key = new_name.normalized();
        if old_key != new_key && guard.contains_key(&new_key) {
            return Err(StoreError::Conflict(format!("endpoint '{new_name}' already exists")));
        }
        let record = guard.remove(&old_key).ok_or_else(|| endpoint_not_found(endpoint))?;
        guard.insert(new_key, record);
        Ok(())
    }

    fn delete_endpoint(&self, endpoint: &EndpointName) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        guard.remove(&endpoint.normalized()).ok_or_else(|| endpoint_not_found(endpoint))?;
        Ok(())
    }
}

impl PropertyStore for MemorySchemaStore {
    fn properties(&self, endpoint: &EndpointName) -> Result<PropertyCatalog, StoreError> {
        let guard = self.guard()?;
        let record =
            guard.get(&endpoint.normalized()).ok_or_else(|| endpoint_not_found(endpoint))?;
        Ok(record.properties.clone())
    }

    fn insert_property(
        &self,
        endpoint: &EndpointName,
        descriptor: &PropertyDescriptor,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        if record.properties.contains_key(&descriptor.name) {
            return Err(StoreError::Conflict(format!(
                "property '{}' already exists",
                descriptor.name
            )));
        }
        record.properties.insert(descriptor.name.clone(), descriptor.clone());
        Ok(())
    }

    fn rename_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        new_name: &PropertyName,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        if record.properties.contains_key(new_name) {
            return Err(StoreError::Conflict(format!("property '{new_name}' already exists")));
        }
        let mut descriptor =
            record.properties.remove(property).ok_or_else(|| property_not_found(property))?;
        descriptor.name = new_name.clone();
        record.properties.insert(new_name.clone(), descriptor);
        if let Some(rules) = record.rules.remove(property) {
            record.rules.insert(new_name.clone(), rules);
        }
        Ok(())
    }

    fn set_property_optionality(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        is_optional: bool,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        let descriptor =
            record.properties.get_mut(property).ok_or_else(|| property_not_found(property))?;
        descriptor.is_optional = is_optional;
        Ok(())
    }

    fn delete_property(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        record.properties.remove(property).ok_or_else(|| property_not_found(property))?;
        record.rules.remove(property);
        Ok(())
    }
}

impl RuleStore for MemorySchemaStore {
    fn endpoint_rules(
        &self,
        endpoint: &EndpointName,
    ) -> Result<BTreeMap<PropertyName, Vec<Rule>>, StoreError> {
        let guard = self.guard()?;
        let record =
            guard.get(&endpoint.normalized()).ok_or_else(|| endpoint_not_found(endpoint))?;
        Ok(record.rules.clone())
    }

    fn property_rules(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
    ) -> Result<Vec<Rule>, StoreError> {
        let guard = self.guard()?;
        let record =
            guard.get(&endpoint.normalized()).ok_or_else(|| endpoint_not_found(endpoint))?;
        if !record.properties.contains_key(property) {
            return Err(property_not_found(property));
        }
        Ok(record.rules.get(property).cloned().unwrap_or_default())
    }

    fn insert_rules(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        rules: &[Rule],
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        if !record.properties.contains_key(property) {
            return Err(property_not_found(property));
        }
        record.rules.entry(property.clone()).or_default().extend_from_slice(rules);
        Ok(())
    }

    fn rename_rule(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        new_name: &RuleName,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        let normalized = rule.normalized();
        for rules in record.rules.values_mut() {
            if let Some(stored) = rules.iter_mut().find(|r| r.normalized_name == normalized) {
                stored.name = new_name.clone();
                stored.normalized_name = new_name.normalized();
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!("rule '{rule}'")))
    }

    fn set_rule_error_message(
        &self,
        endpoint: &EndpointName,
        rule: &RuleName,
        message: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        let normalized = rule.normalized();
        for rules in record.rules.values_mut() {
            if let Some(stored) = rules.iter_mut().find(|r| r.normalized_name == normalized) {
                stored.error_message = message.map(str::to_owned);
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!("rule '{rule}'")))
    }

    fn delete_rule(&self, endpoint: &EndpointName, rule: &RuleName) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        let normalized = rule.normalized();
        for rules in record.rules.values_mut() {
            if let Some(index) = rules.iter().position(|r| r.normalized_name == normalized) {
                rules.remove(index);
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!("rule '{rule}'")))
    }

    fn rewrite_rule_references(
        &self,
        endpoint: &EndpointName,
        property: &PropertyName,
        new_name: &PropertyName,
    ) -> Result<usize, StoreError> {
        let mut guard = self.guard()?;
        let record = record_mut(&mut guard, endpoint)?;
        let mut rewritten = 0;
        for rules in record.rules.values_mut() {
            for rule in rules.iter_mut() {
                if !rule.is_relative || rule.value != property.as_str() {
                    continue;
                }
                rule.value = new_name.as_str().to_owned();
                if let Some(raw) = rule.raw_value.as_ref() {
                    if let Some(rest) = raw.strip_prefix('{').and_then(|inner| {
                        inner.strip_prefix(property.as_str())
                    }) {
                        rule.raw_value = Some(format!("{{{new_name}{rest}"));
                    }
                }
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }
}
