// crates/rule-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Rule Gate Request Evaluator
// Description: Store-backed validation of submitted request bodies.
// Purpose: Coerce, evaluate, and aggregate one request into a validation result.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The request evaluator is the canonical request-time path: resolve the
//! endpoint, load its catalog, coerce the body, load rules, evaluate, and
//! aggregate. The `now` snapshot is sampled once at this boundary and used
//! for every dynamic value resolved during the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::EndpointName;
use crate::core::FailureMap;
use crate::core::ValidationResult;
use crate::interfaces::EndpointStore;
use crate::interfaces::PropertyStore;
use crate::interfaces::RuleStore;
use crate::interfaces::StoreError;
use crate::runtime::coerce::coerce_request;
use crate::runtime::evaluate_property;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request evaluation errors.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// Requested endpoint does not exist.
    #[error("endpoint '{0}' does not exist")]
    UnknownEndpoint(String),
    /// Request body failed property coercion; failures are keyed by property.
    #[error("request body failed property coercion")]
    InvalidRequest(FailureMap),
    /// Underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Request Evaluator
// ============================================================================

/// Store-backed request evaluator.
pub struct RequestEvaluator<S> {
    /// Backing schema store.
    store: S,
}

impl<S> RequestEvaluator<S>
where
    S: EndpointStore + PropertyStore + RuleStore,
{
    /// Creates a new evaluator over the given store.
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validates a request body against an endpoint's rules.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError::UnknownEndpoint`] for a missing endpoint,
    /// [`EvaluateError::InvalidRequest`] when the body cannot be coerced, and
    /// [`EvaluateError::Store`] when loading schema data fails.
    pub fn evaluate(
        &self,
        endpoint: &EndpointName,
        body: &BTreeMap<String, serde_json::Value>,
        now: OffsetDateTime,
    ) -> Result<ValidationResult, EvaluateError> {
        if !self.store.endpoint_exists(endpoint)? {
            return Err(EvaluateError::UnknownEndpoint(endpoint.as_str().to_owned()));
        }

        let catalog = self.store.properties(endpoint)?;

        let mut failures = FailureMap::new();
        let Some(typed) = coerce_request(&catalog, body, &mut failures) else {
            return Err(EvaluateError::InvalidRequest(failures));
        };

        let rules_by_property = self.store.endpoint_rules(endpoint)?;

        let mut applied_rules = 0;
        for property in typed.values() {
            let Some(rules) = rules_by_property.get(&property.name) else {
                continue;
            };
            applied_rules += rules.len();
            evaluate_property(property, rules, &typed, now, &mut failures);
        }

        let processed_properties = typed.len();
        Ok(if failures.is_empty() {
            ValidationResult::success(processed_properties, applied_rules)
        } else {
            ValidationResult::failure(processed_properties, applied_rules, failures)
        })
    }
}
