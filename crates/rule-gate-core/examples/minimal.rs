// crates/rule-gate-core/examples/minimal.rs
// ============================================================================
// Module: Rule Gate Minimal Example
// Description: Minimal end-to-end validation run using the in-memory store.
// Purpose: Demonstrate endpoint authoring and request evaluation.
// Dependencies: rule-gate-core
// ============================================================================

//! ## Overview
//! Authors a small signup endpoint through the control surface, then
//! validates one conforming and one violating request body against it.

use std::collections::BTreeMap;

use rule_gate_core::EndpointControl;
use rule_gate_core::EndpointName;
use rule_gate_core::MemorySchemaStore;
use rule_gate_core::PropertyName;
use rule_gate_core::PropertySpec;
use rule_gate_core::PropertyType;
use rule_gate_core::RequestEvaluator;
use rule_gate_core::RuleName;
use rule_gate_core::RuleRequest;
use rule_gate_core::RuleType;
use rule_gate_core::ValidationStatus;
use serde_json::json;
use time::OffsetDateTime;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Builds the signup endpoint declaration for the example run.
fn signup_properties() -> Vec<PropertySpec> {
    vec![
        PropertySpec {
            name: PropertyName::new("Username"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![RuleRequest {
                name: RuleName::new("username-length"),
                rule_type: RuleType::Between,
                value: json!([3, 16]),
                error_message: Some("Username must be {value1}-{value2} characters.".to_owned()),
            }],
        },
        PropertySpec {
            name: PropertyName::new("Password"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![RuleRequest {
                name: RuleName::new("password-length"),
                rule_type: RuleType::MoreOrEqual,
                value: json!(8),
                error_message: Some("Password needs {value}+ characters; got {actualValue}.".to_owned()),
            }],
        },
        PropertySpec {
            name: PropertyName::new("ConfirmPassword"),
            property_type: PropertyType::String,
            is_optional: false,
            rules: vec![RuleRequest {
                name: RuleName::new("passwords-match"),
                rule_type: RuleType::Equal,
                value: json!("{Password}"),
                error_message: Some("Passwords must match.".to_owned()),
            }],
        },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let now = OffsetDateTime::now_utc();
    let endpoint = EndpointName::new("signup");

    let store = MemorySchemaStore::new();
    let control = EndpointControl::new(store.clone());
    control.create_endpoint(&endpoint, &signup_properties(), now)?;

    let evaluator = RequestEvaluator::new(store);

    let good: BTreeMap<String, serde_json::Value> = [
        ("Username".to_owned(), json!("alice")),
        ("Password".to_owned(), json!("correct horse")),
        ("ConfirmPassword".to_owned(), json!("correct horse")),
    ]
    .into_iter()
    .collect();
    let accepted = evaluator.evaluate(&endpoint, &good, now)?;
    if accepted.status != ValidationStatus::Success {
        return Err(Box::new(ExampleError("conforming body must validate")));
    }

    let bad: BTreeMap<String, serde_json::Value> = [
        ("Username".to_owned(), json!("al")),
        ("Password".to_owned(), json!("short")),
        ("ConfirmPassword".to_owned(), json!("different")),
    ]
    .into_iter()
    .collect();
    let rejected = evaluator.evaluate(&endpoint, &bad, now)?;
    if rejected.status != ValidationStatus::Failure || rejected.failures.len() != 3 {
        return Err(Box::new(ExampleError("violating body must fail per property")));
    }

    Ok(())
}
