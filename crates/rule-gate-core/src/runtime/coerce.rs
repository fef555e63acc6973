// crates/rule-gate-core/src/runtime/coerce.rs
// ============================================================================
// Module: Rule Gate Property Coercion
// Description: Coercion of submitted JSON values into declared property types.
// Purpose: Give rule evaluators typed values and surface type mismatches early.
// Dependencies: crate::core, serde_json, time
// ============================================================================

//! ## Overview
//! Every declared property is checked against the request body before any
//! rule runs: numeric types require a JSON number, everything else a JSON
//! string in the type's text form. All coercion failures for one request are
//! collected in a single pass; any failure aborts rule evaluation entirely.
//! Body keys without a declared property are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::core::ErrorDetail;
use crate::core::FailureMap;
use crate::core::PropertyCatalog;
use crate::core::PropertyDescriptor;
use crate::core::PropertyName;
use crate::core::PropertyType;
use crate::core::PropertyValue;
use crate::core::TypedProperty;
use crate::core::codes;
use crate::core::property::json_kind_name;

// ============================================================================
// SECTION: Request Coercion
// ============================================================================

/// Coerces a request body against the property catalog, recording failures
/// per property. Returns the typed values only when every property coerced.
pub fn coerce_request(
    catalog: &PropertyCatalog,
    body: &BTreeMap<String, serde_json::Value>,
    failures: &mut FailureMap,
) -> Option<BTreeMap<PropertyName, TypedProperty>> {
    let mut typed = BTreeMap::new();

    for (name, descriptor) in catalog {
        let Some(raw) = body.get(name.as_str()) else {
            if !descriptor.is_optional {
                failures.append(
                    name.as_str(),
                    codes::PROPERTY_NOT_PRESENT,
                    format!(
                        "Property is not present (type '{}'). Consider making it 'optional'.",
                        descriptor.property_type
                    ),
                );
            }
            continue;
        };

        match coerce_value(descriptor, raw) {
            Ok(value) => {
                typed.insert(
                    name.clone(),
                    TypedProperty {
                        name: name.clone(),
                        property_type: descriptor.property_type,
                        value,
                    },
                );
            }
            Err(detail) => failures.push(name.as_str(), detail),
        }
    }

    failures.is_empty().then_some(typed)
}

// ============================================================================
// SECTION: Value Coercion
// ============================================================================

/// Coerces one raw JSON value into the declared property type.
fn coerce_value(
    descriptor: &PropertyDescriptor,
    raw: &serde_json::Value,
) -> Result<PropertyValue, ErrorDetail> {
    match descriptor.property_type {
        PropertyType::Int => {
            require_number(raw)?;
            raw.as_i64().map(PropertyValue::Int).ok_or_else(|| invalid_type("Int"))
        }
        PropertyType::Float => {
            require_number(raw)?;
            raw.as_f64().map(PropertyValue::Float).ok_or_else(|| invalid_type("Float"))
        }
        PropertyType::String => {
            let text = require_string(raw)?;
            Ok(PropertyValue::String(text.to_owned()))
        }
        PropertyType::DateTime => {
            let text = require_string(raw)?;
            OffsetDateTime::parse(text, &Rfc3339)
                .map(PropertyValue::DateTime)
                .map_err(|_| invalid_type("DateTime"))
        }
        PropertyType::DateOnly => {
            let text = require_string(raw)?;
            time::Date::parse(text, format_description!("[year]-[month]-[day]"))
                .map(PropertyValue::Date)
                .map_err(|_| invalid_type("DateOnly"))
        }
        PropertyType::TimeOnly => {
            let text = require_string(raw)?;
            time::Time::parse(text, format_description!("[hour]:[minute]:[second]"))
                .or_else(|_| time::Time::parse(text, format_description!("[hour]:[minute]")))
                .map(PropertyValue::Time)
                .map_err(|_| invalid_type("TimeOnly"))
        }
    }
}

/// Requires the raw value to be a JSON number.
fn require_number(raw: &serde_json::Value) -> Result<(), ErrorDetail> {
    if raw.is_number() {
        return Ok(());
    }
    Err(ErrorDetail::new(
        codes::INVALID_PROPERTY_TYPE,
        format!("Expected value kind is 'Json.Number'; got: 'Json.{}'.", json_kind_name(raw)),
    ))
}

/// Requires the raw value to be a JSON string and returns its text.
fn require_string(raw: &serde_json::Value) -> Result<&str, ErrorDetail> {
    raw.as_str().ok_or_else(|| {
        ErrorDetail::new(
            codes::INVALID_PROPERTY_TYPE,
            format!("Expected value kind is 'Json.String'; got: 'Json.{}'.", json_kind_name(raw)),
        )
    })
}

/// Builds the failed-parse detail for one property type.
fn invalid_type(type_name: &str) -> ErrorDetail {
    ErrorDetail::new(codes::INVALID_PROPERTY_TYPE, format!("Value is not valid {type_name}."))
}
