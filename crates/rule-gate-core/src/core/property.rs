// crates/rule-gate-core/src/core/property.rs
// ============================================================================
// Module: Rule Gate Property Model
// Description: Property types, descriptors, and typed request values.
// Purpose: Define the schema side of an endpoint and its coerced value forms.
// Dependencies: crate::core::identifiers, serde, time
// ============================================================================

//! ## Overview
//! An endpoint schema is a catalog of named, typed, optionally-optional
//! properties. Submitted request values are coerced into [`PropertyValue`]
//! before any rule evaluation runs, so evaluators operate on typed data only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::OffsetDateTime;
use time::Time;

use crate::core::identifiers::PropertyName;
use crate::core::rule::RuleRequest;

// ============================================================================
// SECTION: Property Types
// ============================================================================

/// Declared type of an endpoint property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// UTF-8 string values.
    String,
    /// 64-bit signed integer values.
    Int,
    /// 64-bit floating point values.
    Float,
    /// Date-and-time values with a UTC offset (RFC 3339).
    DateTime,
    /// Calendar date values (`YYYY-MM-DD`).
    DateOnly,
    /// Wall-clock time values (`HH:MM[:SS]`).
    TimeOnly,
}

impl PropertyType {
    /// Returns the display name used in user-facing failure messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::DateTime => "DateTime",
            Self::DateOnly => "DateOnly",
            Self::TimeOnly => "TimeOnly",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// SECTION: Property Descriptors
// ============================================================================

/// Declared property within an endpoint schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name, unique case-sensitively per endpoint.
    pub name: PropertyName,
    /// Declared property type.
    pub property_type: PropertyType,
    /// Indicates whether the property may be absent from a request.
    pub is_optional: bool,
}

/// Read-only property catalog for one endpoint, keyed by property name.
pub type PropertyCatalog = BTreeMap<PropertyName, PropertyDescriptor>;

/// Property declaration submitted at authoring time, with its rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Property name.
    pub name: PropertyName,
    /// Declared property type.
    pub property_type: PropertyType,
    /// Indicates whether the property may be absent from a request.
    pub is_optional: bool,
    /// Rules to author against this property.
    #[serde(default)]
    pub rules: Vec<RuleRequest>,
}

impl PropertySpec {
    /// Returns the descriptor half of the declaration.
    #[must_use]
    pub fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name.clone(),
            property_type: self.property_type,
            is_optional: self.is_optional,
        }
    }
}

// ============================================================================
// SECTION: Typed Values
// ============================================================================

/// Request value coerced into its property's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Coerced string value.
    String(String),
    /// Coerced integer value.
    Int(i64),
    /// Coerced floating point value.
    Float(f64),
    /// Coerced date-and-time value.
    DateTime(OffsetDateTime),
    /// Coerced calendar date value.
    Date(Date),
    /// Coerced wall-clock time value.
    Time(Time),
}

impl PropertyValue {
    /// Returns the string payload when this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the integer payload when this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload when this is a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// Coerced property ready for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedProperty {
    /// Property name.
    pub name: PropertyName,
    /// Declared property type.
    pub property_type: PropertyType,
    /// Coerced request value.
    pub value: PropertyValue,
}

// ============================================================================
// SECTION: JSON Kind Names
// ============================================================================

/// Returns the JSON kind name used in failure messages.
pub(crate) const fn json_kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "Null",
        serde_json::Value::Bool(true) => "True",
        serde_json::Value::Bool(false) => "False",
        serde_json::Value::Number(_) => "Number",
        serde_json::Value::String(_) => "String",
        serde_json::Value::Array(_) => "Array",
        serde_json::Value::Object(_) => "Object",
    }
}
