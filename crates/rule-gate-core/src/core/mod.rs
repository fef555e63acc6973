// crates/rule-gate-core/src/core/mod.rs
// ============================================================================
// Module: Rule Gate Core Types
// Description: Canonical schema, rule, and failure structures.
// Purpose: Provide stable, serializable types shared by authoring and evaluation.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types define endpoint schemas, canonical rules, typed request values,
//! and the structured failure surface. These types are the canonical source
//! of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod failure;
pub mod hashing;
pub mod identifiers;
pub mod offset;
pub mod property;
pub mod rule;
pub(crate) mod temporal;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use failure::ErrorDetail;
pub use failure::FailureMap;
pub use failure::ValidationResult;
pub use failure::ValidationStatus;
pub use failure::codes;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::EndpointName;
pub use identifiers::PropertyName;
pub use identifiers::RuleName;
pub use offset::OffsetSpan;
pub use property::PropertyCatalog;
pub use property::PropertyDescriptor;
pub use property::PropertySpec;
pub use property::PropertyType;
pub use property::PropertyValue;
pub use property::TypedProperty;
pub use rule::NOW;
pub use rule::Rule;
pub use rule::RuleRequest;
pub use rule::RuleType;
pub use rule::RuleValueKind;
pub use rule::extra;
pub use rule::placeholders;
