// crates/rule-gate-core/src/core/temporal.rs
// ============================================================================
// Module: Rule Gate Temporal Model
// Description: Shared behavior of the three temporal property types.
// Purpose: Give authoring and evaluation one parsing/shifting surface per temporal type.
// Dependencies: crate::core::{offset, property}, time
// ============================================================================

//! ## Overview
//! `DateTime`, `DateOnly`, and `TimeOnly` rules share one grammar and differ
//! only in how literals parse, how a `now` snapshot projects into the type,
//! and how offsets apply. [`TemporalValue`] captures those differences so the
//! comparison and range logic is written once.
//!
//! Offsets against `DateOnly` apply in whole days; sub-day components are
//! dropped. Offsets against `TimeOnly` wrap around midnight.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::OffsetDateTime;
use time::Time;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::core::offset::OffsetSpan;
use crate::core::property::PropertyType;
use crate::core::property::PropertyValue;

// ============================================================================
// SECTION: Temporal Value Trait
// ============================================================================

/// Behavior shared by the temporal property types.
pub(crate) trait TemporalValue: Copy + PartialOrd + Sized {
    /// Property type this temporal value belongs to.
    const PROPERTY_TYPE: PropertyType;

    /// Parses a literal in the type's canonical text form.
    fn parse_literal(text: &str) -> Option<Self>;

    /// Projects a `now` snapshot into this type.
    fn from_instant(instant: OffsetDateTime) -> Self;

    /// Applies an offset span to a `now` snapshot before projection.
    fn shift_instant(instant: OffsetDateTime, span: &OffsetSpan) -> OffsetDateTime;

    /// Applies an offset span to a value of this type.
    fn shifted(self, span: &OffsetSpan) -> Self;

    /// Extracts this type from a coerced property value.
    fn from_value(value: &PropertyValue) -> Option<Self>;

    /// Renders the value for user-facing messages.
    fn display(&self) -> String;
}

// ============================================================================
// SECTION: DateTime
// ============================================================================

impl TemporalValue for OffsetDateTime {
    const PROPERTY_TYPE: PropertyType = PropertyType::DateTime;

    fn parse_literal(text: &str) -> Option<Self> {
        Self::parse(text, &Rfc3339).ok()
    }

    fn from_instant(instant: OffsetDateTime) -> Self {
        instant
    }

    fn shift_instant(instant: OffsetDateTime, span: &OffsetSpan) -> OffsetDateTime {
        instant.checked_add(span.duration()).unwrap_or(instant)
    }

    fn shifted(self, span: &OffsetSpan) -> Self {
        self.checked_add(span.duration()).unwrap_or(self)
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::DateTime(inner) => Some(*inner),
            _ => None,
        }
    }

    fn display(&self) -> String {
        self.format(&Rfc3339).unwrap_or_default()
    }
}

// ============================================================================
// SECTION: DateOnly
// ============================================================================

impl TemporalValue for Date {
    const PROPERTY_TYPE: PropertyType = PropertyType::DateOnly;

    fn parse_literal(text: &str) -> Option<Self> {
        Self::parse(text, format_description!("[year]-[month]-[day]")).ok()
    }

    fn from_instant(instant: OffsetDateTime) -> Self {
        instant.date()
    }

    fn shift_instant(instant: OffsetDateTime, span: &OffsetSpan) -> OffsetDateTime {
        instant.checked_add(span.day_truncated()).unwrap_or(instant)
    }

    fn shifted(self, span: &OffsetSpan) -> Self {
        self.checked_add(span.day_truncated()).unwrap_or(self)
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Date(inner) => Some(*inner),
            _ => None,
        }
    }

    fn display(&self) -> String {
        self.format(format_description!("[year]-[month]-[day]")).unwrap_or_default()
    }
}

// ============================================================================
// SECTION: TimeOnly
// ============================================================================

impl TemporalValue for Time {
    const PROPERTY_TYPE: PropertyType = PropertyType::TimeOnly;

    fn parse_literal(text: &str) -> Option<Self> {
        Self::parse(text, format_description!("[hour]:[minute]:[second]"))
            .or_else(|_| Self::parse(text, format_description!("[hour]:[minute]")))
            .ok()
    }

    fn from_instant(instant: OffsetDateTime) -> Self {
        instant.time()
    }

    fn shift_instant(instant: OffsetDateTime, span: &OffsetSpan) -> OffsetDateTime {
        instant.checked_add(span.duration()).unwrap_or(instant)
    }

    fn shifted(self, span: &OffsetSpan) -> Self {
        self + span.duration()
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Time(inner) => Some(*inner),
            _ => None,
        }
    }

    fn display(&self) -> String {
        self.format(format_description!("[hour]:[minute]:[second]")).unwrap_or_default()
    }
}
