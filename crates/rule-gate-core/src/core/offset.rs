// crates/rule-gate-core/src/core/offset.rs
// ============================================================================
// Module: Rule Gate Offset Spans
// Description: Signed day/clock spans attached to dynamic rule tokens.
// Purpose: Parse and canonicalize the offset grammar shared by `now` and property tokens.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Offsets qualify dynamic tokens (`now+02:00`, `{StartDate-3}`) and accept
//! `D`, `HH:MM`, `HH:MM:SS`, or `D.HH:MM[:SS]` with an optional sign. A bare
//! day count has no clock component. Zero-length spans are rejected: an
//! offset that moves nothing is authoring noise, not a valid qualifier.
//! Canonical text strips a leading `+` and preserves a leading `-`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Duration;

// ============================================================================
// SECTION: Offset Spans
// ============================================================================

/// Seconds per day used for day-count conversion.
const SECONDS_PER_DAY: i64 = 86_400;

/// Signed offset span parsed from rule token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSpan {
    /// Signed duration represented by the span.
    duration: Duration,
}

impl OffsetSpan {
    /// Parses an offset span, rejecting empty and zero-length spans.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let duration = parse_unsigned(rest)?;
        if duration.is_zero() {
            return None;
        }
        Some(Self {
            duration: if negative { -duration } else { duration },
        })
    }

    /// Validates offset text and returns its canonical form
    /// (leading `+` stripped, leading `-` preserved).
    #[must_use]
    pub fn canonical(text: &str) -> Option<String> {
        Self::parse(text)?;
        Some(text.strip_prefix('+').unwrap_or(text).to_owned())
    }

    /// Returns the signed duration of the span.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the span truncated to whole days, for date-only arithmetic.
    #[must_use]
    pub fn day_truncated(&self) -> Duration {
        Duration::seconds(self.duration.whole_days().saturating_mul(SECONDS_PER_DAY))
    }
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Parses the unsigned remainder of an offset span.
fn parse_unsigned(text: &str) -> Option<Duration> {
    if !text.contains(':') {
        let days = parse_component(text, i64::MAX)?;
        return Some(Duration::seconds(days.checked_mul(SECONDS_PER_DAY)?));
    }

    let (days, clock) = match text.split_once('.') {
        Some((day_part, clock_part)) => (parse_component(day_part, i64::MAX)?, clock_part),
        None => (0, text),
    };

    let mut parts = clock.split(':');
    let hours = parse_component(parts.next()?, 23)?;
    let minutes = parse_component(parts.next()?, 59)?;
    let seconds = match parts.next() {
        Some(part) => parse_component(part, 59)?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let total = days.checked_mul(SECONDS_PER_DAY)?.checked_add(hours * 3_600)?;
    Some(Duration::seconds(total.checked_add(minutes * 60 + seconds)?))
}

/// Parses one non-empty decimal component bounded by `max`.
fn parse_component(text: &str, max: i64) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().filter(|value| *value <= max)
}
