// crates/rule-gate-core/src/authoring/token.rs
// ============================================================================
// Module: Rule Gate Value Tokens
// Description: Parsing for the dynamic rule-value token grammar.
// Purpose: Recognize now-relative and property-relative tokens with offsets and options.
// Dependencies: crate::core::{identifiers, offset}
// ============================================================================

//! ## Overview
//! Rule values may reference the evaluation instant (`now`, `now-01:30`) or a
//! sibling property (`{StartDate}`, `{StartDate+1}`, `{Username.Length}`).
//! This module turns raw value text into structured tokens, leaving the
//! per-type validators to map [`TokenError`] variants onto their own failure
//! messages. Offsets are canonicalized here: a leading `+` is stripped, a
//! leading `-` is preserved, and zero-length spans are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::PropertyName;
use crate::core::offset::OffsetSpan;

// ============================================================================
// SECTION: Token Errors
// ============================================================================

/// Structured token parsing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenError {
    /// `{` without a closing `}`.
    UnterminatedBrace,
    /// Braces enclose nothing.
    EmptyPropertyName,
    /// Enclosed name violates the property name grammar.
    InvalidPropertyName,
    /// Option suffix is not a recognized rule option.
    InvalidOption,
    /// Token shape does not match the grammar at all.
    MalformedToken,
    /// Offset suffix is present but unparseable or zero-length.
    InvalidOffset,
}

// ============================================================================
// SECTION: String Property Tokens
// ============================================================================

/// Comparison modifier option on a string property token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringOption {
    /// Compare lengths rather than contents.
    ByLength,
    /// Compare contents case-insensitively.
    CaseInsensitive,
}

/// Parsed `{Property}` / `{Property.option}` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PropertyOptionToken<'a> {
    /// Referenced property name.
    pub(crate) name: &'a str,
    /// Optional comparison modifier.
    pub(crate) option: Option<StringOption>,
}

/// Parses a `{Property}` or `{Property.option}` token. The input must start
/// with `{`.
pub(crate) fn property_option_token(raw: &str) -> Result<PropertyOptionToken<'_>, TokenError> {
    let inner = brace_inner(raw)?;
    let (name, option_text) =
        inner.split_once('.').map_or((inner, None), |(name, option)| (name, Some(option)));
    if !PropertyName::is_valid_text(name) {
        return Err(TokenError::InvalidPropertyName);
    }
    let option = match option_text {
        None => None,
        Some("") => return Err(TokenError::InvalidPropertyName),
        Some(text) if text.eq_ignore_ascii_case("length") => Some(StringOption::ByLength),
        Some(text) if text.eq_ignore_ascii_case("case:i") => Some(StringOption::CaseInsensitive),
        Some(_) => return Err(TokenError::InvalidOption),
    };
    Ok(PropertyOptionToken {
        name,
        option,
    })
}

// ============================================================================
// SECTION: Temporal Property Tokens
// ============================================================================

/// Parsed `{Property}` / `{Property±offset}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PropertyOffsetToken<'a> {
    /// Referenced property name.
    pub(crate) name: &'a str,
    /// Canonical offset text, when an offset was attached.
    pub(crate) offset: Option<String>,
}

/// Parses a `{Property}` or `{Property±offset}` token. The input must start
/// with `{`.
pub(crate) fn property_offset_token(raw: &str) -> Result<PropertyOffsetToken<'_>, TokenError> {
    let inner = brace_inner(raw)?;
    let (name, offset_text) = inner
        .find(['+', '-'])
        .map_or((inner, None), |index| (&inner[..index], Some(&inner[index..])));
    if !PropertyName::is_valid_text(name) {
        return Err(TokenError::MalformedToken);
    }
    let offset = match offset_text {
        None => None,
        Some(text) => Some(OffsetSpan::canonical(text).ok_or(TokenError::InvalidOffset)?),
    };
    Ok(PropertyOffsetToken {
        name,
        offset,
    })
}

// ============================================================================
// SECTION: Now Tokens
// ============================================================================

/// Parses a `now` / `now±offset` token (case-insensitive keyword), returning
/// the canonical offset text when one is attached.
pub(crate) fn now_token(raw: &str) -> Result<Option<String>, TokenError> {
    let Some(prefix) = raw.get(..3) else {
        return Err(TokenError::MalformedToken);
    };
    if !prefix.eq_ignore_ascii_case("now") {
        return Err(TokenError::MalformedToken);
    }
    let rest = &raw[3..];
    if rest.is_empty() {
        return Ok(None);
    }
    if !rest.starts_with(['+', '-']) {
        return Err(TokenError::MalformedToken);
    }
    OffsetSpan::canonical(rest).map_or(Err(TokenError::InvalidOffset), |offset| Ok(Some(offset)))
}

// ============================================================================
// SECTION: Brace Helpers
// ============================================================================

/// Strips the enclosing braces, distinguishing unterminated from empty tokens.
fn brace_inner(raw: &str) -> Result<&str, TokenError> {
    if !raw.ends_with('}') {
        return Err(TokenError::UnterminatedBrace);
    }
    if raw.len() < 3 {
        return Err(TokenError::EmptyPropertyName);
    }
    Ok(&raw[1..raw.len() - 1])
}
