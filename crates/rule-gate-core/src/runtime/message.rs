// crates/rule-gate-core/src/runtime/message.rs
// ============================================================================
// Module: Rule Gate Message Templating
// Description: Placeholder substitution for user error-message templates.
// Purpose: Render rule failure messages with expected and actual values.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Failure messages come from user-authored templates. Placeholders match
//! case-insensitively and are replaced verbatim: `{value}` with the expected
//! value (preferring the authored raw syntax), `{value1}`/`{value2}` with
//! range bounds, `{actualValue}` with the submitted value. A rule without a
//! template renders as the empty string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Rule;
use crate::core::placeholders;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a comparison failure message.
pub(crate) fn comparison_message(rule: &Rule, actual: &str) -> String {
    rule.error_message.as_deref().map_or_else(String::new, |template| {
        let rendered = replace_ignore_ascii_case(template, placeholders::VALUE, rule.display_value());
        replace_ignore_ascii_case(&rendered, placeholders::ACTUAL_VALUE, actual)
    })
}

/// Renders a range failure message.
pub(crate) fn range_message(rule: &Rule, actual: &str) -> String {
    rule.error_message.as_deref().map_or_else(String::new, |template| {
        let rendered = replace_ignore_ascii_case(template, placeholders::VALUE1, &rule.value);
        let rendered = replace_ignore_ascii_case(
            &rendered,
            placeholders::VALUE2,
            rule.extra_info.as_deref().unwrap_or_default(),
        );
        replace_ignore_ascii_case(&rendered, placeholders::ACTUAL_VALUE, actual)
    })
}

// ============================================================================
// SECTION: Case-Insensitive Replacement
// ============================================================================

/// Replaces every occurrence of an ASCII needle, matching case-insensitively.
fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_owned();
    }

    let folded_haystack = haystack.to_ascii_lowercase();
    let folded_needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(found) = folded_haystack[cursor..].find(&folded_needle) {
        let start = cursor + found;
        out.push_str(&haystack[cursor..start]);
        out.push_str(replacement);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}
