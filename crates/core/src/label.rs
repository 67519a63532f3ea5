//! Label constants and validation.
//!
//! Labels carry display colors and an optional keyboard shortcut: a
//! prefix modifier (`ctrl`, `shift`, `ctrl shift`) combined with a single
//! `[0-9a-z]` suffix key. A prefix without a suffix key is rejected, and
//! each (prefix, suffix) pair may be assigned to at most one label per
//! project (the uniqueness query lives in the storage layer).

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default label background color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#209cee";

/// Default label text color.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

// ---------------------------------------------------------------------------
// Shortcut keys
// ---------------------------------------------------------------------------

/// Valid shortcut prefix modifiers.
pub const VALID_PREFIX_KEYS: &[&str] = &["ctrl", "shift", "ctrl shift"];

/// Returns `true` if `prefix` is a valid shortcut modifier.
pub fn is_valid_prefix_key(prefix: &str) -> bool {
    VALID_PREFIX_KEYS.contains(&prefix)
}

/// Returns `true` if `suffix` is a single `[0-9a-z]` key.
pub fn is_valid_suffix_key(suffix: &str) -> bool {
    let mut chars = suffix.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_ascii_digit() || c.is_ascii_lowercase()
    )
}

/// Validate a label's shortcut key combination.
///
/// A suffix key alone is a valid shortcut; a prefix modifier alone is not.
pub fn validate_shortcut(
    prefix_key: Option<&str>,
    suffix_key: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(prefix) = prefix_key {
        if !is_valid_prefix_key(prefix) {
            return Err(CoreError::Validation(format!(
                "Invalid prefix key '{prefix}'. Must be one of: {}",
                VALID_PREFIX_KEYS.join(", ")
            )));
        }
        if suffix_key.is_none() {
            return Err(CoreError::Validation(
                "A shortcut prefix key requires a suffix key".to_string(),
            ));
        }
    }

    if let Some(suffix) = suffix_key {
        if !is_valid_suffix_key(suffix) {
            return Err(CoreError::Validation(format!(
                "Invalid suffix key '{suffix}'. Must be a single [0-9a-z] key"
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Validate that a color string matches `#RRGGBB` hex format.
pub fn validate_color_hex(color: &str) -> Result<(), CoreError> {
    if color.len() != 7 || !color.starts_with('#') {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must be in #RRGGBB hex format"
        )));
    }

    if !color[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must contain only hex digits after '#'"
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- shortcut keys -----------------------------------------------------

    #[test]
    fn suffix_alone_is_valid() {
        assert!(validate_shortcut(None, Some("a")).is_ok());
        assert!(validate_shortcut(None, Some("7")).is_ok());
    }

    #[test]
    fn prefix_with_suffix_is_valid() {
        assert!(validate_shortcut(Some("ctrl"), Some("x")).is_ok());
        assert!(validate_shortcut(Some("shift"), Some("0")).is_ok());
        assert!(validate_shortcut(Some("ctrl shift"), Some("z")).is_ok());
    }

    #[test]
    fn no_shortcut_is_valid() {
        assert!(validate_shortcut(None, None).is_ok());
    }

    #[test]
    fn prefix_without_suffix_rejected() {
        let err = validate_shortcut(Some("ctrl"), None).unwrap_err();
        assert!(err.to_string().contains("requires a suffix key"));
    }

    #[test]
    fn unknown_prefix_rejected() {
        assert!(validate_shortcut(Some("alt"), Some("a")).is_err());
    }

    #[test]
    fn uppercase_suffix_rejected() {
        assert!(validate_shortcut(None, Some("A")).is_err());
    }

    #[test]
    fn multi_char_suffix_rejected() {
        assert!(validate_shortcut(None, Some("ab")).is_err());
    }

    #[test]
    fn empty_suffix_rejected() {
        assert!(validate_shortcut(None, Some("")).is_err());
    }

    // -- colors ------------------------------------------------------------

    #[test]
    fn default_colors_are_valid() {
        assert!(validate_color_hex(DEFAULT_BACKGROUND_COLOR).is_ok());
        assert!(validate_color_hex(DEFAULT_TEXT_COLOR).is_ok());
    }

    #[test]
    fn color_missing_hash_rejected() {
        assert!(validate_color_hex("209cee0").is_err());
    }

    #[test]
    fn color_short_form_rejected() {
        assert!(validate_color_hex("#fff").is_err());
    }

    #[test]
    fn color_with_alpha_rejected() {
        assert!(validate_color_hex("#209cee80").is_err());
    }

    #[test]
    fn color_non_hex_digits_rejected() {
        assert!(validate_color_hex("#20gcee").is_err());
    }
}
