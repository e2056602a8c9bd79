//! Formatting rule shared by every key and value.
//!
//! A field is trimmed, must not be empty afterwards and must not start
//! with `-` (hyphen-leading tokens are reserved for command-line options).

use crate::error::{CoreError, CoreResult};

/// Reserved leading character.
const RESERVED_PREFIX: char = '-';

/// Returns the trimmed field, or `None` if it is not a valid field.
///
/// ```rust
/// use regdb_core::parse_field;
///
/// assert_eq!(parse_field("  colour "), Some("colour"));
/// assert_eq!(parse_field("   "), None);
/// assert_eq!(parse_field("-v"), None);
/// ```
#[must_use]
pub fn parse_field(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with(RESERVED_PREFIX) {
        None
    } else {
        Some(trimmed)
    }
}

/// Like [`parse_field`], but reports a rejected field as an error.
///
/// # Errors
///
/// Returns [`CoreError::InvalidField`] naming `field` if `raw` is not valid.
pub fn require_field(field: &'static str, raw: &str) -> CoreResult<String> {
    parse_field(raw)
        .map(str::to_owned)
        .ok_or_else(|| CoreError::invalid_field(field, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims() {
        assert_eq!(parse_field("value"), Some("value"));
        assert_eq!(parse_field("\tspaced out  "), Some("spaced out"));
        assert_eq!(parse_field("a-b"), Some("a-b"));
    }

    #[test]
    fn rejects_empty_blank_and_hyphen_leading() {
        assert_eq!(parse_field(""), None);
        assert_eq!(parse_field("   "), None);
        assert_eq!(parse_field("-"), None);
        assert_eq!(parse_field("--force"), None);
        assert_eq!(parse_field("  -x"), None);
    }

    #[test]
    fn require_field_names_the_field() {
        let err = require_field("value", " ").unwrap_err();
        assert!(matches!(err, CoreError::InvalidField { field: "value", .. }));
        assert_eq!(require_field("key", " k ").unwrap(), "k");
    }
}
