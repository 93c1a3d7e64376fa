//! Input validation primitives.
//!
//! These replace verbose `if ... { return Err(Error::validation_invalid_argument(..)) }`
//! chains at argument boundaries.

use crate::error::{Error, Result};

/// Require a string with at least one non-whitespace character.
///
/// The value is returned as given; surrounding whitespace is kept.
pub fn require_non_blank<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(Error::validation_invalid_argument(field, message, None))
    } else {
        Ok(value)
    }
}

/// Require a literal to contain at least one byte.
///
/// Whitespace is significant in literals, so nothing is trimmed.
pub fn require_literal<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_blank_keeps_value_as_given() {
        assert_eq!(require_non_blank("  *.cs ", "pattern", "msg").unwrap(), "  *.cs ");
        assert!(require_non_blank("   ", "pattern", "msg").is_err());
    }

    #[test]
    fn require_literal_keeps_whitespace() {
        assert_eq!(require_literal(" ", "search", "msg").unwrap(), " ");
        let err = require_literal("", "search", "msg").unwrap_err();
        assert_eq!(err.details["field"], "search");
    }
}
