//! # Phone Validation Module
//!
//! This module normalizes and validates candidate phone number strings before
//! they are turned into vCard records.
//!
//! Two strictness levels are supported, matching the behavior knob in
//! [`crate::config::BotConfig`]:
//!
//! - **Strict**: full international validation through the `phonenumber` crate
//! - **Lenient**: a cruder line filter that only rejects tokens containing
//!   alphabetic characters or no digits at all

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    // Lenient mode: at least one digit, and nothing alphabetic anywhere
    static ref LENIENT_TOKEN: Regex =
        Regex::new(r"^\+?[0-9][0-9 \-().]*$").expect("Lenient phone pattern should be valid");
}

/// Validation strictness for candidate phone numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Full syntactic and regional validation
    Strict,
    /// Reject alphabetic lines only
    Lenient,
}

impl Strictness {
    pub fn from_flag(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

/// Trim a candidate and guarantee a leading `+`.
///
/// The returned string is what gets rendered into the `TEL` field, so the
/// normalization applies in both strictness modes.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('+') {
        trimmed.to_string()
    } else {
        format!("+{trimmed}")
    }
}

/// Validate a candidate phone number string.
///
/// Pure function: trims, prepends `+` when missing, then checks the result
/// against the requested strictness. Any parse failure is an invalid number,
/// never an error.
pub fn validate(raw: &str, strictness: Strictness) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }

    let candidate = normalize(trimmed);
    let valid = match strictness {
        Strictness::Strict => match phonenumber::parse(None, &candidate) {
            Ok(parsed) => phonenumber::is_valid(&parsed),
            Err(_) => false,
        },
        Strictness::Lenient => LENIENT_TOKEN.is_match(&candidate),
    };

    trace!(candidate = %candidate, valid, "Validated phone candidate");
    valid
}

/// Split raw user input into one candidate per non-empty line and keep the
/// valid ones, normalized. Input order is preserved.
pub fn filter_valid(raw_input: &str, strictness: Strictness) -> Vec<String> {
    raw_input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| validate(line, strictness))
        .map(normalize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_international_number() {
        assert!(validate("+14155552671", Strictness::Strict));
    }

    #[test]
    fn test_letters_rejected() {
        assert!(!validate("not-a-number", Strictness::Strict));
        assert!(!validate("not-a-number", Strictness::Lenient));
    }

    #[test]
    fn test_missing_plus_is_prepended() {
        // Validator prepends '+' and re-checks
        assert!(validate("14155552671", Strictness::Strict));
        assert_eq!(normalize("14155552671"), "+14155552671");
    }

    #[test]
    fn test_empty_invalid_in_both_modes() {
        assert!(!validate("", Strictness::Strict));
        assert!(!validate("   ", Strictness::Strict));
        assert!(!validate("", Strictness::Lenient));
    }

    #[test]
    fn test_lenient_accepts_digit_runs() {
        assert!(validate("0812345678", Strictness::Lenient));
        assert!(validate("+62 812-3456-789", Strictness::Lenient));
        assert!(!validate("62abc123", Strictness::Lenient));
    }

    #[test]
    fn test_filter_preserves_order_and_normalizes() {
        let input = "+14155552671\nnonsense\n+442071838750";
        let kept = filter_valid(input, Strictness::Strict);
        assert_eq!(kept, vec!["+14155552671", "+442071838750"]);
    }

    #[test]
    fn test_strictness_from_flag() {
        assert_eq!(Strictness::from_flag(true), Strictness::Strict);
        assert_eq!(Strictness::from_flag(false), Strictness::Lenient);
    }
}
