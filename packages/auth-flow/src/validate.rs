//! Credential validators.
//!
//! Pure predicates, no side effects, never panic. The machine maps a
//! `false` to the user-visible message for the current step.

use crate::types::OTP_LEN;

/// `local@domain` shape with a dot-separated domain.
///
/// Deliberately RFC-lite: non-empty local part, no whitespace, and a
/// domain with non-empty parts around its final dot.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// At least 6 characters. No other complexity rule is enforced.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= 6
}

/// At least 10 digits anywhere in the string; separators and a leading
/// `+` are tolerated rather than parsed.
pub fn validate_phone(phone_number: &str) -> bool {
    phone_number.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

/// All slots filled with exactly one character each.
///
/// Slot content is not restricted to digits: any single character counts
/// as filled.
pub fn validate_otp(digits: &[String; OTP_LEN]) -> bool {
    digits.iter().all(|d| d.chars().count() == 1)
}
