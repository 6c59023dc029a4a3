//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 pattern is valid")
});

/// Normalize a phone identifier for use as a store key.
///
/// Only surrounding whitespace is removed; the identifier is otherwise kept
/// verbatim so that it matches the value stored in the user directory.
pub fn normalize_phone(phone: &str) -> String {
    phone.trim().to_string()
}

/// Strip common formatting characters, keeping digits and `+`
pub fn strip_formatting(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid international E.164
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE_REGEX.is_match(phone.trim())
}

/// Mask a phone number for logs (e.g., +91****0001)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = strip_formatting(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
