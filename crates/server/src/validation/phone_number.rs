//! Ethiopian phone number handling.
//!
//! Farmers and staff enter numbers in every local variant (`0912…`, `912…`,
//! `251912…`, `+251 912 …`); the gateway wants `+2519…`.

/// Normalizes a phone number to the `+251` international form.
///
/// Numbers that do not match a known Ethiopian layout are returned unchanged
/// so the gateway can reject them with a proper diagnostic.
pub fn normalize_phone_number(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || (trimmed.starts_with("+251") && !trimmed.contains([' ', '-'])) {
        return trimmed.to_string();
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if digits.starts_with("251") {
        return format!("+{digits}");
    }
    if digits.starts_with('0') && digits.len() == 10 {
        return format!("+251{}", &digits[1..]);
    }
    if digits.len() == 9 && digits.starts_with('9') {
        return format!("+251{digits}");
    }

    trimmed.to_string()
}

/// Accepted shape for stored numbers: an optional `+`, then 9 to 15 digits
/// (the E.164 maximum).
pub fn is_valid_phone_number(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    (9..=15).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit())
}
