use crate::models::registration::REFERRAL_SOURCES;

pub const TICKET_MAX_LEN: usize = 64;

/// Validate a ticket id: required, at most 64 chars, letters, digits, '-' and '_'.
pub fn validate_ticket_id(ticket_id: &str) -> Option<String> {
    let trimmed = ticket_id.trim();
    if trimmed.is_empty() {
        return Some("Ticket number is required".to_string());
    }
    if trimmed.len() > TICKET_MAX_LEN {
        return Some(format!("Ticket number must be at most {TICKET_MAX_LEN} characters"));
    }
    if !trimmed.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Some("Ticket number may only contain letters, numbers, '-' and '_'".to_string());
    }
    None
}

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Referral source must be blank or one of the offered options.
pub fn validate_referral(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || REFERRAL_SOURCES.iter().any(|s| *s == trimmed) {
        None
    } else {
        Some("Please pick one of the listed options".to_string())
    }
}
