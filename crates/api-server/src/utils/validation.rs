use crate::utils::error::ApiError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

const MIN_NAME_LEN: usize = 2;
const MIN_MESSAGE_LEN: usize = 10;

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ApiError::Validation {
            field: "name",
            message: format!("Name must be at least {} characters", MIN_NAME_LEN),
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ApiError::Validation {
            field: "email",
            message: "Invalid email address".to_string(),
        });
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), ApiError> {
    if message.trim().chars().count() < MIN_MESSAGE_LEN {
        return Err(ApiError::Validation {
            field: "message",
            message: format!("Message must be at least {} characters", MIN_MESSAGE_LEN),
        });
    }
    Ok(())
}
