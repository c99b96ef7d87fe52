//! Input validation utilities

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// A single rejected field, reported back to the client in `details`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

/// Require a non-blank string, pushing an error for `field` when it is missing
pub fn require_text(value: &str, field: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{field} is required")));
    }
}

/// Read a text field out of a loosely typed body.
///
/// Strings pass through, numbers and booleans are stringified, `null` and a
/// missing key both read as `None`.
pub fn text_field(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{field} must be a string")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("jane.doe@example.org").is_ok());
        assert!(validate_email("admin@hopesanctuary.local").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("jane.doe").is_err());
        assert!(validate_email("jane@doe").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Admin@12345").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("1234567890").is_err());
    }

    #[test]
    fn text_field_stringifies_scalars() {
        let body = json!({ "name": "Rex", "age": 3, "vaccinated": true, "about": null });
        let fields = body.as_object().unwrap();
        let mut errors = Vec::new();

        assert_eq!(text_field(fields, "name", &mut errors).as_deref(), Some("Rex"));
        assert_eq!(text_field(fields, "age", &mut errors).as_deref(), Some("3"));
        assert_eq!(
            text_field(fields, "vaccinated", &mut errors).as_deref(),
            Some("true")
        );
        assert_eq!(text_field(fields, "about", &mut errors), None);
        assert_eq!(text_field(fields, "missing", &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn text_field_rejects_objects() {
        let body = json!({ "name": { "first": "Rex" } });
        let mut errors = Vec::new();
        assert_eq!(text_field(body.as_object().unwrap(), "name", &mut errors), None);
        assert_eq!(errors, vec![FieldError::new("name", "name must be a string")]);
    }

    #[test]
    fn require_text_flags_blank_values() {
        let mut errors = Vec::new();
        require_text("   ", "city", &mut errors);
        require_text("Pune", "zipCode", &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "city");
    }
}
