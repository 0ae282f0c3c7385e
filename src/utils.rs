//! Input validation for the checkout form fields.

use upcart::{format_phone, is_complete_phone, is_known_jurisdiction};

/// Require a non-empty value, returning it trimmed.
pub fn validate_required(input: &str, field_name: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(format!("{} is required", field_name))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Email is optional, but a non-empty value must at least look deliverable.
pub fn validate_email(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains('@') {
        Ok(trimmed.to_string())
    } else {
        Err("Enter a valid email address".to_string())
    }
}

/// Normalize the phone input and require the full XXX-XXX-XXXX shape.
pub fn validate_phone(input: &str) -> Result<String, String> {
    let formatted = format_phone(input);
    if is_complete_phone(&formatted) {
        Ok(formatted)
    } else {
        Err("Enter a phone number as XXX-XXX-XXXX".to_string())
    }
}

/// The state dropdown must name a recognized jurisdiction.
pub fn validate_jurisdiction(input: &str) -> Result<String, String> {
    if is_known_jurisdiction(input) {
        Ok(input.to_string())
    } else {
        Err("Select the state on your license".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_reject_whitespace() {
        assert_eq!(validate_required("  Ada ", "First name"), Ok("Ada".to_string()));
        assert_eq!(
            validate_required("   ", "First name"),
            Err("First name is required".to_string())
        );
    }

    #[test]
    fn email_is_optional_but_checked_when_present() {
        assert_eq!(validate_email(""), Ok(String::new()));
        assert_eq!(validate_email("a@b.example"), Ok("a@b.example".to_string()));
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn phone_validation_normalizes_before_checking() {
        assert_eq!(validate_phone("1234567890"), Ok("123-456-7890".to_string()));
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn jurisdiction_must_be_on_the_list() {
        assert_eq!(validate_jurisdiction("Texas"), Ok("Texas".to_string()));
        assert!(validate_jurisdiction("").is_err());
        assert!(validate_jurisdiction("Guam").is_err());
    }
}
