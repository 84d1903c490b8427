use super::error::AuthError;
use super::models::LoginRequest;

/// Validate email format
///
/// Basic shape check for registration: one `@`, non-empty local part and a
/// dotted domain. Expects an already-normalized address.
pub fn validate_email_format(email: &str) -> Result<(), AuthError> {
    let invalid = |message: &str| AuthError::Validation {
        field: "email",
        message: message.to_string(),
    };

    if email.is_empty() {
        return Err(invalid("Email cannot be empty"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("Invalid email format"))?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("Invalid email format"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("Invalid email format"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("Email cannot contain whitespace"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation {
            field: "password",
            message: "Password cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Checks applied before an account is created. `email` is the normalized address.
pub fn validate_registration(email: &str, request: &LoginRequest) -> Result<(), AuthError> {
    validate_email_format(email)?;
    validate_password(&request.password)
}
