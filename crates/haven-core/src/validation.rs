//! Validation helpers bridging `validator` and [`HavenError`].

use crate::{FieldError, HavenError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a [`HavenError::Validation`] on failure.
    fn validate_request(&self) -> Result<(), HavenError> {
        self.validate().map_err(|e| validation_errors_to_haven_error(&e))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator` errors into dotted field paths (`address.city`,
/// `tags[2]`), sorted by path.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|err| FieldError {
                    field: path.clone(),
                    message: err
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Invalid value for '{path}'"), ToString::to_string),
                    code: err.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[must_use]
pub fn validation_errors_to_haven_error(errors: &ValidationErrors) -> HavenError {
    let message = field_errors(errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    HavenError::Validation(message)
}

/// Reusable field rules for `#[validate(custom(function = ...))]`.
pub mod rules {
    use validator::ValidationError;

    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
    pub fn password_complexity(password: &str) -> Result<(), ValidationError> {
        if password.len() < 8 {
            return Err(ValidationError::new("password_too_short"));
        }
        if !password.chars().any(char::is_uppercase) {
            return Err(ValidationError::new("password_missing_uppercase"));
        }
        if !password.chars().any(char::is_lowercase) {
            return Err(ValidationError::new("password_missing_lowercase"));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("password_missing_digit"));
        }
        Ok(())
    }

    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        if !(3..=32).contains(&username.len()) {
            return Err(ValidationError::new("username_length"));
        }
        if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(ValidationError::new("username_invalid_characters"));
        }
        if !username.chars().next().is_some_and(char::is_alphabetic) {
            return Err(ValidationError::new("username_must_start_with_letter"));
        }
        Ok(())
    }

    pub fn positive_price(price: f64) -> Result<(), ValidationError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ValidationError::new("price_must_be_positive"));
        }
        Ok(())
    }
}
