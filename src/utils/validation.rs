use crate::utils::error::{JurisError, Result};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(JurisError::invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(JurisError::invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// 金額與數量：必須為有限且不可為負
pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(JurisError::invalid(field_name, value, "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(JurisError::invalid(field_name, value, "Value cannot be negative"));
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    validate_non_negative(field_name, value)?;
    if value == 0.0 {
        return Err(JurisError::invalid(field_name, value, "Value must be greater than zero"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(JurisError::invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| JurisError::MissingFieldError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(JurisError::invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(JurisError::invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(JurisError::invalid(field_name, value, "Malformed e-mail address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("salario", 0.0).is_ok());
        assert!(validate_non_negative("salario", 1500.0).is_ok());
        assert!(validate_non_negative("salario", -0.01).is_err());
        assert!(validate_non_negative("salario", f64::NAN).is_err());
        assert!(validate_non_negative("salario", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("meses", 1.0).is_ok());
        assert!(validate_positive("meses", 0.0).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("circunstancias", 8u32, 0, 8).is_ok());
        assert!(validate_range("circunstancias", 9u32, 0, 8).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "advogado@escritorio.com.br").is_ok());
        assert!(validate_email("email", "sem-arroba.com").is_err());
        assert!(validate_email("email", "a b@c.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let absent: Option<i32> = None;
        assert_eq!(*validate_required_field("x", &present).unwrap(), 3);
        assert!(validate_required_field("x", &absent).is_err());
    }
}
