use thiserror::Error;

#[derive(Error, Debug)]
pub enum JurisError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Invalid {kind}: {value}")]
    InvalidDocumentError { kind: String, value: String },

    #[error("Calculation error: {message}")]
    CalculationError { message: String },
}

/// 錯誤分類，用於日誌與結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Calculation,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl JurisError {
    pub fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        JurisError::InvalidValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn calculation(message: impl Into<String>) -> Self {
        JurisError::CalculationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            JurisError::IoError(_) | JurisError::ZipError(_) => ErrorCategory::Io,
            JurisError::SerializationError(_) | JurisError::CsvError(_) => {
                ErrorCategory::Serialization
            }
            JurisError::TomlError(_)
            | JurisError::ConfigError { .. }
            | JurisError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            JurisError::InvalidValueError { .. }
            | JurisError::MissingFieldError { .. }
            | JurisError::InvalidDocumentError { .. } => ErrorCategory::Validation,
            JurisError::CalculationError { .. } => ErrorCategory::Calculation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Calculation => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            JurisError::IoError(e) => format!("Could not read or write a file: {}", e),
            JurisError::SerializationError(e) => format!("Invalid JSON data: {}", e),
            JurisError::CsvError(e) => format!("Could not render the CSV report: {}", e),
            JurisError::ZipError(e) => format!("Could not build the report archive: {}", e),
            JurisError::TomlError(e) => format!("Invalid TOML file: {}", e),
            JurisError::ConfigError { message } => format!("Configuration problem: {}", message),
            JurisError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            JurisError::InvalidValueError {
                field,
                value,
                reason,
            } => format!("Field '{}' has an invalid value '{}': {}", field, value, reason),
            JurisError::MissingFieldError { field } => {
                format!("Field '{}' is required", field)
            }
            JurisError::InvalidDocumentError { kind, value } => {
                format!("'{}' is not a valid {}", value, kind)
            }
            JurisError::CalculationError { message } => {
                format!("The calculation could not be completed: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the rate table or batch TOML file against the documented layout"
            }
            ErrorCategory::Validation => "Fix the highlighted input field and run again",
            ErrorCategory::Calculation => {
                "Review the input periods and dates; they may describe an impossible scenario"
            }
            ErrorCategory::Io => "Make sure the path exists and is readable/writable",
            ErrorCategory::Serialization => {
                "Make sure the input follows the request format (tipo + dados)"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, JurisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_medium_severity() {
        let err = JurisError::invalid("salario", -1.0, "must not be negative");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("salario"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = JurisError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
