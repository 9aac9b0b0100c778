//! Unified error type for the analytics engine
//!
//! Every validation failure is surfaced to the caller with the offending
//! value(s) attached. Nothing inside the engine retries or recovers.

use thiserror::Error;

/// Top-level error type for all pacers operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaceError {
    /// Too few weeks, days or stream samples for the calculation
    #[error("Insufficient data for {calculation}: need at least {required}, got {actual}")]
    InsufficientData {
        calculation: String,
        required: usize,
        actual: usize,
    },

    /// Zero or negative denominator, or otherwise unusable reference values
    #[error("Degenerate input for {calculation}: {reason}")]
    DegenerateInput { calculation: String, reason: String },

    /// Race distance name not in the supported table
    #[error("Unknown distance: {name}. Use one of: {supported}")]
    UnknownDistance { name: String, supported: String },

    /// Value outside its physiological or physical plausibility bounds
    #[error("{parameter} must be between {min} and {max}, got {value}")]
    RangeError {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No reference value supplied where at least one is needed
    #[error("Input required for {calculation}: provide at least one of {options}")]
    InputRequired { calculation: String, options: String },

    /// Time string that is not H:MM:SS or M:SS
    #[error("Invalid time format: {input:?}. Use H:MM:SS or M:SS")]
    InvalidTime { input: String },

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for pacers operations
pub type Result<T> = std::result::Result<T, PaceError>;

impl PaceError {
    pub(crate) fn insufficient(calculation: &str, required: usize, actual: usize) -> Self {
        PaceError::InsufficientData {
            calculation: calculation.to_string(),
            required,
            actual,
        }
    }

    pub(crate) fn degenerate(calculation: &str, reason: impl Into<String>) -> Self {
        PaceError::DegenerateInput {
            calculation: calculation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(parameter: &str, value: f64, min: f64, max: f64) -> Self {
        PaceError::RangeError {
            parameter: parameter.to_string(),
            value,
            min,
            max,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PaceError::InsufficientData { .. } => ErrorSeverity::Warning,
            PaceError::InputRequired { .. } => ErrorSeverity::Warning,
            PaceError::DegenerateInput { .. } => ErrorSeverity::Warning,
            PaceError::Configuration(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PaceError::InsufficientData {
                calculation,
                required,
                ..
            } => format!(
                "Not enough data to calculate {}. At least {} entries are needed.",
                calculation, required
            ),
            PaceError::UnknownDistance { name, .. } => {
                format!("'{}' is not a supported race distance.", name)
            }
            PaceError::InvalidTime { input } => {
                format!("Could not read '{}' as a time. Use H:MM:SS or M:SS.", input)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Broken setup, nothing can be computed
    Critical,
    /// Invalid caller input
    Error,
    /// Input is valid but not enough to say anything
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = PaceError::insufficient("weekly ACWR", 5, 3);
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = PaceError::out_of_range("max_hr", 260.0, 100.0, 230.0);
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_messages_carry_offending_values() {
        let err = PaceError::out_of_range("resting_hr", 130.0, 25.0, 120.0);
        let msg = err.to_string();
        assert!(msg.contains("resting_hr"));
        assert!(msg.contains("130"));

        let err = PaceError::insufficient("daily ACWR", 28, 10);
        assert!(err.to_string().contains("28"));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_user_messages() {
        let err = PaceError::UnknownDistance {
            name: "ultra".to_string(),
            supported: "5k, 10k".to_string(),
        };
        assert!(err.user_message().contains("ultra"));

        let err = PaceError::InvalidTime {
            input: "abc".to_string(),
        };
        assert!(err.user_message().contains("H:MM:SS"));
    }
}
