//! Anomaly detection error types.

use thiserror::Error;

/// Anomaly detection errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    /// The forest configuration cannot be built as requested.
    #[error("Invalid configuration: {name} - {reason}")]
    InvalidConfiguration { name: String, reason: String },

    /// An operation was called in a state that does not support it.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AnomalyError {
    /// Shorthand for [`AnomalyError::InvalidConfiguration`].
    pub fn invalid_configuration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnomalyError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Error returned when a detector is queried before `fit()`.
    pub fn not_fitted() -> Self {
        AnomalyError::InvalidState("detector not fitted: call fit() before scoring".to_string())
    }
}

/// Result type for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let error = AnomalyError::InvalidConfiguration {
            name: "sample_size".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: sample_size - must be at least 1"
        );
    }

    #[test]
    fn test_invalid_configuration_helper() {
        let error = AnomalyError::invalid_configuration("attributes", "must not be empty");
        assert_eq!(
            error,
            AnomalyError::InvalidConfiguration {
                name: "attributes".to_string(),
                reason: "must not be empty".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_state_display() {
        let error = AnomalyError::InvalidState("forest is empty".to_string());
        assert_eq!(error.to_string(), "Invalid state: forest is empty");
    }

    #[test]
    fn test_not_fitted_message() {
        let error = AnomalyError::not_fitted();
        assert!(error.to_string().contains("fit()"));
        assert!(matches!(error, AnomalyError::InvalidState(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let error = AnomalyError::not_fitted();
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidState"));
    }

    #[test]
    fn test_invalid_configuration_debug() {
        let error = AnomalyError::invalid_configuration("sample_size", "300 exceeds population size 15");
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidConfiguration"));
        assert!(debug_str.contains("300"));
        assert!(debug_str.contains("15"));
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(AnomalyError::not_fitted());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AnomalyError::InvalidState(_)));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(AnomalyError::invalid_configuration("n_trees", "must be positive"));
        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn test_all_error_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnomalyError>();
    }
}
