//! Error taxonomy for rategate domain operations.

use thiserror::Error;

/// rategate domain errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("covariate key must not be empty")]
    EmptyCovariateKey,

    #[error("duplicate covariate key in declaration: {key}")]
    DuplicateCovariateKey { key: String },

    #[error("custom covariate key {key} requires an explicit category")]
    MissingCategory { key: String },

    #[error("invalid factor value for {key}: {reason}")]
    InvalidFactorValue { key: String, reason: String },

    #[error("baseline rate must be within [0, 1], got {rate}")]
    RateOutOfRange { rate: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositiveSamples { field: &'static str, value: u64 },

    #[error("confidence must be within (0, 1) exclusive, got {confidence}")]
    ConfidenceOutOfRange { confidence: f64 },

    #[error("observation recorded {successes} successes over {samples} samples")]
    SuccessesExceedSamples { successes: u64, samples: u64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for rategate domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::DuplicateCovariateKey {
            key: "region".to_string(),
        };
        assert!(err.to_string().contains("duplicate covariate key"));
        assert!(err.to_string().contains("region"));

        let err = DomainError::RateOutOfRange { rate: 1.5 };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_non_positive_samples_names_field() {
        let err = DomainError::NonPositiveSamples {
            field: "baseline_samples",
            value: 0,
        };
        assert!(err.to_string().contains("baseline_samples"));
    }
}
