//! Validated inputs to threshold derivation.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Inputs to minimum-pass-rate derivation, validated at construction.
///
/// Invalid statistical inputs fail fast with a descriptive error; values
/// are never silently clamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DerivationContext {
    baseline_rate: f64,
    baseline_samples: u64,
    test_samples: u64,
    confidence: f64,
}

impl DerivationContext {
    pub fn new(
        baseline_rate: f64,
        baseline_samples: u64,
        test_samples: u64,
        confidence: f64,
    ) -> Result<Self> {
        if !baseline_rate.is_finite() || !(0.0..=1.0).contains(&baseline_rate) {
            return Err(DomainError::RateOutOfRange {
                rate: baseline_rate,
            });
        }
        if baseline_samples == 0 {
            return Err(DomainError::NonPositiveSamples {
                field: "baseline_samples",
                value: baseline_samples,
            });
        }
        if test_samples == 0 {
            return Err(DomainError::NonPositiveSamples {
                field: "test_samples",
                value: test_samples,
            });
        }
        if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(DomainError::ConfidenceOutOfRange { confidence });
        }
        Ok(Self {
            baseline_rate,
            baseline_samples,
            test_samples,
            confidence,
        })
    }

    /// Observed success rate of the selected baseline, within [0, 1].
    pub fn baseline_rate(&self) -> f64 {
        self.baseline_rate
    }

    /// Sample count behind the baseline rate.
    pub fn baseline_samples(&self) -> u64 {
        self.baseline_samples
    }

    /// Sample count of the new run being gated.
    pub fn test_samples(&self) -> u64 {
        self.test_samples
    }

    /// Target confidence, within (0, 1) exclusive.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
