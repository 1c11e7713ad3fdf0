//! Minimum-pass-rate derivation.
//!
//! Turns a selected baseline's observed rate and sample size into the
//! smallest pass rate a new, typically smaller run must clear at a target
//! confidence. Sampling uncertainty in BOTH populations is accounted for:
//! the baseline's through a one-sided confidence floor on its true rate,
//! the new run's through an exact one-sided binomial test sized at its
//! sample count.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rategate_domain::{DerivationContext, DomainError};

use crate::stat::{
    min_successes_above_alpha, normal_quantile, proportion_standard_error,
};

/// Derived acceptance threshold for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedThreshold {
    /// Smallest observed rate that still passes.
    pub minimum_pass_rate: f64,

    /// Smallest success count that still passes.
    pub minimum_passing_samples: u64,

    /// One-sided confidence floor on the baseline's true rate.
    pub baseline_floor: f64,

    /// Standard error of the baseline rate (normal approximation).
    pub standard_error: f64,

    /// Confidence the threshold was derived at.
    pub confidence: f64,

    /// Sample count the binomial test was sized for.
    pub test_samples: u64,
}

/// Derives minimum pass rates from validated derivation contexts.
pub struct ThresholdDeriver;

impl ThresholdDeriver {
    /// Compute the minimum pass rate for a run.
    ///
    /// 1. Standard error of the baseline rate, `sqrt(p(1-p)/n)`, zero at
    ///    the degenerate rates.
    /// 2. One-sided confidence floor for the baseline's true success
    ///    probability: `max(0, p - z(confidence) * SE)`.
    /// 3. The floor becomes the hypothesized rate of a one-sided binomial
    ///    test over the new run's sample count: the minimum passing
    ///    success count is the smallest k whose lower-tail probability
    ///    exceeds `1 - confidence`. Observing fewer would reject "true
    ///    rate at or above the floor" at the configured confidence.
    ///
    /// Small test runs get a looser threshold; as `test_samples` grows the
    /// threshold converges to the floor from below.
    pub fn derive(ctx: &DerivationContext) -> DerivedThreshold {
        let p = ctx.baseline_rate();
        let standard_error = proportion_standard_error(p, ctx.baseline_samples());
        let z = normal_quantile(ctx.confidence());
        let baseline_floor = (p - z * standard_error).max(0.0);

        let alpha = 1.0 - ctx.confidence();
        let minimum_passing_samples =
            min_successes_above_alpha(ctx.test_samples(), baseline_floor, alpha);
        let minimum_pass_rate = minimum_passing_samples as f64 / ctx.test_samples() as f64;

        debug!(
            baseline_rate = p,
            baseline_floor,
            standard_error,
            minimum_pass_rate,
            test_samples = ctx.test_samples(),
            "derived acceptance threshold"
        );

        DerivedThreshold {
            minimum_pass_rate,
            minimum_passing_samples,
            baseline_floor,
            standard_error,
            confidence: ctx.confidence(),
            test_samples: ctx.test_samples(),
        }
    }
}

/// Outcome of the sample-sizing diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleSizeDiagnostic {
    /// Sample count under assessment.
    pub samples: u64,

    /// The high rate the run is meant to demonstrate.
    pub target_rate: f64,

    /// The slightly lower rate it must be distinguishable from.
    pub degraded_rate: f64,

    /// Confidence the assessment ran at.
    pub confidence: f64,

    /// Whether even a perfect run of `samples` can reject the degraded
    /// rate at the configured confidence.
    pub distinguishable: bool,

    /// Smallest sample count that could distinguish the rates; `None`
    /// when no finite count can (degraded rate of 1).
    pub required_samples: Option<u64>,
}

/// Flag sample counts too small to ever distinguish a high target rate
/// from a slightly lower one.
///
/// A perfect run of n successes rejects "true rate <= degraded_rate" only
/// when `degraded_rate^n <= 1 - confidence`. Informational, never
/// blocking: callers render the warning and proceed.
pub fn assess_discriminative_power(
    samples: u64,
    target_rate: f64,
    degraded_rate: f64,
    confidence: f64,
) -> Result<SampleSizeDiagnostic, DomainError> {
    if !target_rate.is_finite() || !(0.0..=1.0).contains(&target_rate) {
        return Err(DomainError::RateOutOfRange { rate: target_rate });
    }
    if !degraded_rate.is_finite() || !(0.0..=1.0).contains(&degraded_rate) {
        return Err(DomainError::RateOutOfRange {
            rate: degraded_rate,
        });
    }
    if samples == 0 {
        return Err(DomainError::NonPositiveSamples {
            field: "samples",
            value: samples,
        });
    }
    if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
        return Err(DomainError::ConfidenceOutOfRange { confidence });
    }

    let alpha = 1.0 - confidence;
    let (distinguishable, required_samples) = if degraded_rate <= 0.0 {
        // Any success at all refutes a zero rate.
        (true, Some(1))
    } else if degraded_rate >= 1.0 {
        (false, None)
    } else {
        let required = (alpha.ln() / degraded_rate.ln()).ceil() as u64;
        let required = required.max(1);
        (samples >= required, Some(required))
    };

    if !distinguishable {
        warn!(
            samples,
            target_rate,
            degraded_rate,
            confidence,
            required = ?required_samples,
            "sample count cannot distinguish target rate from degraded rate"
        );
    }

    Ok(SampleSizeDiagnostic {
        samples,
        target_rate,
        degraded_rate,
        confidence,
        distinguishable,
        required_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(rate: f64, baseline_n: u64, test_n: u64, confidence: f64) -> DerivationContext {
        DerivationContext::new(rate, baseline_n, test_n, confidence).expect("valid context")
    }

    #[test]
    fn test_reference_scenario_bounds() {
        // Baseline 0.87 over 1000 samples, run of 100, confidence 0.95:
        // the derived minimum must sit strictly inside (0, 0.87).
        let threshold = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.95));
        assert!(threshold.minimum_pass_rate > 0.0);
        assert!(threshold.minimum_pass_rate < 0.87);
        assert!(threshold.baseline_floor < 0.87);
        assert!(threshold.baseline_floor > 0.8);
    }

    #[test]
    fn test_degenerate_rates_never_nan() {
        let t = ThresholdDeriver::derive(&ctx(0.0, 50, 20, 0.95));
        assert_eq!(t.standard_error, 0.0);
        assert_eq!(t.baseline_floor, 0.0);
        assert_eq!(t.minimum_passing_samples, 0);
        assert_eq!(t.minimum_pass_rate, 0.0);

        let t = ThresholdDeriver::derive(&ctx(1.0, 50, 20, 0.95));
        assert_eq!(t.standard_error, 0.0);
        assert_eq!(t.baseline_floor, 1.0);
        // A degenerate perfect baseline demands a perfect run.
        assert_eq!(t.minimum_passing_samples, 20);
        assert_eq!(t.minimum_pass_rate, 1.0);
    }

    #[test]
    fn test_small_runs_get_looser_thresholds() {
        let tiny = ThresholdDeriver::derive(&ctx(0.87, 1000, 5, 0.95));
        let small = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.95));
        let large = ThresholdDeriver::derive(&ctx(0.87, 1000, 10_000, 0.95));

        assert!(tiny.minimum_pass_rate <= small.minimum_pass_rate);
        assert!(small.minimum_pass_rate <= large.minimum_pass_rate);
    }

    #[test]
    fn test_threshold_converges_to_floor_from_below() {
        let t = ThresholdDeriver::derive(&ctx(0.87, 1000, 1_000_000, 0.95));
        assert!(t.minimum_pass_rate <= t.baseline_floor);
        assert!(t.baseline_floor - t.minimum_pass_rate < 0.005);
    }

    #[test]
    fn test_threshold_is_deterministic() {
        let a = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.95));
        let b = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.95));
        assert_eq!(a, b);
    }

    #[test]
    fn test_higher_confidence_lowers_threshold_floor() {
        // More confidence means a lower floor on the baseline's true rate.
        let loose = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.80));
        let strict = ThresholdDeriver::derive(&ctx(0.87, 1000, 100, 0.99));
        assert!(strict.baseline_floor < loose.baseline_floor);
    }

    #[test]
    fn test_discriminative_power_flags_tiny_runs() {
        // 0.95^10 ~ 0.60 > 0.05: ten samples cannot refute a 0.95 rate.
        let diag = assess_discriminative_power(10, 0.99, 0.95, 0.95).expect("diagnostic");
        assert!(!diag.distinguishable);
        // ln(0.05)/ln(0.95) ~ 58.4, so 59 samples are needed.
        assert_eq!(diag.required_samples, Some(59));

        let diag = assess_discriminative_power(100, 0.99, 0.95, 0.95).expect("diagnostic");
        assert!(diag.distinguishable);
    }

    #[test]
    fn test_discriminative_power_edges() {
        let diag = assess_discriminative_power(10, 0.99, 0.0, 0.95).expect("diagnostic");
        assert!(diag.distinguishable);
        assert_eq!(diag.required_samples, Some(1));

        let diag = assess_discriminative_power(10, 1.0, 1.0, 0.95).expect("diagnostic");
        assert!(!diag.distinguishable);
        assert_eq!(diag.required_samples, None);
    }

    #[test]
    fn test_discriminative_power_validates_inputs() {
        assert!(assess_discriminative_power(0, 0.99, 0.95, 0.95).is_err());
        assert!(assess_discriminative_power(10, 1.5, 0.95, 0.95).is_err());
        assert!(assess_discriminative_power(10, 0.99, -0.1, 0.95).is_err());
        assert!(assess_discriminative_power(10, 0.99, 0.95, 1.0).is_err());
    }
}
