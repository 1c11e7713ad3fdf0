//! Stored baseline candidates and the experiment engine hand-off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};
use crate::factor::FactorMap;
use crate::profile::CovariateProfile;

/// What was executed to produce a baseline: use-case identity, factor
/// configuration, and the measured outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionSpec {
    /// Use-case identifier the measurement belongs to.
    pub use_case: String,

    /// Factor configuration in effect during measurement.
    pub factors: FactorMap,

    /// Observed success rate over the measurement, within [0, 1].
    pub observed_rate: f64,

    /// Number of samples executed to observe the rate.
    pub samples_executed: u64,
}

/// Immutable, read-only baseline record as delivered from storage.
///
/// Candidates arrive already deserialized and pre-filtered to a matching
/// footprint; the filename is carried only for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaselineCandidate {
    /// Source filename of the stored record.
    pub filename: String,

    /// Footprint the record was bucketed under (8 hex chars).
    pub footprint: String,

    /// Covariate profile recorded when the baseline was measured.
    pub profile: CovariateProfile,

    /// When the baseline was generated.
    pub generated_at: DateTime<Utc>,

    /// The execution that produced the baseline.
    pub execution: ExecutionSpec,
}

impl BaselineCandidate {
    /// Promote a finished run observation into a future stored candidate.
    pub fn from_observation(
        observation: &RunObservation,
        use_case: impl Into<String>,
        factors: FactorMap,
        footprint: impl Into<String>,
        profile: CovariateProfile,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            footprint: footprint.into(),
            profile,
            generated_at: observation.recorded_at,
            execution: ExecutionSpec {
                use_case: use_case.into(),
                factors,
                observed_rate: observation.observed_rate(),
                samples_executed: observation.samples,
            },
        }
    }
}

/// Aggregated outcome of one measurement run, handed over by the
/// experiment engine together with the timing window it ran under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunObservation {
    /// Identity of the run within the experiment engine.
    pub run_id: Uuid,

    /// Samples that satisfied the measured property.
    pub successes: u64,

    /// Total samples executed.
    pub samples: u64,

    /// Experiment timing window, if the engine recorded one.
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,

    /// When the observation was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl RunObservation {
    /// Build a validated observation.
    pub fn new(
        successes: u64,
        samples: u64,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self> {
        if samples == 0 {
            return Err(DomainError::NonPositiveSamples {
                field: "samples",
                value: samples,
            });
        }
        if successes > samples {
            return Err(DomainError::SuccessesExceedSamples { successes, samples });
        }
        Ok(Self {
            run_id: Uuid::new_v4(),
            successes,
            samples,
            window,
            recorded_at,
        })
    }

    /// Observed success rate within [0, 1].
    pub fn observed_rate(&self) -> f64 {
        self.successes as f64 / self.samples as f64
    }
}
