//! rategate core - baseline selection and threshold derivation
//!
//! The working subsystem behind statistical acceptance gates:
//! - Resolves a use case's declared covariates into a profile for the
//!   current run (injected clock and environment, no ambient reads)
//! - Matches the profile against stored baseline candidates per covariate
//! - Selects the best-matching baseline (hard gates, soft scoring,
//!   recency tie-breaking, ambiguity detection)
//! - Derives the minimum pass rate the run must clear at a target
//!   confidence, propagating sampling uncertainty from both populations
//!
//! Everything here is pure, synchronous, and deterministic over immutable
//! inputs. Registries are populated once and shared read-only.

pub mod context;
pub mod error;
pub mod fakes;
pub mod matching;
pub mod repository;
pub mod resolve;
pub mod select;
pub mod stat;
pub mod threshold;

// Re-export key types
pub use context::{DayGrouping, ResolutionContext};
pub use error::{RepositoryError, Result};
pub use matching::{
    CovariateMatcher, ExactStringMatcher, GroupLabelMatcher, MatcherRegistry, TimeWindowMatcher,
};
pub use repository::BaselineRepository;
pub use resolve::{CovariateResolver, ResolverRegistry};
pub use select::BaselineSelector;
pub use threshold::{
    assess_discriminative_power, DerivedThreshold, SampleSizeDiagnostic, ThresholdDeriver,
};
