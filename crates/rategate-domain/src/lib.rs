//! rategate domain model
//!
//! Defines the immutable records the gating subsystem operates on:
//! - CovariateValue / CovariateCategory / CovariateKey: typed environmental dimensions
//! - CovariateDeclaration: the ordered set of covariates a use case cares about
//! - CovariateProfile: realized key→value mapping for one concrete run
//! - FactorValue / FactorMap: typed factor configuration, validated at the boundary
//! - BaselineCandidate / ExecutionSpec: stored empirical evidence
//! - RunObservation: the experiment engine's hand-off for a finished run
//! - ConformanceDetail / SelectionResult: outcome of baseline selection
//! - DerivationContext: validated inputs to threshold derivation
//!
//! All records are serializable; identity hashing (footprints) is SHA256-based.
//! Footprints bucket "use case + factor configuration + covariate declaration"
//! before covariate-based refinement.

pub mod candidate;
pub mod conformance;
pub mod covariate;
pub mod declaration;
pub mod derivation;
pub mod error;
pub mod factor;
pub mod footprint;
pub mod profile;

pub use candidate::{BaselineCandidate, ExecutionSpec, RunObservation};
pub use conformance::{ConformanceDetail, MatchResult, SelectionResult};
pub use covariate::{CovariateCategory, CovariateKey, CovariateValue, TimeWindow, UNDEFINED};
pub use declaration::{CovariateDeclaration, DeclarationBuilder, DeclaredCovariate};
pub use derivation::DerivationContext;
pub use error::{DomainError, Result};
pub use factor::{factor_map_from_json, FactorMap, FactorValue};
pub use footprint::{compute_footprint, short_value_hash};
pub use profile::CovariateProfile;

/// rategate domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
