//! The baseline storage boundary.
//!
//! Persistence (locating, parsing, and writing baseline files) lives
//! outside this crate. The selector consumes candidates already
//! deserialized and pre-filtered to a matching footprint through this
//! trait; implementations own whatever I/O they need.

use rategate_domain::BaselineCandidate;

use crate::error::Result;

/// Locates stored baselines by footprint.
///
/// Implementations must return candidates whose `footprint` field equals
/// the requested footprint; the selector does not re-filter. An unknown
/// footprint is an empty list, not an error: a use case that has never
/// been measured simply has no candidates yet.
pub trait BaselineRepository: Send + Sync {
    fn find_candidates(&self, footprint: &str) -> Result<Vec<BaselineCandidate>>;
}
