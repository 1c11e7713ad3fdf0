//! In-memory fakes for the storage boundary (testing only)
//!
//! Provides `MemoryBaselineRepository`, which satisfies the
//! `BaselineRepository` contract without any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use rategate_domain::BaselineCandidate;

use crate::error::Result;
use crate::repository::BaselineRepository;

/// In-memory baseline store backed by a `HashMap<footprint, candidates>`.
#[derive(Debug, Default)]
pub struct MemoryBaselineRepository {
    buckets: Mutex<HashMap<String, Vec<BaselineCandidate>>>,
}

impl MemoryBaselineRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a candidate under its own footprint.
    pub fn insert(&self, candidate: BaselineCandidate) {
        let mut buckets = self.buckets.lock().unwrap();
        buckets
            .entry(candidate.footprint.clone())
            .or_default()
            .push(candidate);
    }
}

impl BaselineRepository for MemoryBaselineRepository {
    fn find_candidates(&self, footprint: &str) -> Result<Vec<BaselineCandidate>> {
        let buckets = self.buckets.lock().unwrap();
        Ok(buckets.get(footprint).cloned().unwrap_or_default())
    }
}
