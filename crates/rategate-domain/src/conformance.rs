//! Conformance verdicts and selection outcomes.
//!
//! No-match and ambiguity are ordinary states of `SelectionResult`, not
//! errors; callers decide fatality.

use serde::{Deserialize, Serialize};

use crate::candidate::BaselineCandidate;
use crate::covariate::{CovariateKey, CovariateValue};

/// Verdict of comparing one baseline value against one test value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Conforms,
    DoesNotConform,
}

impl MatchResult {
    pub fn is_conforming(&self) -> bool {
        matches!(self, MatchResult::Conforms)
    }
}

/// Per-covariate comparison record produced during selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConformanceDetail {
    pub key: CovariateKey,
    pub baseline_value: CovariateValue,
    pub test_value: CovariateValue,
    pub result: MatchResult,
}

impl ConformanceDetail {
    pub fn is_conforming(&self) -> bool {
        self.result.is_conforming()
    }
}

/// Immutable outcome of baseline selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionResult {
    /// The chosen candidate, if any survived.
    pub selected: Option<BaselineCandidate>,

    /// True when the pick had no defensible basis: an empty declaration,
    /// or a top-two tie on both score and timestamp. A warning, not a
    /// failure; a candidate is still returned.
    pub ambiguous: bool,

    /// Full per-covariate details for the selected candidate.
    pub details: Vec<ConformanceDetail>,

    /// Non-conforming subset, for rendering warnings. When the hard gate
    /// eliminated every candidate this carries the gate failures of the
    /// most recent eliminated candidate instead.
    pub non_conforming: Vec<ConformanceDetail>,

    /// How many candidates were considered.
    pub candidate_count: usize,
}

impl SelectionResult {
    /// Result for an empty candidate list.
    pub fn no_candidates() -> Self {
        Self {
            selected: None,
            ambiguous: false,
            details: Vec::new(),
            non_conforming: Vec::new(),
            candidate_count: 0,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Whether the selected candidate conformed on every declared covariate.
    pub fn fully_conforming(&self) -> bool {
        self.has_selection() && self.non_conforming.is_empty()
    }
}
