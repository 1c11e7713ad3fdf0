//! Baseline selection.
//!
//! Ranks footprint-matched candidates against the run's resolved profile:
//! configuration covariates gate hard, everything else scores soft, ties
//! break on recency, and a full tie is flagged ambiguous but still
//! returns a deterministic pick.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use rategate_domain::{
    BaselineCandidate, ConformanceDetail, CovariateDeclaration, CovariateProfile, CovariateValue,
    SelectionResult,
};

use crate::matching::MatcherRegistry;

/// Selects the stored baseline whose recorded conditions best match the
/// current run.
pub struct BaselineSelector {
    matchers: MatcherRegistry,
}

impl BaselineSelector {
    /// Selector with the standard matchers.
    pub fn new() -> Self {
        Self {
            matchers: MatcherRegistry::with_defaults(),
        }
    }

    /// Selector over a custom matcher registry.
    pub fn with_matchers(matchers: MatcherRegistry) -> Self {
        Self { matchers }
    }

    /// Select among candidates pre-filtered to a matching footprint.
    ///
    /// - Empty candidate list: no selection, not ambiguous.
    /// - Empty declaration: no scoring basis; the most recent candidate is
    ///   returned but the result is flagged ambiguous.
    /// - A candidate failing any configuration covariate is eliminated
    ///   outright, regardless of its soft score.
    /// - Survivors rank by conforming-soft-covariate count, then by
    ///   `generated_at`, both descending; a top-two tie on both is
    ///   ambiguous but still returns the first by original list order.
    pub fn select(
        &self,
        candidates: &[BaselineCandidate],
        profile: &CovariateProfile,
        declaration: &CovariateDeclaration,
    ) -> SelectionResult {
        if candidates.is_empty() {
            debug!("no baseline candidates to select from");
            return SelectionResult::no_candidates();
        }

        if declaration.is_empty() {
            return self.select_by_recency(candidates);
        }

        let mut survivors: Vec<Scored<'_>> = Vec::new();
        // Gate failures of the most recent eliminated candidate, kept for
        // diagnostics when nothing survives.
        let mut eliminated: Option<(DateTime<Utc>, Vec<ConformanceDetail>)> = None;

        for candidate in candidates {
            let details = self.conformance_details(candidate, profile, declaration);

            let gate_failures: Vec<ConformanceDetail> = details
                .iter()
                .filter(|d| {
                    declaration
                        .category_of(&d.key)
                        .is_some_and(|c| c.is_hard_gate())
                        && !d.is_conforming()
                })
                .cloned()
                .collect();

            if !gate_failures.is_empty() {
                debug!(
                    filename = %candidate.filename,
                    failures = gate_failures.len(),
                    "candidate eliminated by configuration gate"
                );
                if eliminated
                    .as_ref()
                    .is_none_or(|(at, _)| candidate.generated_at > *at)
                {
                    eliminated = Some((candidate.generated_at, gate_failures));
                }
                continue;
            }

            let score = details
                .iter()
                .filter(|d| {
                    declaration
                        .category_of(&d.key)
                        .is_some_and(|c| !c.is_hard_gate())
                        && d.is_conforming()
                })
                .count();

            debug!(filename = %candidate.filename, score, "candidate scored");
            survivors.push(Scored {
                score,
                candidate,
                details,
            });
        }

        if survivors.is_empty() {
            info!(
                candidate_count = candidates.len(),
                "every candidate eliminated by configuration gate"
            );
            return SelectionResult {
                selected: None,
                ambiguous: false,
                details: Vec::new(),
                non_conforming: eliminated.map(|(_, failures)| failures).unwrap_or_default(),
                candidate_count: candidates.len(),
            };
        }

        // Stable sort keeps original list order for full ties.
        survivors.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.candidate.generated_at.cmp(&a.candidate.generated_at))
        });

        let ambiguous = survivors.len() >= 2
            && survivors[0].score == survivors[1].score
            && survivors[0].candidate.generated_at == survivors[1].candidate.generated_at;

        if ambiguous {
            warn!(
                first = %survivors[0].candidate.filename,
                second = %survivors[1].candidate.filename,
                "top candidates tied on score and timestamp, selection is ambiguous"
            );
        }

        let winner = &survivors[0];
        let non_conforming: Vec<ConformanceDetail> = winner
            .details
            .iter()
            .filter(|d| !d.is_conforming())
            .cloned()
            .collect();

        info!(
            filename = %winner.candidate.filename,
            score = winner.score,
            ambiguous,
            candidate_count = candidates.len(),
            "baseline selected"
        );

        SelectionResult {
            selected: Some(winner.candidate.clone()),
            ambiguous,
            details: winner.details.clone(),
            non_conforming,
            candidate_count: candidates.len(),
        }
    }

    /// Recency-only selection for an empty declaration. Always ambiguous:
    /// there is no scoring basis to defend the pick.
    fn select_by_recency(&self, candidates: &[BaselineCandidate]) -> SelectionResult {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| candidates[b].generated_at.cmp(&candidates[a].generated_at));
        let winner = &candidates[order[0]];

        warn!(
            filename = %winner.filename,
            candidate_count = candidates.len(),
            "empty covariate declaration, selecting by recency only"
        );

        SelectionResult {
            selected: Some(winner.clone()),
            ambiguous: true,
            details: Vec::new(),
            non_conforming: Vec::new(),
            candidate_count: candidates.len(),
        }
    }

    fn conformance_details(
        &self,
        candidate: &BaselineCandidate,
        profile: &CovariateProfile,
        declaration: &CovariateDeclaration,
    ) -> Vec<ConformanceDetail> {
        declaration
            .keys()
            .map(|key| {
                let baseline_value = candidate
                    .profile
                    .get(key)
                    .cloned()
                    .unwrap_or_else(CovariateValue::undefined);
                let test_value = profile
                    .get(key)
                    .cloned()
                    .unwrap_or_else(CovariateValue::undefined);
                let result = self.matchers.compare(key, &baseline_value, &test_value);
                ConformanceDetail {
                    key: key.clone(),
                    baseline_value,
                    test_value,
                    result,
                }
            })
            .collect()
    }
}

impl Default for BaselineSelector {
    fn default() -> Self {
        Self::new()
    }
}

struct Scored<'a> {
    score: usize,
    candidate: &'a BaselineCandidate,
    details: Vec<ConformanceDetail>,
}
