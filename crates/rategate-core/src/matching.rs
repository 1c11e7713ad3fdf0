//! Covariate matching: baseline value vs. test value, per key.
//!
//! Comparison rules (high-level):
//! - The `UNDEFINED` sentinel never conforms to anything, including
//!   another `UNDEFINED`: absence propagates as "no match".
//! - Mismatched value types for the same key yield `DoesNotConform`,
//!   never an error, so baselines from older declaration shapes degrade
//!   gracefully.
//! - Unregistered keys default to exact (case-insensitive) string
//!   matching on the canonical form.

use std::collections::BTreeMap;

use rategate_domain::covariate::TimeWindow;
use rategate_domain::{CovariateKey, CovariateValue, MatchResult};

/// Minutes in one calendar day.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Default leniency applied around baseline time windows.
pub const DEFAULT_LENIENCY_MINUTES: i64 = 30;

/// Compares a baseline's recorded value against the test run's value.
pub trait CovariateMatcher: Send + Sync {
    fn compare(&self, baseline: &CovariateValue, test: &CovariateValue) -> MatchResult;
}

/// Exact, case-insensitive comparison of canonical strings. The default
/// for every key without a registered matcher.
#[derive(Debug, Default)]
pub struct ExactStringMatcher;

impl CovariateMatcher for ExactStringMatcher {
    fn compare(&self, baseline: &CovariateValue, test: &CovariateValue) -> MatchResult {
        if baseline.is_undefined() || test.is_undefined() {
            return MatchResult::DoesNotConform;
        }
        if !same_variant(baseline, test) {
            return MatchResult::DoesNotConform;
        }
        if baseline
            .canonical_string()
            .eq_ignore_ascii_case(&test.canonical_string())
        {
            MatchResult::Conforms
        } else {
            MatchResult::DoesNotConform
        }
    }
}

/// Exact match on a resolved group label (case-sensitive: labels are
/// enumerated by the grouping, not free-form input).
#[derive(Debug, Default)]
pub struct GroupLabelMatcher;

impl CovariateMatcher for GroupLabelMatcher {
    fn compare(&self, baseline: &CovariateValue, test: &CovariateValue) -> MatchResult {
        if baseline.is_undefined() || test.is_undefined() {
            return MatchResult::DoesNotConform;
        }
        match (baseline, test) {
            (CovariateValue::Text(b), CovariateValue::Text(t)) if b == t => MatchResult::Conforms,
            _ => MatchResult::DoesNotConform,
        }
    }
}

/// Time-window matching with leniency.
///
/// Conforms when the test's point-in-time falls within
/// `[baseline_start - L, baseline_end + L]` minutes. Windows with
/// start > end wrap past midnight. A test value that is itself a window
/// contributes its start instant as the point-in-time.
#[derive(Debug)]
pub struct TimeWindowMatcher {
    leniency_minutes: i64,
}

impl TimeWindowMatcher {
    pub fn with_leniency(leniency_minutes: i64) -> Self {
        Self { leniency_minutes }
    }

    fn window_contains(&self, baseline: &TimeWindow, point_minutes: i64) -> bool {
        // Width of the lenient interval, measured forward from the lenient
        // start. rem_euclid folds wrapped windows into the same arithmetic
        // as plain ones.
        let span = (baseline.end_minutes() - baseline.start_minutes()).rem_euclid(MINUTES_PER_DAY);
        let width = span + 2 * self.leniency_minutes;
        if width >= MINUTES_PER_DAY {
            return true;
        }
        let lenient_start = baseline.start_minutes() - self.leniency_minutes;
        (point_minutes - lenient_start).rem_euclid(MINUTES_PER_DAY) <= width
    }
}

impl Default for TimeWindowMatcher {
    fn default() -> Self {
        Self::with_leniency(DEFAULT_LENIENCY_MINUTES)
    }
}

impl CovariateMatcher for TimeWindowMatcher {
    fn compare(&self, baseline: &CovariateValue, test: &CovariateValue) -> MatchResult {
        if baseline.is_undefined() || test.is_undefined() {
            return MatchResult::DoesNotConform;
        }
        let (Some(baseline_window), Some(test_window)) = (baseline.as_window(), test.as_window())
        else {
            return MatchResult::DoesNotConform;
        };
        if self.window_contains(baseline_window, test_window.start_minutes()) {
            MatchResult::Conforms
        } else {
            MatchResult::DoesNotConform
        }
    }
}

/// Registry of matchers with an exact-string default capability.
///
/// A plain ordered map; inserting for an existing key overrides the
/// earlier registration.
pub struct MatcherRegistry {
    matchers: BTreeMap<CovariateKey, Box<dyn CovariateMatcher>>,
    default_matcher: ExactStringMatcher,
}

impl MatcherRegistry {
    /// Empty registry; every key compares through the exact default.
    pub fn new() -> Self {
        Self {
            matchers: BTreeMap::new(),
            default_matcher: ExactStringMatcher,
        }
    }

    /// Registry with the standard matchers installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            CovariateKey::time_of_day(),
            Box::new(TimeWindowMatcher::default()),
        );
        registry.register(CovariateKey::day_group(), Box::new(GroupLabelMatcher));
        registry
    }

    /// Register a matcher for a key, overriding any earlier registration.
    pub fn register(&mut self, key: CovariateKey, matcher: Box<dyn CovariateMatcher>) {
        self.matchers.insert(key, matcher);
    }

    /// Compare a baseline and test value under the key's matcher.
    pub fn compare(
        &self,
        key: &CovariateKey,
        baseline: &CovariateValue,
        test: &CovariateValue,
    ) -> MatchResult {
        match self.matchers.get(key) {
            Some(matcher) => matcher.compare(baseline, test),
            None => self.default_matcher.compare(baseline, test),
        }
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn same_variant(a: &CovariateValue, b: &CovariateValue) -> bool {
    matches!(
        (a, b),
        (CovariateValue::Text(_), CovariateValue::Text(_))
            | (CovariateValue::TimeWindow(_), CovariateValue::TimeWindow(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn window(start: (u32, u32), end: (u32, u32)) -> CovariateValue {
        CovariateValue::window(
            NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid"),
            NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid"),
            "UTC",
        )
    }

    fn instant(h: u32, m: u32) -> CovariateValue {
        window((h, m), (h, m))
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let m = ExactStringMatcher;
        assert_eq!(
            m.compare(&CovariateValue::text("eu"), &CovariateValue::text("EU")),
            MatchResult::Conforms
        );
        assert_eq!(
            m.compare(&CovariateValue::text("EU"), &CovariateValue::text("US")),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_undefined_never_self_matches() {
        let m = ExactStringMatcher;
        assert_eq!(
            m.compare(
                &CovariateValue::undefined(),
                &CovariateValue::undefined()
            ),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_undefined_never_matches_defined() {
        let m = ExactStringMatcher;
        assert_eq!(
            m.compare(&CovariateValue::undefined(), &CovariateValue::text("EU")),
            MatchResult::DoesNotConform
        );
        assert_eq!(
            m.compare(&CovariateValue::text("EU"), &CovariateValue::undefined()),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_type_mismatch_does_not_conform() {
        let m = ExactStringMatcher;
        // Canonical strings collide, but types differ.
        assert_eq!(
            m.compare(&CovariateValue::text("09:00-10:00@UTC"), &window((9, 0), (10, 0))),
            MatchResult::DoesNotConform
        );

        let tw = TimeWindowMatcher::default();
        assert_eq!(
            tw.compare(&CovariateValue::text("morning"), &instant(9, 30)),
            MatchResult::DoesNotConform
        );
        assert_eq!(
            tw.compare(&window((9, 0), (10, 0)), &CovariateValue::text("09:30")),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_group_label_case_sensitive() {
        let m = GroupLabelMatcher;
        assert_eq!(
            m.compare(
                &CovariateValue::text("WEEKDAY"),
                &CovariateValue::text("WEEKDAY")
            ),
            MatchResult::Conforms
        );
        assert_eq!(
            m.compare(
                &CovariateValue::text("WEEKDAY"),
                &CovariateValue::text("weekday")
            ),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_window_contains_point_with_leniency() {
        let m = TimeWindowMatcher::with_leniency(30);
        let baseline = window((9, 0), (17, 0));

        assert_eq!(m.compare(&baseline, &instant(12, 0)), MatchResult::Conforms);
        // Leniency edges, inclusive.
        assert_eq!(m.compare(&baseline, &instant(8, 30)), MatchResult::Conforms);
        assert_eq!(m.compare(&baseline, &instant(17, 30)), MatchResult::Conforms);
        // Just outside.
        assert_eq!(
            m.compare(&baseline, &instant(8, 29)),
            MatchResult::DoesNotConform
        );
        assert_eq!(
            m.compare(&baseline, &instant(17, 31)),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_window_wraps_past_midnight() {
        let m = TimeWindowMatcher::with_leniency(0);
        let baseline = window((23, 30), (0, 30));

        assert_eq!(m.compare(&baseline, &instant(23, 45)), MatchResult::Conforms);
        assert_eq!(m.compare(&baseline, &instant(0, 15)), MatchResult::Conforms);
        assert_eq!(m.compare(&baseline, &instant(23, 30)), MatchResult::Conforms);
        assert_eq!(m.compare(&baseline, &instant(0, 30)), MatchResult::Conforms);
        assert_eq!(
            m.compare(&baseline, &instant(2, 0)),
            MatchResult::DoesNotConform
        );
        assert_eq!(
            m.compare(&baseline, &instant(12, 0)),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_wrapped_window_leniency_crosses_midnight_twice() {
        let m = TimeWindowMatcher::with_leniency(45);
        let baseline = window((23, 30), (0, 30));

        // 22:45 and 01:15 sit exactly on the lenient edges.
        assert_eq!(m.compare(&baseline, &instant(22, 45)), MatchResult::Conforms);
        assert_eq!(m.compare(&baseline, &instant(1, 15)), MatchResult::Conforms);
        assert_eq!(
            m.compare(&baseline, &instant(22, 44)),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_zero_width_baseline_window() {
        let m = TimeWindowMatcher::with_leniency(5);
        let baseline = instant(14, 5);
        assert_eq!(m.compare(&baseline, &instant(14, 8)), MatchResult::Conforms);
        assert_eq!(
            m.compare(&baseline, &instant(14, 11)),
            MatchResult::DoesNotConform
        );
    }

    #[test]
    fn test_leniency_covering_whole_day_always_conforms() {
        let m = TimeWindowMatcher::with_leniency(720);
        let baseline = window((9, 0), (9, 1));
        assert_eq!(m.compare(&baseline, &instant(3, 0)), MatchResult::Conforms);
    }

    #[test]
    fn test_registry_defaults_and_override() {
        let registry = MatcherRegistry::with_defaults();

        // time-of-day goes through the window matcher.
        assert_eq!(
            registry.compare(
                &CovariateKey::time_of_day(),
                &window((9, 0), (17, 0)),
                &instant(12, 0)
            ),
            MatchResult::Conforms
        );

        // Unregistered keys use the exact default.
        assert_eq!(
            registry.compare(
                &CovariateKey::region(),
                &CovariateValue::text("eu"),
                &CovariateValue::text("EU")
            ),
            MatchResult::Conforms
        );

        // Later registration overrides.
        struct NeverMatcher;
        impl CovariateMatcher for NeverMatcher {
            fn compare(&self, _b: &CovariateValue, _t: &CovariateValue) -> MatchResult {
                MatchResult::DoesNotConform
            }
        }
        let mut registry = MatcherRegistry::with_defaults();
        registry.register(CovariateKey::region(), Box::new(NeverMatcher));
        assert_eq!(
            registry.compare(
                &CovariateKey::region(),
                &CovariateValue::text("EU"),
                &CovariateValue::text("EU")
            ),
            MatchResult::DoesNotConform
        );
    }
}
