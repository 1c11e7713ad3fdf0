//! Covariate keys, categories, and values.
//!
//! A covariate is one environmental dimension that may influence a measured
//! success rate. Values are a closed union of plain text and minute-truncated
//! time windows; equality and hashing go through the canonical string only,
//! never structural comparison, so two windows recorded seconds apart inside
//! the same wall-clock minute are the same value.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Sentinel canonical string for a covariate that could not be resolved.
///
/// Guaranteed to never conform to anything, including another `UNDEFINED`.
pub const UNDEFINED: &str = "UNDEFINED";

/// Matching-strictness category of a declared covariate.
///
/// `Configuration` is the hard gate: one non-conforming configuration
/// covariate disqualifies a baseline candidate outright. All other
/// categories are soft and only contribute to the conformance score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CovariateCategory {
    /// Hard gate: non-conformance disqualifies the candidate.
    Configuration,

    /// Time-derived conditions (day grouping, time-of-day windows).
    Temporal,

    /// Operating conditions of the run (load profile, traffic class).
    Operational,

    /// Where the run executed (region, timezone, host class).
    Infrastructure,

    /// Recorded for reporting only; still scored, never gating.
    Informational,
}

impl CovariateCategory {
    /// Whether non-conformance in this category disqualifies a candidate.
    pub fn is_hard_gate(&self) -> bool {
        matches!(self, CovariateCategory::Configuration)
    }
}

/// Identifier of one covariate dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CovariateKey(String);

impl CovariateKey {
    /// Standard key: calendar-day grouping (e.g. WEEKDAY/WEEKEND).
    pub const DAY_GROUP: &'static str = "day-group";

    /// Standard key: time-of-day window of the measurement.
    pub const TIME_OF_DAY: &'static str = "time-of-day";

    /// Standard key: deployment region.
    pub const REGION: &'static str = "region";

    /// Standard key: configured timezone label.
    pub const TIMEZONE: &'static str = "timezone";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn day_group() -> Self {
        Self::new(Self::DAY_GROUP)
    }

    pub fn time_of_day() -> Self {
        Self::new(Self::TIME_OF_DAY)
    }

    pub fn region() -> Self {
        Self::new(Self::REGION)
    }

    pub fn timezone() -> Self {
        Self::new(Self::TIMEZONE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Built-in category for the standard keys; `None` for custom keys,
    /// which must declare their category explicitly.
    pub fn builtin_category(&self) -> Option<CovariateCategory> {
        match self.0.as_str() {
            Self::DAY_GROUP | Self::TIME_OF_DAY => Some(CovariateCategory::Temporal),
            Self::REGION | Self::TIMEZONE => Some(CovariateCategory::Infrastructure),
            _ => None,
        }
    }
}

impl fmt::Display for CovariateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CovariateKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A time-of-day window, truncated to whole minutes in a named zone.
///
/// Zero-width windows (start == end) represent a single instant. Windows
/// with start > end wrap past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub zone: String,
}

impl TimeWindow {
    /// Build a window, truncating both endpoints to whole minutes.
    pub fn new(start: NaiveTime, end: NaiveTime, zone: impl Into<String>) -> Self {
        Self {
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
            zone: zone.into(),
        }
    }

    /// Zero-width window at a single instant.
    pub fn instant(at: NaiveTime, zone: impl Into<String>) -> Self {
        let at = truncate_to_minute(at);
        Self {
            start: at,
            end: at,
            zone: zone.into(),
        }
    }

    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }

    /// Start expressed as minutes since midnight.
    pub fn start_minutes(&self) -> i64 {
        minutes_of_day(self.start)
    }

    /// End expressed as minutes since midnight.
    pub fn end_minutes(&self) -> i64 {
        minutes_of_day(self.end)
    }

    /// Whether the window wraps past midnight (start after end).
    pub fn wraps_midnight(&self) -> bool {
        self.start_minutes() > self.end_minutes()
    }

    fn canonical(&self) -> String {
        format!(
            "{}-{}@{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.zone
        )
    }
}

/// Typed value of one covariate dimension.
///
/// Closed union: plain text or a minute-truncated time window. Matching
/// dispatch and hash input both use `canonical_string()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CovariateValue {
    /// Plain textual value (region names, group labels, custom readings).
    Text(String),

    /// Time-of-day window in a named zone.
    TimeWindow(TimeWindow),
}

impl CovariateValue {
    pub fn text(value: impl Into<String>) -> Self {
        CovariateValue::Text(value.into())
    }

    pub fn window(start: NaiveTime, end: NaiveTime, zone: impl Into<String>) -> Self {
        CovariateValue::TimeWindow(TimeWindow::new(start, end, zone))
    }

    /// The sentinel for a covariate that could not be resolved.
    pub fn undefined() -> Self {
        CovariateValue::Text(UNDEFINED.to_string())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, CovariateValue::Text(s) if s == UNDEFINED)
    }

    /// Canonical form used for matching dispatch and hash input.
    ///
    /// Time windows render as `HH:MM-HH:MM@zone`.
    pub fn canonical_string(&self) -> String {
        match self {
            CovariateValue::Text(s) => s.clone(),
            CovariateValue::TimeWindow(w) => w.canonical(),
        }
    }

    /// The window, if this value is one.
    pub fn as_window(&self) -> Option<&TimeWindow> {
        match self {
            CovariateValue::TimeWindow(w) => Some(w),
            CovariateValue::Text(_) => None,
        }
    }
}

// Equality and hashing go through the canonical string only. Structural
// equality would distinguish windows that differ below minute precision,
// which the canonical form intentionally discards.
impl PartialEq for CovariateValue {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_string() == other.canonical_string()
    }
}

impl Eq for CovariateValue {}

impl Hash for CovariateValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_string().hash(state);
    }
}

impl fmt::Display for CovariateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

fn minutes_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}
