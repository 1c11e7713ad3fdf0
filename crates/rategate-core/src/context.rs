//! Resolution context: the injected environment snapshot.
//!
//! Resolvers never read a global clock or process environment. Everything
//! ambient (the current instant, the experiment timing window, the zone,
//! region, environment and property maps) is injected here once, so
//! repeated resolution against the same context is stable and runs are
//! reproducible.

use chrono::{DateTime, FixedOffset, Offset, Utc, Weekday};
use std::collections::BTreeMap;

/// Caller-defined classification of calendar days into named groups.
#[derive(Debug, Clone)]
pub struct DayGrouping {
    groups: Vec<(String, Vec<Weekday>)>,
}

impl DayGrouping {
    /// Grouping with no groups; every day classifies as unresolved.
    pub fn none() -> Self {
        Self { groups: Vec::new() }
    }

    /// The default WEEKDAY/WEEKEND split.
    pub fn weekday_weekend() -> Self {
        Self::none()
            .group(
                "WEEKDAY",
                [
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                ],
            )
            .group("WEEKEND", [Weekday::Sat, Weekday::Sun])
    }

    /// Add a named group. First matching group wins at classification.
    pub fn group(mut self, label: impl Into<String>, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.groups.push((label.into(), days.into_iter().collect()));
        self
    }

    /// Group label for a weekday, if any group contains it.
    pub fn classify(&self, day: Weekday) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, days)| days.contains(&day))
            .map(|(label, _)| label.as_str())
    }
}

impl Default for DayGrouping {
    fn default() -> Self {
        Self::weekday_weekend()
    }
}

/// Injected snapshot of the run's environment.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    now: DateTime<Utc>,
    zone_label: String,
    offset: FixedOffset,
    experiment_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    region: Option<String>,
    environment: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
    day_grouping: DayGrouping,
}

impl ResolutionContext {
    /// Context at a fixed instant, UTC zone, default day grouping.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            zone_label: "UTC".to_string(),
            offset: Utc.fix(),
            experiment_window: None,
            region: None,
            environment: BTreeMap::new(),
            properties: BTreeMap::new(),
            day_grouping: DayGrouping::default(),
        }
    }

    /// Configure the zone the run reasons in: a label for canonical
    /// strings plus the fixed offset used for local-time arithmetic.
    pub fn with_zone(mut self, label: impl Into<String>, offset: FixedOffset) -> Self {
        self.zone_label = label.into();
        self.offset = offset;
        self
    }

    /// Record the experiment engine's measurement window.
    pub fn with_experiment_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.experiment_window = Some((start, end));
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Add one framework-scoped environment entry.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Add one system-property entry. Properties take precedence over the
    /// environment map in generic resolution.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_day_grouping(mut self, grouping: DayGrouping) -> Self {
        self.day_grouping = grouping;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn zone_label(&self) -> &str {
        &self.zone_label
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn experiment_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.experiment_window
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn day_grouping(&self) -> &DayGrouping {
        &self.day_grouping
    }

    /// An instant shifted into the configured zone.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// The current instant in the configured zone.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.to_local(self.now)
    }
}
