//! Covariate resolution: from declared keys to live values.
//!
//! A resolver maps one covariate key to a value using only the injected
//! resolution context. Standard keys (day grouping, time-of-day window,
//! region, timezone) have built-in resolvers; unknown keys fall back to a
//! generic resolver checking the system-property map, then the
//! framework-scoped environment map, else the `UNDEFINED` sentinel.
//! Later registrations for a key override earlier ones.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use rategate_domain::covariate::TimeWindow;
use rategate_domain::{CovariateDeclaration, CovariateKey, CovariateProfile, CovariateValue};

use crate::context::ResolutionContext;

/// Maps one covariate key to live environmental data.
///
/// Resolution must be pure apart from reading the injected context, and
/// stable for repeated calls with the same context.
pub trait CovariateResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue;
}

/// Time-of-day window of the run.
///
/// When the context carries an experiment window, that window (minute
/// truncated, in the configured zone) is the value; otherwise the current
/// instant forms a zero-width window. Minute truncation keeps repeated
/// resolutions within the same wall-clock minute identical, so baseline
/// files produced moments apart under the same conditions collapse to one.
#[derive(Debug, Default)]
pub struct TimeOfDayResolver;

impl CovariateResolver for TimeOfDayResolver {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue {
        match ctx.experiment_window() {
            Some((start, end)) => CovariateValue::TimeWindow(TimeWindow::new(
                ctx.to_local(start).time(),
                ctx.to_local(end).time(),
                ctx.zone_label(),
            )),
            None => CovariateValue::TimeWindow(TimeWindow::instant(
                ctx.local_now().time(),
                ctx.zone_label(),
            )),
        }
    }
}

/// Calendar-day grouping of the run.
///
/// Classifies the zone-adjusted date, not UTC: a timestamp near midnight
/// can fall on different calendar days depending on zone.
#[derive(Debug, Default)]
pub struct DayGroupResolver;

impl CovariateResolver for DayGroupResolver {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue {
        let day = ctx.local_now().weekday();
        match ctx.day_grouping().classify(day) {
            Some(label) => CovariateValue::text(label),
            None => {
                debug!(weekday = ?day, "no day group matches, resolving as undefined");
                CovariateValue::undefined()
            }
        }
    }
}

/// Deployment region from the context.
#[derive(Debug, Default)]
pub struct RegionResolver;

impl CovariateResolver for RegionResolver {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue {
        match ctx.region() {
            Some(region) => CovariateValue::text(region),
            None => CovariateValue::undefined(),
        }
    }
}

/// Configured zone label.
#[derive(Debug, Default)]
pub struct TimezoneResolver;

impl CovariateResolver for TimezoneResolver {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue {
        CovariateValue::text(ctx.zone_label())
    }
}

/// Fallback for keys without a registered resolver: system-property map,
/// then environment map, else `UNDEFINED`.
#[derive(Debug)]
pub struct GenericResolver {
    key: CovariateKey,
}

impl GenericResolver {
    pub fn for_key(key: CovariateKey) -> Self {
        Self { key }
    }
}

impl CovariateResolver for GenericResolver {
    fn resolve(&self, ctx: &ResolutionContext) -> CovariateValue {
        if let Some(value) = ctx.property(self.key.as_str()) {
            return CovariateValue::text(value);
        }
        if let Some(value) = ctx.env_value(self.key.as_str()) {
            return CovariateValue::text(value);
        }
        CovariateValue::undefined()
    }
}

/// Registry of resolvers, populated once at startup and read-only after.
///
/// A plain ordered map; inserting for an existing key overrides the
/// earlier registration.
pub struct ResolverRegistry {
    resolvers: BTreeMap<CovariateKey, Box<dyn CovariateResolver>>,
}

impl ResolverRegistry {
    /// Empty registry; every key resolves through the generic fallback.
    pub fn new() -> Self {
        Self {
            resolvers: BTreeMap::new(),
        }
    }

    /// Registry with the standard resolvers installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CovariateKey::time_of_day(), Box::new(TimeOfDayResolver));
        registry.register(CovariateKey::day_group(), Box::new(DayGroupResolver));
        registry.register(CovariateKey::region(), Box::new(RegionResolver));
        registry.register(CovariateKey::timezone(), Box::new(TimezoneResolver));
        registry
    }

    /// Register a resolver for a key, overriding any earlier registration.
    pub fn register(&mut self, key: CovariateKey, resolver: Box<dyn CovariateResolver>) {
        self.resolvers.insert(key, resolver);
    }

    /// Resolve one key against a context.
    pub fn resolve(&self, key: &CovariateKey, ctx: &ResolutionContext) -> CovariateValue {
        match self.resolvers.get(key) {
            Some(resolver) => resolver.resolve(ctx),
            None => {
                debug!(key = %key, "no registered resolver, using generic fallback");
                GenericResolver::for_key(key.clone()).resolve(ctx)
            }
        }
    }

    /// Realize a declaration into a profile, preserving declaration order.
    pub fn resolve_profile(
        &self,
        declaration: &CovariateDeclaration,
        ctx: &ResolutionContext,
    ) -> CovariateProfile {
        let mut profile = CovariateProfile::new();
        for key in declaration.keys() {
            profile.push(key.clone(), self.resolve(key, ctx));
        }
        profile
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
