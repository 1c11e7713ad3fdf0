//! Realized covariate profiles.

use serde::{Deserialize, Serialize};

use crate::covariate::{CovariateKey, CovariateValue};

/// Ordered key→value mapping for one concrete execution.
///
/// Produced by resolving every declared key against a resolution context.
/// Invariant: iteration order always matches declaration order; entries are
/// never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CovariateProfile {
    entries: Vec<(CovariateKey, CovariateValue)>,
}

impl CovariateProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs already in declaration order.
    pub fn from_entries(entries: Vec<(CovariateKey, CovariateValue)>) -> Self {
        Self { entries }
    }

    /// Append a resolved value. Callers resolve keys in declaration order.
    pub fn push(&mut self, key: CovariateKey, value: CovariateValue) {
        self.entries.push((key, value));
    }

    /// Value for a key, if resolved.
    pub fn get(&self, key: &CovariateKey) -> Option<&CovariateValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &(CovariateKey, CovariateValue)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_preserves_insertion_order() {
        let mut profile = CovariateProfile::new();
        profile.push(CovariateKey::region(), CovariateValue::text("EU"));
        profile.push(CovariateKey::day_group(), CovariateValue::text("WEEKDAY"));
        profile.push(CovariateKey::timezone(), CovariateValue::text("UTC"));

        let keys: Vec<&str> = profile.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["region", "day-group", "timezone"]);
    }

    #[test]
    fn test_profile_lookup() {
        let profile = CovariateProfile::from_entries(vec![(
            CovariateKey::region(),
            CovariateValue::text("EU"),
        )]);

        assert_eq!(
            profile.get(&CovariateKey::region()),
            Some(&CovariateValue::text("EU"))
        );
        assert_eq!(profile.get(&CovariateKey::timezone()), None);
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = CovariateProfile::from_entries(vec![
            (CovariateKey::region(), CovariateValue::text("EU")),
            (CovariateKey::day_group(), CovariateValue::text("WEEKEND")),
        ]);

        let json = serde_json::to_string(&profile).expect("serialize");
        let back: CovariateProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(profile, back);
    }
}
