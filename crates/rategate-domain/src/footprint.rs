//! Footprint computation.
//!
//! A footprint is a short stable identifier bucketing "use-case identity +
//! factor configuration + covariate declaration" before covariate-based
//! refinement. Hash input is `\0`-framed: the use-case id, then factor
//! key/value pairs in key-sorted order (insertion order must never affect
//! the hash), then declaration keys in declaration order (order matters
//! here, unlike factors).

use sha2::{Digest, Sha256};

use crate::covariate::CovariateValue;
use crate::declaration::CovariateDeclaration;
use crate::factor::FactorMap;

/// Hex length of a footprint (truncated SHA-256).
pub const FOOTPRINT_LEN: usize = 8;

/// Hex length of the short covariate value hash used in stored filenames.
pub const VALUE_HASH_LEN: usize = 4;

/// Compute the footprint for a use case under a factor configuration and
/// covariate declaration.
///
/// An empty factor map is identical to absent factors, and an empty
/// declaration is identical to no declaration: both contribute nothing to
/// the hash input.
pub fn compute_footprint(
    use_case_id: &str,
    factors: &FactorMap,
    declaration: &CovariateDeclaration,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(use_case_id.as_bytes());
    hasher.update(b"\0");

    // FactorMap iterates key-sorted by construction.
    for (key, value) in factors {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.canonical_string().as_bytes());
        hasher.update(b"\0");
    }

    for key in declaration.keys() {
        hasher.update(key.as_str().as_bytes());
        hasher.update(b"\0");
    }

    let full = hex::encode(hasher.finalize());
    full[..FOOTPRINT_LEN].to_string()
}

/// Short hash of one covariate value's canonical string.
///
/// The persistence layer appends these to stored filenames
/// (`{useCase}-{footprint:4}[-{valueHash:4}]*.yaml`); exposing the rule
/// here keeps stored names and in-memory records consistent.
pub fn short_value_hash(value: &CovariateValue) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.canonical_string().as_bytes());
    let full = hex::encode(hasher.finalize());
    full[..VALUE_HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariate::{CovariateCategory, CovariateKey};
    use crate::factor::FactorValue;

    fn decl(keys: &[&str]) -> CovariateDeclaration {
        let mut builder = CovariateDeclaration::builder();
        for key in keys {
            builder = builder
                .covariate_with_category(CovariateKey::new(*key), CovariateCategory::Operational);
        }
        builder.build().expect("declaration")
    }

    fn factors(pairs: &[(&str, FactorValue)]) -> FactorMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_footprint_is_short_hex() {
        let fp = compute_footprint("uc", &FactorMap::new(), &CovariateDeclaration::empty());
        assert_eq!(fp.len(), FOOTPRINT_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_footprint_stable_under_factor_insertion_order() {
        let a = factors(&[
            ("alpha", FactorValue::Integer(1)),
            ("beta", FactorValue::Text("x".to_string())),
        ]);
        // Same pairs inserted in reverse order.
        let mut b = FactorMap::new();
        b.insert("beta".to_string(), FactorValue::Text("x".to_string()));
        b.insert("alpha".to_string(), FactorValue::Integer(1));

        let d = decl(&["k1"]);
        assert_eq!(compute_footprint("uc", &a, &d), compute_footprint("uc", &b, &d));
    }

    #[test]
    fn test_footprint_differs_on_use_case() {
        let d = decl(&["k1"]);
        let a = compute_footprint("uc-a", &FactorMap::new(), &d);
        let b = compute_footprint("uc-b", &FactorMap::new(), &d);
        assert_ne!(a, b);
    }

    #[test]
    fn test_footprint_differs_on_factor_value() {
        let d = decl(&["k1"]);
        let a = compute_footprint("uc", &factors(&[("t", FactorValue::Float(0.5))]), &d);
        let b = compute_footprint("uc", &factors(&[("t", FactorValue::Float(0.7))]), &d);
        assert_ne!(a, b);
    }

    #[test]
    fn test_footprint_sensitive_to_declaration_order() {
        let a = compute_footprint("uc", &FactorMap::new(), &decl(&["k1", "k2"]));
        let b = compute_footprint("uc", &FactorMap::new(), &decl(&["k2", "k1"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_factors_equal_absent_factors() {
        // No separate "absent" representation exists; empty is the identity.
        let d = decl(&["k1"]);
        let empty = compute_footprint("uc", &FactorMap::new(), &d);
        let empty2 = compute_footprint("uc", &FactorMap::new(), &d);
        assert_eq!(empty, empty2);
    }

    #[test]
    fn test_empty_declaration_contributes_nothing() {
        let a = compute_footprint("uc", &FactorMap::new(), &CovariateDeclaration::empty());
        let b = compute_footprint("uc", &FactorMap::new(), &CovariateDeclaration::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_value_hash_len_and_stability() {
        let v = CovariateValue::text("EU");
        let h1 = short_value_hash(&v);
        let h2 = short_value_hash(&v);
        assert_eq!(h1.len(), VALUE_HASH_LEN);
        assert_eq!(h1, h2);
        assert_ne!(h1, short_value_hash(&CovariateValue::text("US")));
    }
}
