//! Typed factor configuration values.
//!
//! Factors are the fixed configuration knobs of a use case (model name,
//! temperature, retry count). They are validated where raw configuration
//! enters the system: `from_json` rejects shapes that have no typed
//! counterpart instead of deferring to a read-time cast failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DomainError, Result};

/// Factor key→value map.
///
/// A `BTreeMap` so iteration is always key-sorted: factor insertion order
/// can never leak into footprint hashes.
pub type FactorMap = BTreeMap<String, FactorValue>;

/// Typed value of one configuration factor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FactorValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl FactorValue {
    /// Canonical form used as footprint hash input.
    pub fn canonical_string(&self) -> String {
        match self {
            FactorValue::Text(s) => s.clone(),
            FactorValue::Integer(i) => i.to_string(),
            FactorValue::Float(f) => format!("{f:?}"),
            FactorValue::Boolean(b) => b.to_string(),
        }
    }

    /// Validate one raw configuration value at the boundary.
    ///
    /// Accepts strings, integers, finite floats, and booleans. Nulls,
    /// arrays, and objects have no factor counterpart and are rejected.
    pub fn from_json(key: &str, raw: &serde_json::Value) -> Result<Self> {
        match raw {
            serde_json::Value::String(s) => Ok(FactorValue::Text(s.clone())),
            serde_json::Value::Bool(b) => Ok(FactorValue::Boolean(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FactorValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    if !f.is_finite() {
                        return Err(DomainError::InvalidFactorValue {
                            key: key.to_string(),
                            reason: "non-finite number".to_string(),
                        });
                    }
                    Ok(FactorValue::Float(f))
                } else {
                    Err(DomainError::InvalidFactorValue {
                        key: key.to_string(),
                        reason: "unrepresentable number".to_string(),
                    })
                }
            }
            serde_json::Value::Null => Err(DomainError::InvalidFactorValue {
                key: key.to_string(),
                reason: "null is not a factor value".to_string(),
            }),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(DomainError::InvalidFactorValue {
                    key: key.to_string(),
                    reason: "nested structures are not factor values".to_string(),
                })
            }
        }
    }
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// Validate a whole raw configuration object into a typed factor map.
pub fn factor_map_from_json(raw: &serde_json::Map<String, serde_json::Value>) -> Result<FactorMap> {
    let mut factors = FactorMap::new();
    for (key, value) in raw {
        factors.insert(key.clone(), FactorValue::from_json(key, value)?);
    }
    Ok(factors)
}
