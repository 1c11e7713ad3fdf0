//! Ordered covariate declarations.
//!
//! A declaration is the ordered set of covariate keys one use case cares
//! about, each with exactly one matching category. Declaration order is
//! semantically significant: it feeds the footprint hash and is preserved
//! into every resolved profile. Built once per use case, immutable after.

use serde::{Deserialize, Serialize};

use crate::covariate::{CovariateCategory, CovariateKey};
use crate::error::{DomainError, Result};

/// One declared covariate: key plus its matching category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeclaredCovariate {
    pub key: CovariateKey,
    pub category: CovariateCategory,
}

/// Ordered, immutable set of declared covariates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CovariateDeclaration {
    entries: Vec<DeclaredCovariate>,
}

impl CovariateDeclaration {
    /// Declaration with no covariates. Selection over an empty declaration
    /// has no scoring basis and is always flagged ambiguous.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> DeclarationBuilder {
        DeclarationBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[DeclaredCovariate] {
        &self.entries
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &CovariateKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Category of a declared key, if present.
    pub fn category_of(&self, key: &CovariateKey) -> Option<CovariateCategory> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.category)
    }
}

/// Builder enforcing the declaration invariants:
/// no duplicate keys, and custom keys must carry an explicit category.
#[derive(Debug, Default)]
pub struct DeclarationBuilder {
    entries: Vec<DeclaredCovariate>,
    error: Option<DomainError>,
}

impl DeclarationBuilder {
    /// Declare a standard covariate with its built-in category.
    ///
    /// Custom keys have no built-in category and must go through
    /// [`DeclarationBuilder::covariate_with_category`].
    pub fn covariate(mut self, key: CovariateKey) -> Self {
        if self.error.is_some() {
            return self;
        }
        match key.builtin_category() {
            Some(category) => self.push(key, category),
            None => {
                self.error = Some(DomainError::MissingCategory {
                    key: key.as_str().to_string(),
                });
            }
        }
        self
    }

    /// Declare a covariate with an explicit category.
    pub fn covariate_with_category(
        mut self,
        key: CovariateKey,
        category: CovariateCategory,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.push(key, category);
        self
    }

    fn push(&mut self, key: CovariateKey, category: CovariateCategory) {
        if key.as_str().is_empty() {
            self.error = Some(DomainError::EmptyCovariateKey);
            return;
        }
        if self.entries.iter().any(|e| e.key == key) {
            self.error = Some(DomainError::DuplicateCovariateKey {
                key: key.as_str().to_string(),
            });
            return;
        }
        self.entries.push(DeclaredCovariate { key, category });
    }

    pub fn build(self) -> Result<CovariateDeclaration> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(CovariateDeclaration {
                entries: self.entries,
            }),
        }
    }
}
