//! Jurisdiction resolution.
//!
//! Maps a work location onto the chain of jurisdictions whose rules apply,
//! most specific first.

use std::collections::{HashMap, HashSet};

use crate::error::{EngineError, EngineResult};
use crate::models::{Jurisdiction, WorkLocation};

/// Resolves work locations against a validated jurisdiction tree.
#[derive(Debug, Clone)]
pub struct JurisdictionResolver {
    jurisdictions: Vec<Jurisdiction>,
    by_code: HashMap<String, usize>,
}

impl JurisdictionResolver {
    /// Builds a resolver, checking that codes are unique, every parent
    /// exists, and no parent chain loops back on itself.
    pub fn new(jurisdictions: Vec<Jurisdiction>) -> EngineResult<Self> {
        let mut by_code = HashMap::with_capacity(jurisdictions.len());
        for (index, jurisdiction) in jurisdictions.iter().enumerate() {
            if by_code.insert(jurisdiction.code.clone(), index).is_some() {
                return Err(EngineError::InvalidJurisdiction {
                    code: jurisdiction.code.clone(),
                    message: "duplicate jurisdiction code".to_string(),
                });
            }
        }

        let resolver = Self {
            jurisdictions,
            by_code,
        };

        for jurisdiction in &resolver.jurisdictions {
            if let Some(parent) = &jurisdiction.parent {
                if !resolver.by_code.contains_key(parent) {
                    return Err(EngineError::InvalidJurisdiction {
                        code: jurisdiction.code.clone(),
                        message: format!("unknown parent '{}'", parent),
                    });
                }
            }
            resolver.chain_from(jurisdiction)?;
        }

        Ok(resolver)
    }

    /// All known jurisdictions, in load order.
    pub fn jurisdictions(&self) -> &[Jurisdiction] {
        &self.jurisdictions
    }

    /// Looks up a jurisdiction by code.
    pub fn get(&self, code: &str) -> Option<&Jurisdiction> {
        self.by_code.get(code).map(|&i| &self.jurisdictions[i])
    }

    /// Resolves a work location to its applicable jurisdictions, most specific first.
    ///
    /// The exact country-and-subdivision entry is preferred; a subdivision
    /// with no entry of its own falls back to the country-level entry. The
    /// parent chain is then followed to the root. An unknown location
    /// resolves to an empty list.
    pub fn resolve(&self, location: &WorkLocation) -> Vec<&Jurisdiction> {
        let start = self
            .jurisdictions
            .iter()
            .find(|j| j.matches_exactly(location))
            .or_else(|| {
                self.jurisdictions
                    .iter()
                    .find(|j| j.matches_country(location))
            });

        match start {
            // The tree was checked for cycles in `new`.
            Some(jurisdiction) => self.chain_from(jurisdiction).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn chain_from<'a>(&'a self, start: &'a Jurisdiction) -> EngineResult<Vec<&'a Jurisdiction>> {
        let mut chain = vec![start];
        let mut seen = HashSet::from([start.code.as_str()]);
        let mut current = start;

        while let Some(parent_code) = &current.parent {
            let Some(parent) = self.get(parent_code) else {
                break;
            };
            if !seen.insert(parent.code.as_str()) {
                return Err(EngineError::InvalidJurisdiction {
                    code: start.code.clone(),
                    message: format!("parent chain loops back to '{}'", parent.code),
                });
            }
            chain.push(parent);
            current = parent;
        }

        Ok(chain)
    }
}
