//! Immutable rule catalog.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{RuleDefinition, RuleType};

/// A catalog entry that failed validation at load time.
///
/// Invalid entries are kept rather than dropped so that evaluations in the
/// entry's jurisdiction can report them as configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRuleEntry {
    /// Code of the jurisdiction the entry was declared under.
    pub jurisdiction: String,
    /// The declared rule code.
    pub rule_code: String,
    /// The declared rule type, if it was recognised.
    pub rule_type: Option<RuleType>,
    /// Whether the entry was declared active.
    pub is_active: bool,
    /// The declared effective date.
    pub effective_from: NaiveDate,
    /// Why the entry was rejected.
    pub message: String,
}

impl InvalidRuleEntry {
    /// Returns true if the entry would be in force at `as_of`, had it been valid.
    pub fn is_in_force(&self, as_of: NaiveDateTime) -> bool {
        self.is_active && self.effective_from <= as_of.date()
    }
}

/// Queryable collection of validated rule definitions.
///
/// Rules keep their catalog order, which is the order they were loaded in.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<RuleDefinition>,
    by_code: HashMap<String, usize>,
    invalid: Vec<InvalidRuleEntry>,
}

impl RuleCatalog {
    /// Creates a catalog from validated rules and rejected entries.
    ///
    /// Rule codes must be unique; a later duplicate is moved to the invalid entries.
    pub fn new(rules: Vec<RuleDefinition>, mut invalid: Vec<InvalidRuleEntry>) -> Self {
        let mut kept = Vec::with_capacity(rules.len());
        let mut by_code = HashMap::with_capacity(rules.len());

        for rule in rules {
            if by_code.contains_key(&rule.rule_code) {
                invalid.push(InvalidRuleEntry {
                    jurisdiction: rule.jurisdiction.clone(),
                    rule_code: rule.rule_code.clone(),
                    rule_type: Some(rule.rule_type()),
                    is_active: rule.is_active,
                    effective_from: rule.effective_from,
                    message: format!("duplicate rule_code '{}'", rule.rule_code),
                });
                continue;
            }
            by_code.insert(rule.rule_code.clone(), kept.len());
            kept.push(rule);
        }

        Self {
            rules: kept,
            by_code,
            invalid,
        }
    }

    /// Number of valid rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog holds no valid rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All valid rules, in catalog order.
    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// All rejected entries.
    pub fn invalid_entries(&self) -> &[InvalidRuleEntry] {
        &self.invalid
    }

    /// Looks up a rule by code.
    pub fn rule(&self, rule_code: &str) -> EngineResult<&RuleDefinition> {
        self.by_code
            .get(rule_code)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| EngineError::RuleNotFound {
                rule_code: rule_code.to_string(),
            })
    }

    /// Rules in force at `as_of` for the given jurisdictions.
    ///
    /// Results follow the order of `jurisdictions`, then catalog order.
    /// Same-type rules from different jurisdictions are all returned.
    pub fn rules_for<S: AsRef<str>>(
        &self,
        jurisdictions: &[S],
        as_of: NaiveDateTime,
    ) -> Vec<&RuleDefinition> {
        jurisdictions
            .iter()
            .flat_map(|code| {
                self.rules
                    .iter()
                    .filter(move |r| r.jurisdiction == code.as_ref() && r.is_in_force(as_of))
            })
            .collect()
    }

    /// Every rule of one type declared by one jurisdiction, regardless of dates.
    pub fn rules_by_type(&self, jurisdiction: &str, rule_type: RuleType) -> Vec<&RuleDefinition> {
        self.rules
            .iter()
            .filter(|r| r.jurisdiction == jurisdiction && r.rule_type() == rule_type)
            .collect()
    }

    /// Rejected entries that would be in force at `as_of` for the given jurisdictions.
    pub fn invalid_for<S: AsRef<str>>(
        &self,
        jurisdictions: &[S],
        as_of: NaiveDateTime,
    ) -> Vec<&InvalidRuleEntry> {
        jurisdictions
            .iter()
            .flat_map(|code| {
                self.invalid
                    .iter()
                    .filter(move |e| e.jurisdiction == code.as_ref() && e.is_in_force(as_of))
            })
            .collect()
    }
}
