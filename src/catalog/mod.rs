//! Rule catalog and jurisdiction resolution.
//!
//! A [`ComplianceCatalog`] is the immutable snapshot every evaluation runs
//! against: the jurisdiction tree plus the rules each jurisdiction imposes.
//! It is built once by [`crate::config::ConfigLoader`] and shared read-only.

mod resolver;
mod rule_catalog;

pub use resolver::JurisdictionResolver;
pub use rule_catalog::{InvalidRuleEntry, RuleCatalog};

use chrono::Weekday;

use crate::error::{EngineError, EngineResult};
use crate::models::{Jurisdiction, RuleDefinition, WorkLocation};

/// Jurisdictions and rules, validated against each other.
#[derive(Debug, Clone)]
pub struct ComplianceCatalog {
    resolver: JurisdictionResolver,
    rules: RuleCatalog,
}

impl ComplianceCatalog {
    /// Combines a resolver and a rule catalog.
    ///
    /// Every rule and rejected entry must name a known jurisdiction.
    pub fn new(resolver: JurisdictionResolver, rules: RuleCatalog) -> EngineResult<Self> {
        let declared = rules
            .rules()
            .iter()
            .map(|r| (&r.jurisdiction, &r.rule_code))
            .chain(
                rules
                    .invalid_entries()
                    .iter()
                    .map(|e| (&e.jurisdiction, &e.rule_code)),
            );

        for (jurisdiction, rule_code) in declared {
            if resolver.get(jurisdiction).is_none() {
                return Err(EngineError::InvalidJurisdiction {
                    code: jurisdiction.clone(),
                    message: format!("rule '{}' names an unknown jurisdiction", rule_code),
                });
            }
        }

        Ok(Self { resolver, rules })
    }

    /// The jurisdiction resolver.
    pub fn resolver(&self) -> &JurisdictionResolver {
        &self.resolver
    }

    /// The rule catalog.
    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    /// Applicable jurisdictions for a location, most specific first.
    pub fn resolve(&self, location: &WorkLocation) -> Vec<&Jurisdiction> {
        self.resolver.resolve(location)
    }

    /// Looks up a rule by code.
    pub fn rule(&self, rule_code: &str) -> EngineResult<&RuleDefinition> {
        self.rules.rule(rule_code)
    }

    /// The week start of the most specific jurisdiction for a location.
    ///
    /// Unresolved locations use Monday.
    pub fn week_start_for(&self, location: &WorkLocation) -> Weekday {
        self.resolve(location)
            .first()
            .map(|j| j.week_start)
            .unwrap_or(Weekday::Mon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jurisdiction(code: &str, country: &str, week_start: Weekday) -> Jurisdiction {
        Jurisdiction {
            code: code.to_string(),
            name: code.to_string(),
            country: Some(country.to_string()),
            subdivision: None,
            parent: None,
            week_start,
        }
    }

    #[test]
    fn test_week_start_follows_most_specific_jurisdiction() {
        let resolver =
            JurisdictionResolver::new(vec![jurisdiction("US-FEDERAL", "US", Weekday::Sun)])
                .unwrap();
        let catalog = ComplianceCatalog::new(resolver, RuleCatalog::default()).unwrap();

        assert_eq!(
            catalog.week_start_for(&WorkLocation::subdivision("US", "CA")),
            Weekday::Sun
        );
        assert_eq!(
            catalog.week_start_for(&WorkLocation::country("JP")),
            Weekday::Mon
        );
    }

    #[test]
    fn test_rule_for_unknown_jurisdiction_is_rejected() {
        let resolver =
            JurisdictionResolver::new(vec![jurisdiction("FR", "FR", Weekday::Mon)]).unwrap();
        let rules = RuleCatalog::new(
            vec![],
            vec![InvalidRuleEntry {
                jurisdiction: "DE".to_string(),
                rule_code: "DE_DAILY_MAX".to_string(),
                rule_type: None,
                is_active: true,
                effective_from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                message: "bad parameters".to_string(),
            }],
        );

        assert!(matches!(
            ComplianceCatalog::new(resolver, rules),
            Err(EngineError::InvalidJurisdiction { .. })
        ));
    }
}
