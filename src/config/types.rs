//! Raw catalog file types.
//!
//! These mirror the YAML files one-to-one. Rule parameters stay untyped
//! here; [`RawRuleDefinition::validate`] turns each entry into a typed
//! [`RuleDefinition`] or an [`InvalidRuleEntry`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::catalog::InvalidRuleEntry;
use crate::models::{Enforcement, Jurisdiction, RuleDefinition, RuleParameters, RuleType};

/// Longest notice period a withdrawal may be deferred by.
const MAX_OPT_OUT_NOTICE_DAYS: u32 = 366;

/// `jurisdictions.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionsFile {
    /// All jurisdictions, in declaration order.
    pub jurisdictions: Vec<Jurisdiction>,
}

/// One `rules/*.yaml` file: the rules a single jurisdiction imposes.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    /// Code of the jurisdiction imposing the rules.
    pub jurisdiction: String,
    /// Rule entries, in catalog order.
    #[serde(default)]
    pub rules: Vec<RawRuleDefinition>,
}

fn default_true() -> bool {
    true
}

/// A rule entry as written in YAML.
///
/// `rule_type` and `enforcement` are kept as strings so that an unknown
/// value rejects only this entry instead of the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRuleDefinition {
    /// Unique rule code.
    pub rule_code: String,
    /// Human-readable name.
    pub name: String,
    /// Declared rule type, e.g. `working_time`.
    pub rule_type: String,
    /// Untyped parameter bag.
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// Declared enforcement, e.g. `hard_block`.
    pub enforcement: String,
    /// Whether a worker may consent to exceed the limit.
    #[serde(default)]
    pub allows_opt_out: bool,
    /// Notice period in days before an opt-out withdrawal takes effect.
    #[serde(default)]
    pub opt_out_notice_days: u32,
    /// Inactive rules are loaded but never applied.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// First date on which the rule applies.
    pub effective_from: NaiveDate,
    /// Citation of the legal source.
    #[serde(default)]
    pub legal_reference: Option<String>,
}

impl RawRuleDefinition {
    /// Validates the entry into a typed rule for `jurisdiction`.
    pub fn validate(self, jurisdiction: &str) -> Result<RuleDefinition, InvalidRuleEntry> {
        let rule_type = parse_keyword::<RuleType>(&self.rule_type);

        let reject = |message: String| InvalidRuleEntry {
            jurisdiction: jurisdiction.to_string(),
            rule_code: self.rule_code.clone(),
            rule_type,
            is_active: self.is_active,
            effective_from: self.effective_from,
            message,
        };

        if self.rule_code.trim().is_empty() {
            return Err(reject("rule_code must not be empty".to_string()));
        }
        let Some(rule_type) = rule_type else {
            return Err(reject(format!("unknown rule_type '{}'", self.rule_type)));
        };
        let Some(enforcement) = parse_keyword::<Enforcement>(&self.enforcement) else {
            return Err(reject(format!("unknown enforcement '{}'", self.enforcement)));
        };
        if self.parameters.is_null() {
            return Err(reject("missing parameters".to_string()));
        }
        if self.opt_out_notice_days > MAX_OPT_OUT_NOTICE_DAYS {
            return Err(reject(format!(
                "opt_out_notice_days must be at most {}, got {}",
                MAX_OPT_OUT_NOTICE_DAYS, self.opt_out_notice_days
            )));
        }

        let parameters = RuleParameters::from_value(&self.rule_code, rule_type, &self.parameters)
            .map_err(|e| reject(e.to_string()))?;

        Ok(RuleDefinition {
            jurisdiction: jurisdiction.to_string(),
            rule_code: self.rule_code,
            name: self.name,
            parameters,
            enforcement,
            allows_opt_out: self.allows_opt_out,
            opt_out_notice_days: self.opt_out_notice_days,
            is_active: self.is_active,
            effective_from: self.effective_from,
            legal_reference: self.legal_reference,
        })
    }
}

fn parse_keyword<T: DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}
