//! Verdict models produced by an evaluation.
//!
//! A [`ComplianceVerdict`] is the complete, self-describing result of
//! evaluating one candidate shift: the overall decision, one
//! [`RuleVerdict`] per applicable rule, the overtime split and an audit
//! trace of every step taken. Verdicts carry no ids or timestamps so that
//! evaluating the same inputs twice yields identical values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Enforcement, RuleType};

/// Overall scheduling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// The shift may be scheduled.
    Allow,
    /// The shift may be scheduled but needs attention.
    Warn,
    /// The shift must not be scheduled.
    Block,
}

/// Whether a verdict reports a rule check or a problem with the rule itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// The rule was evaluated against the shift.
    RuleCheck,
    /// The rule could not be evaluated: bad parameters or missing input.
    ConfigurationError,
}

/// Unit of a verdict's measured and threshold values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnit {
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Years of age.
    Years,
}

/// Annotations on a verdict that are not tied to a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictTag {
    /// No jurisdiction matched the work location; no rules were applied.
    JurisdictionUnresolved,
    /// The ledger does not reach back far enough for every window used.
    LedgerIncomplete,
}

/// Outcome of one rule for one candidate shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleVerdict {
    /// The rule's code.
    pub rule_code: String,
    /// The rule's type, when it could be determined.
    pub rule_type: Option<RuleType>,
    /// Code of the jurisdiction that imposes the rule.
    pub jurisdiction: String,
    /// Rule check or configuration error.
    pub kind: VerdictKind,
    /// Whether the shift satisfies the rule.
    pub passed: bool,
    /// Enforcement level; configuration errors are reported as `log_only`.
    pub enforcement: Enforcement,
    /// Human-readable explanation.
    pub message: String,
    /// The value measured for the shift.
    pub measured_value: Option<Decimal>,
    /// The limit the measured value was compared with.
    pub threshold_value: Option<Decimal>,
    /// Unit of the measured and threshold values.
    pub unit: MeasureUnit,
    /// True when the rule was violated but passed because of an active opt-out.
    pub opt_out_applied: bool,
    /// Citation of the legal source.
    pub legal_reference: Option<String>,
}

impl RuleVerdict {
    /// A configuration-error verdict. It never escalates the overall decision.
    pub fn configuration_error(
        rule_code: impl Into<String>,
        rule_type: Option<RuleType>,
        jurisdiction: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_code: rule_code.into(),
            rule_type,
            jurisdiction: jurisdiction.into(),
            kind: VerdictKind::ConfigurationError,
            passed: false,
            enforcement: Enforcement::LogOnly,
            message: message.into(),
            measured_value: None,
            threshold_value: None,
            unit: MeasureUnit::Hours,
            opt_out_applied: false,
            legal_reference: None,
        }
    }

    /// Returns true if this verdict escalates the decision at all.
    pub fn escalates(&self) -> bool {
        !self.passed
            && self.kind == VerdictKind::RuleCheck
            && self.enforcement != Enforcement::LogOnly
    }
}

/// Split of a shift's worked hours by pay multiplier.
///
/// `straight_hours + overtime_hours + double_hours == total_hours` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBreakdown {
    /// Hours at a multiplier of 1 or less.
    pub straight_hours: Decimal,
    /// Hours at a multiplier above 1 and below 2.
    pub overtime_hours: Decimal,
    /// Hours at a multiplier of 2 or more.
    pub double_hours: Decimal,
    /// Worked hours of the shift.
    pub total_hours: Decimal,
    /// Sum of hours times multiplier.
    pub weighted_hours: Decimal,
    /// The overtime rule the split was computed from, if any applied.
    pub source_rule: Option<String>,
}

impl OvertimeBreakdown {
    /// All hours at straight time, with no source rule.
    pub fn all_straight(total_hours: Decimal) -> Self {
        Self {
            straight_hours: total_hours,
            overtime_hours: Decimal::ZERO,
            double_hours: Decimal::ZERO,
            total_hours,
            weighted_hours: total_hours,
            source_rule: None,
        }
    }

    /// Overtime plus double-time hours.
    pub fn premium_hours(&self) -> Decimal {
        self.overtime_hours + self.double_hours
    }
}

/// A single step in the audit trace recording an evaluation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The rule code, or the name of the engine stage for non-rule steps.
    pub rule_code: String,
    /// The human-readable name of the rule or stage.
    pub rule_name: String,
    /// Citation of the legal source, if any.
    pub legal_reference: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete result of evaluating one candidate shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// The overall decision.
    pub overall: Decision,
    /// Applicable jurisdiction codes, most specific first.
    pub jurisdictions: Vec<String>,
    /// Verdict-level annotations.
    pub tags: Vec<VerdictTag>,
    /// Failed rule verdicts and configuration errors.
    pub violations: Vec<RuleVerdict>,
    /// Every rule verdict, in evaluation order.
    pub rule_verdicts: Vec<RuleVerdict>,
    /// How the shift's hours split across pay multipliers.
    pub overtime_breakdown: OvertimeBreakdown,
    /// Step-by-step record of the evaluation.
    pub audit_trace: Vec<AuditStep>,
}

impl ComplianceVerdict {
    /// Looks up the verdict for a rule code.
    pub fn verdict_for(&self, rule_code: &str) -> Option<&RuleVerdict> {
        self.rule_verdicts.iter().find(|v| v.rule_code == rule_code)
    }

    /// Returns true if the verdict carries the tag.
    pub fn has_tag(&self, tag: VerdictTag) -> bool {
        self.tags.contains(&tag)
    }
}
