//! Merging rule verdicts into one decision.

use crate::models::{AuditStep, ComplianceVerdict, Decision, Enforcement, RuleVerdict};

use super::evaluator::RuleEvaluation;

/// Folds rule verdicts into a [`ComplianceVerdict`].
pub struct EnforcementAggregator;

impl EnforcementAggregator {
    /// The overall decision for a set of rule verdicts.
    ///
    /// Any escalating `hard_block` failure blocks; otherwise any escalating
    /// `soft_warning` failure warns. `log_only` failures and configuration
    /// errors never escalate.
    pub fn decide(verdicts: &[RuleVerdict]) -> Decision {
        verdicts
            .iter()
            .filter(|v| v.escalates())
            .map(|v| match v.enforcement {
                Enforcement::HardBlock => Decision::Block,
                Enforcement::SoftWarning => Decision::Warn,
                Enforcement::LogOnly => Decision::Allow,
            })
            .max()
            .unwrap_or(Decision::Allow)
    }

    /// Builds the final verdict, appending the enforcement audit step.
    pub fn aggregate(evaluation: RuleEvaluation) -> ComplianceVerdict {
        let RuleEvaluation {
            jurisdictions,
            tags,
            rule_verdicts,
            overtime_breakdown,
            mut audit_trace,
        } = evaluation;

        let overall = Self::decide(&rule_verdicts);
        let violations: Vec<RuleVerdict> =
            rule_verdicts.iter().filter(|v| !v.passed).cloned().collect();

        let escalating: Vec<&str> = rule_verdicts
            .iter()
            .filter(|v| v.escalates())
            .map(|v| v.rule_code.as_str())
            .collect();
        let reasoning = if escalating.is_empty() {
            format!(
                "{:?}: no escalating violations among {} rule verdicts",
                overall,
                rule_verdicts.len()
            )
        } else {
            format!("{:?}: escalated by {}", overall, escalating.join(", "))
        };

        audit_trace.push(AuditStep {
            step_number: audit_trace.len() as u32 + 1,
            rule_code: "ENFORCEMENT".to_string(),
            rule_name: "Enforcement".to_string(),
            legal_reference: None,
            input: serde_json::json!({
                "rule_verdicts": rule_verdicts.len(),
                "violations": violations.iter().map(|v| v.rule_code.as_str()).collect::<Vec<_>>(),
            }),
            output: serde_json::json!({ "overall": overall }),
            reasoning,
        });

        ComplianceVerdict {
            overall,
            jurisdictions,
            tags,
            violations,
            rule_verdicts,
            overtime_breakdown,
            audit_trace,
        }
    }
}
