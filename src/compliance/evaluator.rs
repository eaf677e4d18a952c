//! Rule dispatch for a single candidate shift.
//!
//! [`ComplianceEvaluator`] resolves the candidate's jurisdictions, selects
//! the rules in force, runs each through its type-specific check and turns
//! the outcomes into [`RuleVerdict`]s. Each rule is isolated: a rule that
//! cannot be evaluated becomes a configuration-error verdict and the rest
//! carry on.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::calculation::{OvertimeCalculator, ShiftHistoryAggregator};
use crate::catalog::{ComplianceCatalog, InvalidRuleEntry};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CandidateShift, OvertimeBreakdown, RuleDefinition, RuleParameters, RuleType,
    RuleVerdict, VerdictKind, VerdictTag, WorkerLedger, WorkerProfile,
};

use super::checks::{
    CheckOutcome, age_restriction, breaks, night_work, overtime, rest_period, working_time,
};
use super::opt_out::OptOutRegistry;

/// Everything the evaluator found for one candidate, before enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluation {
    /// Applicable jurisdiction codes, most specific first.
    pub jurisdictions: Vec<String>,
    /// Verdict-level annotations.
    pub tags: Vec<VerdictTag>,
    /// One verdict per rule in force, plus configuration errors.
    pub rule_verdicts: Vec<RuleVerdict>,
    /// The most protective overtime split.
    pub overtime_breakdown: OvertimeBreakdown,
    /// Audit steps recorded so far.
    pub audit_trace: Vec<AuditStep>,
}

impl RuleEvaluation {
    fn tag(&mut self, tag: VerdictTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    fn push_step(
        &mut self,
        rule_code: &str,
        rule_name: &str,
        legal_reference: Option<String>,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.audit_trace.len() as u32 + 1;
        self.audit_trace.push(AuditStep {
            step_number,
            rule_code: rule_code.to_string(),
            rule_name: rule_name.to_string(),
            legal_reference,
            input,
            output,
            reasoning,
        });
    }
}

/// Evaluates candidate shifts against one catalog and opt-out snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceEvaluator<'a> {
    catalog: &'a ComplianceCatalog,
    opt_outs: &'a OptOutRegistry,
    as_of: NaiveDateTime,
}

impl<'a> ComplianceEvaluator<'a> {
    /// Creates an evaluator for decisions made at `as_of`.
    pub fn new(
        catalog: &'a ComplianceCatalog,
        opt_outs: &'a OptOutRegistry,
        as_of: NaiveDateTime,
    ) -> Self {
        Self {
            catalog,
            opt_outs,
            as_of,
        }
    }

    /// The instant the decision is made at.
    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    /// Runs every applicable rule for the candidate.
    ///
    /// The candidate is assumed to be valid and to belong to the ledger's worker.
    pub fn evaluate(&self, candidate: &CandidateShift, ledger: &WorkerLedger) -> RuleEvaluation {
        let jurisdictions: Vec<String> = self
            .catalog
            .resolve(&candidate.jurisdiction)
            .into_iter()
            .map(|j| j.code.clone())
            .collect();

        let mut evaluation = RuleEvaluation {
            jurisdictions: jurisdictions.clone(),
            tags: Vec::new(),
            rule_verdicts: Vec::new(),
            overtime_breakdown: OvertimeBreakdown::all_straight(candidate.worked_hours()),
            audit_trace: Vec::new(),
        };

        let resolution = if jurisdictions.is_empty() {
            warn!(
                shift_id = %candidate.id,
                location = %candidate.jurisdiction,
                "No jurisdiction matches work location; no rules applied"
            );
            evaluation.tag(VerdictTag::JurisdictionUnresolved);
            format!("No jurisdiction matches {}", candidate.jurisdiction)
        } else {
            format!(
                "{} resolves to {}",
                candidate.jurisdiction,
                jurisdictions.join(" > ")
            )
        };
        evaluation.push_step(
            "JURISDICTION_RESOLUTION",
            "Jurisdiction Resolution",
            None,
            serde_json::json!({ "location": candidate.jurisdiction.to_string() }),
            serde_json::json!({ "jurisdictions": jurisdictions }),
            resolution,
        );

        let rule_catalog = self.catalog.rules();
        let rules = rule_catalog.rules_for(&jurisdictions, self.as_of);
        let invalid = rule_catalog.invalid_for(&jurisdictions, self.as_of);

        evaluation.push_step(
            "RULE_SELECTION",
            "Rule Selection",
            None,
            serde_json::json!({
                "jurisdictions": jurisdictions,
                "as_of": self.as_of.to_string(),
            }),
            serde_json::json!({
                "rules": rules.iter().map(|r| r.rule_code.as_str()).collect::<Vec<_>>(),
                "invalid_entries": invalid.iter().map(|e| e.rule_code.as_str()).collect::<Vec<_>>(),
            }),
            format!(
                "{} rules in force, {} rejected catalog entries",
                rules.len(),
                invalid.len()
            ),
        );

        for entry in invalid {
            self.record_invalid_entry(&mut evaluation, candidate, entry);
        }

        let week_start = self.catalog.week_start_for(&candidate.jurisdiction);
        let aggregator = ShiftHistoryAggregator::new(ledger, candidate, week_start);
        let opt_out_instant = self.as_of.max(candidate.start_time);

        let mut breakdowns = Vec::new();
        for rule in rules {
            match self.run_check(rule, &ledger.worker, &aggregator, opt_out_instant) {
                Ok(outcome) => {
                    if let Some(from) = outcome.depends_on_history_from {
                        if !aggregator.is_complete_from(from) {
                            evaluation.tag(VerdictTag::LedgerIncomplete);
                        }
                    }
                    if let Some(breakdown) = &outcome.overtime {
                        breakdowns.push(breakdown.clone());
                    }

                    debug!(
                        shift_id = %candidate.id,
                        rule_code = %rule.rule_code,
                        passed = outcome.passed,
                        opt_out_applied = outcome.opt_out_applied,
                        "Rule evaluated"
                    );

                    let verdict = rule_verdict(rule, outcome);
                    evaluation.push_step(
                        &rule.rule_code,
                        &rule.name,
                        rule.legal_reference.clone(),
                        serde_json::json!({
                            "rule_type": rule.rule_type().to_string(),
                            "enforcement": rule.enforcement.to_string(),
                            "threshold_value": verdict.threshold_value.map(|v| v.to_string()),
                        }),
                        serde_json::json!({
                            "passed": verdict.passed,
                            "measured_value": verdict.measured_value.map(|v| v.to_string()),
                            "opt_out_applied": verdict.opt_out_applied,
                        }),
                        verdict.message.clone(),
                    );
                    evaluation.rule_verdicts.push(verdict);
                }
                Err(err) => {
                    warn!(
                        shift_id = %candidate.id,
                        rule_code = %rule.rule_code,
                        error = %err,
                        "Rule could not be evaluated"
                    );
                    let mut verdict = RuleVerdict::configuration_error(
                        &rule.rule_code,
                        Some(rule.rule_type()),
                        &rule.jurisdiction,
                        err.to_string(),
                    );
                    verdict.legal_reference = rule.legal_reference.clone();
                    evaluation.push_step(
                        &rule.rule_code,
                        &rule.name,
                        rule.legal_reference.clone(),
                        serde_json::json!({ "rule_type": rule.rule_type().to_string() }),
                        serde_json::json!({ "kind": "configuration_error" }),
                        verdict.message.clone(),
                    );
                    evaluation.rule_verdicts.push(verdict);
                }
            }
        }

        let candidates = breakdowns.len();
        if let Some(selected) = OvertimeCalculator::most_protective(breakdowns) {
            evaluation.overtime_breakdown = selected;
        }
        let breakdown = &evaluation.overtime_breakdown;
        let reasoning = match &breakdown.source_rule {
            Some(source) => format!(
                "Selected {} of {} overtime breakdowns as most protective ({} weighted hours)",
                source, candidates, breakdown.weighted_hours
            ),
            None => "No overtime rule applies; all hours are straight time".to_string(),
        };
        let output = serde_json::to_value(breakdown).unwrap_or_default();
        evaluation.push_step(
            "OVERTIME_SELECTION",
            "Overtime Selection",
            None,
            serde_json::json!({ "candidates": candidates }),
            output,
            reasoning,
        );

        evaluation
    }

    fn run_check(
        &self,
        rule: &RuleDefinition,
        worker: &WorkerProfile,
        aggregator: &ShiftHistoryAggregator<'_>,
        opt_out_instant: NaiveDateTime,
    ) -> EngineResult<CheckOutcome> {
        let candidate = aggregator.candidate();
        let opted_out = || {
            rule.allows_opt_out
                && self
                    .opt_outs
                    .is_active(&candidate.worker_id, &rule.rule_code, opt_out_instant)
        };

        let outcome = match &rule.parameters {
            RuleParameters::WorkingTime(params) => working_time::check(params, aggregator),
            RuleParameters::RestPeriod(params) => rest_period::check(params, aggregator),
            RuleParameters::Break(params) => breaks::check(params, candidate, opted_out()),
            RuleParameters::NightWork(params) => night_work::check(params, aggregator),
            RuleParameters::AgeRestriction(params) => {
                age_restriction::check(params, worker, candidate)
            }
            RuleParameters::Overtime(params) | RuleParameters::Wage(params) => {
                Ok(overtime::check(&rule.rule_code, params, aggregator))
            }
        }
        .map_err(|err| match err {
            // Date arithmetic only overflows on out-of-range rule parameters
            EngineError::CalculationError { message } => EngineError::InvalidRuleDefinition {
                rule_code: rule.rule_code.clone(),
                message,
            },
            other => other,
        })?;

        let honours_opt_out = matches!(
            rule.rule_type(),
            RuleType::WorkingTime | RuleType::RestPeriod | RuleType::NightWork
        );
        if !outcome.passed && honours_opt_out && opted_out() {
            return Ok(CheckOutcome {
                passed: true,
                opt_out_applied: true,
                message: format!("{}; permitted by the worker's opt-out", outcome.message),
                ..outcome
            });
        }

        Ok(outcome)
    }

    fn record_invalid_entry(
        &self,
        evaluation: &mut RuleEvaluation,
        candidate: &CandidateShift,
        entry: &InvalidRuleEntry,
    ) {
        warn!(
            shift_id = %candidate.id,
            rule_code = %entry.rule_code,
            jurisdiction = %entry.jurisdiction,
            reason = %entry.message,
            "Skipping invalid catalog entry"
        );
        let message = format!("rule definition rejected at load: {}", entry.message);
        evaluation.push_step(
            &entry.rule_code,
            &entry.rule_code,
            None,
            serde_json::json!({ "jurisdiction": entry.jurisdiction }),
            serde_json::json!({ "kind": "configuration_error" }),
            message.clone(),
        );
        evaluation.rule_verdicts.push(RuleVerdict::configuration_error(
            &entry.rule_code,
            entry.rule_type,
            &entry.jurisdiction,
            message,
        ));
    }
}

fn rule_verdict(rule: &RuleDefinition, outcome: CheckOutcome) -> RuleVerdict {
    RuleVerdict {
        rule_code: rule.rule_code.clone(),
        rule_type: Some(rule.rule_type()),
        jurisdiction: rule.jurisdiction.clone(),
        kind: VerdictKind::RuleCheck,
        passed: outcome.passed,
        enforcement: rule.enforcement,
        message: outcome.message,
        measured_value: outcome.measured_value,
        threshold_value: outcome.threshold_value,
        unit: outcome.unit,
        opt_out_applied: outcome.opt_out_applied,
        legal_reference: rule.legal_reference.clone(),
    }
}
