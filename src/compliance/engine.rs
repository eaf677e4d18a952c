//! Entry points.
//!
//! [`evaluate`] decides one candidate shift. [`evaluate_roster`] decides
//! many workers' candidates in parallel. [`request_opt_out`] and
//! [`request_opt_out_withdrawal`] validate consent changes against the
//! catalog before recording them.

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ComplianceCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CandidateShift, ComplianceVerdict, Decision, OptOutRecord, RuleDefinition, WorkerLedger,
};

use super::enforcement::EnforcementAggregator;
use super::evaluator::ComplianceEvaluator;
use super::opt_out::{OptOutRegistry, SharedOptOutRegistry};

/// Decides whether a candidate shift complies with every applicable rule.
///
/// The result depends only on the arguments. Rule-level problems are
/// reported inside the verdict and never abort the evaluation.
///
/// # Errors
///
/// Returns [`EngineError::InvalidShift`] when the candidate does not end
/// after it starts, a break lies outside it, or it belongs to a worker
/// other than the ledger's.
pub fn evaluate(
    candidate: &CandidateShift,
    ledger: &WorkerLedger,
    catalog: &ComplianceCatalog,
    opt_outs: &OptOutRegistry,
    as_of: NaiveDateTime,
) -> EngineResult<ComplianceVerdict> {
    candidate.validate()?;
    if candidate.worker_id != ledger.worker.id {
        return Err(EngineError::InvalidShift {
            shift_id: candidate.id.clone(),
            message: format!(
                "shift belongs to worker '{}' but the ledger is for '{}'",
                candidate.worker_id, ledger.worker.id
            ),
        });
    }

    let evaluation = ComplianceEvaluator::new(catalog, opt_outs, as_of).evaluate(candidate, ledger);
    let verdict = EnforcementAggregator::aggregate(evaluation);

    debug!(
        shift_id = %candidate.id,
        worker_id = %candidate.worker_id,
        overall = ?verdict.overall,
        violations = verdict.violations.len(),
        "Shift evaluated"
    );

    Ok(verdict)
}

/// One worker's ledger and the candidate shifts to decide for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The worker's committed history.
    pub ledger: WorkerLedger,
    /// Shifts to decide, in any order.
    pub candidates: Vec<CandidateShift>,
}

/// The decision for one candidate of a roster.
#[derive(Debug)]
pub struct RosterResult {
    /// The worker the candidate belongs to.
    pub worker_id: String,
    /// The candidate's id.
    pub shift_id: String,
    /// The verdict, or why the candidate could not be evaluated.
    pub verdict: EngineResult<ComplianceVerdict>,
}

/// Evaluates a roster, one worker per parallel task.
///
/// Each worker's candidates are decided in chronological order; every
/// candidate that is not blocked joins the ledger seen by the later ones.
/// Results follow the roster order, then chronological order per worker.
pub fn evaluate_roster(
    roster: &[RosterEntry],
    catalog: &ComplianceCatalog,
    opt_outs: &OptOutRegistry,
    as_of: NaiveDateTime,
) -> Vec<RosterResult> {
    roster
        .par_iter()
        .map(|entry| evaluate_worker(entry, catalog, opt_outs, as_of))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn evaluate_worker(
    entry: &RosterEntry,
    catalog: &ComplianceCatalog,
    opt_outs: &OptOutRegistry,
    as_of: NaiveDateTime,
) -> Vec<RosterResult> {
    let mut candidates: Vec<&CandidateShift> = entry.candidates.iter().collect();
    candidates.sort_by_key(|c| (c.start_time, c.end_time));

    let mut ledger = entry.ledger.clone();
    let mut results = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let verdict = evaluate(candidate, &ledger, catalog, opt_outs, as_of);
        if matches!(&verdict, Ok(v) if v.overall != Decision::Block) {
            ledger.shifts.push(candidate.clone());
        }
        results.push(RosterResult {
            worker_id: entry.ledger.worker.id.clone(),
            shift_id: candidate.id.clone(),
            verdict,
        });
    }

    results
}

/// Records a worker's consent to opt out of a rule.
///
/// # Errors
///
/// Returns [`EngineError::RuleNotFound`] for an unknown rule and
/// [`EngineError::OptOutNotAllowed`] when the rule does not permit opt-out.
pub fn request_opt_out(
    registry: &SharedOptOutRegistry,
    catalog: &ComplianceCatalog,
    worker_id: &str,
    rule_code: &str,
    as_of: NaiveDateTime,
) -> EngineResult<OptOutRecord> {
    opt_out_rule(catalog, rule_code)?;
    Ok(registry.opt_in(worker_id, rule_code, as_of))
}

/// Starts withdrawing a worker's opt-out with the rule's notice period.
///
/// # Errors
///
/// As [`request_opt_out`], plus [`EngineError::InvalidOptOutTransition`]
/// when the worker is not currently opted in.
pub fn request_opt_out_withdrawal(
    registry: &SharedOptOutRegistry,
    catalog: &ComplianceCatalog,
    worker_id: &str,
    rule_code: &str,
    as_of: NaiveDateTime,
) -> EngineResult<OptOutRecord> {
    let rule = opt_out_rule(catalog, rule_code)?;
    registry.request_withdrawal(worker_id, rule_code, rule.opt_out_notice_days, as_of)
}

fn opt_out_rule<'a>(
    catalog: &'a ComplianceCatalog,
    rule_code: &str,
) -> EngineResult<&'a RuleDefinition> {
    let rule = catalog.rule(rule_code)?;
    if !rule.allows_opt_out {
        return Err(EngineError::OptOutNotAllowed {
            rule_code: rule_code.to_string(),
        });
    }
    Ok(rule)
}
