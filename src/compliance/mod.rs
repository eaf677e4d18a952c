//! Compliance evaluation.
//!
//! This module ties the catalog, the shift history and opt-out consent
//! together: type-specific checks in [`checks`], per-rule dispatch in
//! [`ComplianceEvaluator`], the overall decision in
//! [`EnforcementAggregator`], and the public entry points [`evaluate`],
//! [`evaluate_roster`], [`request_opt_out`] and
//! [`request_opt_out_withdrawal`].

pub mod checks;
mod enforcement;
mod engine;
mod evaluator;
mod opt_out;

pub use checks::CheckOutcome;
pub use enforcement::EnforcementAggregator;
pub use engine::{
    RosterEntry, RosterResult, evaluate, evaluate_roster, request_opt_out,
    request_opt_out_withdrawal,
};
pub use evaluator::{ComplianceEvaluator, RuleEvaluation};
pub use opt_out::{OptOutRegistry, SharedOptOutRegistry};
