//! Core data models for the compliance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod jurisdiction;
mod opt_out;
mod rule;
mod shift;
mod verdict;
mod worker;

pub use jurisdiction::{Jurisdiction, WorkLocation};
pub use opt_out::{OptOutRecord, OptOutState};
pub use rule::{
    AgeRestrictionParams, BreakParams, Enforcement, NightWindow, NightWorkParams, OvertimeParams,
    OvertimeTier, RestPeriodParams, RestScope, RuleDefinition, RuleParameters, RuleType,
    WorkingTimeParams, WorkingTimePeriod,
};
pub use shift::{
    Break, CandidateShift, HOURS_DECIMAL_PLACES, ShiftRecord, hours_from_minutes, overlap_minutes,
};
pub use verdict::{
    AuditStep, ComplianceVerdict, Decision, MeasureUnit, OvertimeBreakdown, RuleVerdict,
    VerdictKind, VerdictTag,
};
pub use worker::{WorkerLedger, WorkerProfile};
