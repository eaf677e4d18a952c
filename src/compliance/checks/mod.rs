//! Per-rule-type checks.
//!
//! Each check measures one quantity for the candidate shift and compares
//! it with the rule's limit. Checks know nothing about enforcement levels
//! or opt-outs other than a break waiver; the evaluator layers those on.

pub mod age_restriction;
pub mod breaks;
pub mod night_work;
pub mod overtime;
pub mod rest_period;
pub mod working_time;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::models::{MeasureUnit, OvertimeBreakdown};

/// What a check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the shift satisfies the rule.
    pub passed: bool,
    /// Human-readable explanation.
    pub message: String,
    /// The measured value.
    pub measured_value: Option<Decimal>,
    /// The limit the measured value was compared with.
    pub threshold_value: Option<Decimal>,
    /// Unit of both values.
    pub unit: MeasureUnit,
    /// True when the check passed only because of a waiver.
    pub opt_out_applied: bool,
    /// Earliest instant of ledger history the measurement depends on.
    pub depends_on_history_from: Option<NaiveDateTime>,
    /// Hour buckets, for overtime and wage rules.
    pub overtime: Option<OvertimeBreakdown>,
}

impl CheckOutcome {
    /// An outcome comparing `measured` with `threshold`.
    pub fn measured(
        passed: bool,
        measured: Decimal,
        threshold: Decimal,
        unit: MeasureUnit,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed,
            message: message.into(),
            measured_value: Some(measured),
            threshold_value: Some(threshold),
            unit,
            opt_out_applied: false,
            depends_on_history_from: None,
            overtime: None,
        }
    }

    /// A passing outcome for a rule that does not apply to the shift.
    pub fn not_applicable(unit: MeasureUnit, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            measured_value: None,
            threshold_value: None,
            unit,
            opt_out_applied: false,
            depends_on_history_from: None,
            overtime: None,
        }
    }

    /// Records the earliest history instant the measurement used.
    pub fn with_history_from(mut self, instant: NaiveDateTime) -> Self {
        self.depends_on_history_from = Some(instant);
        self
    }
}

/// A rule parameter that pushes a window past the representable date range.
fn out_of_range(field: &str, value: impl std::fmt::Display) -> EngineError {
    EngineError::CalculationError {
        message: format!(
            "{} of {} reaches past the representable date range",
            field, value
        ),
    }
}
