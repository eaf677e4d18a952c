//! Mandatory breaks.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::EngineResult;
use crate::models::{BreakParams, CandidateShift, MeasureUnit};

use super::{CheckOutcome, out_of_range};

/// Requires one recorded break of at least `break_minutes` once worked
/// hours exceed `threshold_hours`.
///
/// `waiver_active` is true when the worker has a waiver in force for the
/// rule; it excuses the break for shifts up to `waiver_max_hours`.
pub fn check(
    params: &BreakParams,
    candidate: &CandidateShift,
    waiver_active: bool,
) -> EngineResult<CheckOutcome> {
    let worked = candidate.worked_hours();

    if worked <= params.threshold_hours {
        return Ok(CheckOutcome::measured(
            true,
            worked,
            params.threshold_hours,
            MeasureUnit::Hours,
            format!(
                "{}h worked does not exceed {}h; no break required",
                worked, params.threshold_hours
            ),
        ));
    }

    let latest_start = match params.latest_start_after_hours {
        Some(hours) => Some(
            hours
                .checked_mul(Decimal::from(60))
                .and_then(|minutes| minutes.floor().to_i64())
                .and_then(Duration::try_minutes)
                .and_then(|offset| candidate.start_time.checked_add_signed(offset))
                .ok_or_else(|| out_of_range("latest_start_after_hours", hours))?,
        ),
        None => None,
    };

    let longest_in_time = candidate
        .breaks
        .iter()
        .filter(|b| latest_start.is_none_or(|latest| b.start_time <= latest))
        .map(|b| b.duration_minutes())
        .max()
        .unwrap_or(0);

    let required = Decimal::from(params.break_minutes);
    let measured = Decimal::from(longest_in_time);

    if measured >= required {
        return Ok(CheckOutcome::measured(
            true,
            measured,
            required,
            MeasureUnit::Minutes,
            format!("{}-minute break recorded", longest_in_time),
        ));
    }

    let waiver_covers_shift = params.waiver_max_hours.is_none_or(|max| worked <= max);
    if waiver_active && waiver_covers_shift {
        let mut outcome = CheckOutcome::measured(
            true,
            measured,
            required,
            MeasureUnit::Minutes,
            format!(
                "{}-minute break waived by mutual consent for a {}h shift",
                params.break_minutes, worked
            ),
        );
        outcome.opt_out_applied = true;
        return Ok(outcome);
    }

    let mut message = match latest_start {
        Some(latest) => format!(
            "{}h worked requires a {}-minute break starting by {}",
            worked, params.break_minutes, latest
        ),
        None => format!(
            "{}h worked requires a {}-minute break",
            worked, params.break_minutes
        ),
    };
    if waiver_active {
        if let Some(max) = params.waiver_max_hours {
            message.push_str(&format!("; waiver only covers shifts up to {}h", max));
        }
    }

    Ok(CheckOutcome::measured(
        false,
        measured,
        required,
        MeasureUnit::Minutes,
        message,
    ))
}
