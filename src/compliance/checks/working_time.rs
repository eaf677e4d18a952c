//! Maximum working time.

use crate::calculation::ShiftHistoryAggregator;
use crate::error::EngineResult;
use crate::models::{MeasureUnit, WorkingTimeParams, WorkingTimePeriod};

use super::{CheckOutcome, out_of_range};

/// Compares daily, weekly or reference-period average hours with `max_hours`.
pub fn check(
    params: &WorkingTimeParams,
    aggregator: &ShiftHistoryAggregator<'_>,
) -> EngineResult<CheckOutcome> {
    let (measured, label, metric) = match (params.period, params.reference_period_weeks) {
        (WorkingTimePeriod::Daily, _) => {
            let metric = aggregator.daily_hours();
            (metric.hours_total, "daily hours", metric)
        }
        (WorkingTimePeriod::Weekly, _) => {
            let metric = aggregator.weekly_hours();
            (metric.hours_total, "weekly hours", metric)
        }
        (WorkingTimePeriod::ReferencePeriod, weeks) => {
            // Parameters are validated at load, so `weeks` is always set here.
            let weeks = weeks.unwrap_or(1);
            let metric = aggregator
                .reference_period(weeks)
                .ok_or_else(|| out_of_range("reference_period_weeks", weeks))?;
            (
                metric.average_per_week(),
                "average weekly hours over the reference period",
                metric,
            )
        }
    };

    let passed = measured <= params.max_hours;
    let message = if passed {
        format!("{} of {} within limit of {}", label, measured, params.max_hours)
    } else {
        format!("{} of {} exceed limit of {}", label, measured, params.max_hours)
    };

    Ok(
        CheckOutcome::measured(passed, measured, params.max_hours, MeasureUnit::Hours, message)
            .with_history_from(metric.window_start),
    )
}
