//! Minimum rest.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculation::ShiftHistoryAggregator;
use crate::error::EngineResult;
use crate::models::{MeasureUnit, RestPeriodParams, RestScope};

use super::{CheckOutcome, out_of_range};

const WEEKLY_REST_WINDOW_DAYS: i64 = 7;

/// Compares the rest before the candidate, or the longest weekly rest, with the requirement.
pub fn check(
    params: &RestPeriodParams,
    aggregator: &ShiftHistoryAggregator<'_>,
) -> EngineResult<CheckOutcome> {
    let required = params.required_hours();

    match params.scope {
        RestScope::Daily => {
            let candidate_start = aggregator.candidate().start_time;
            let lookback = hours_duration(required)
                .and_then(|rest| candidate_start.checked_sub_signed(rest))
                .ok_or_else(|| out_of_range("min_hours", required))?;

            match aggregator.rest_gap() {
                None => {
                    let mut outcome = CheckOutcome::not_applicable(
                        MeasureUnit::Hours,
                        "no earlier shift in the same country; rest is unbounded",
                    );
                    outcome.threshold_value = Some(required);
                    Ok(outcome.with_history_from(lookback))
                }
                Some(gap) => {
                    let passed = gap.hours >= required;
                    let message = if passed {
                        format!(
                            "rest of {}h since shift '{}' meets minimum of {}h",
                            gap.hours, gap.previous_shift_id, required
                        )
                    } else {
                        format!(
                            "rest of {}h since shift '{}' is below minimum of {}h",
                            gap.hours, gap.previous_shift_id, required
                        )
                    };
                    Ok(CheckOutcome::measured(
                        passed,
                        gap.hours,
                        required,
                        MeasureUnit::Hours,
                        message,
                    )
                    .with_history_from(lookback))
                }
            }
        }
        RestScope::Weekly => {
            let (longest, window) = aggregator.longest_rest(WEEKLY_REST_WINDOW_DAYS);
            let passed = longest >= required;
            let message = if passed {
                format!(
                    "longest rest of {}h in the last {} days meets minimum of {}h",
                    longest, WEEKLY_REST_WINDOW_DAYS, required
                )
            } else {
                format!(
                    "longest rest of {}h in the last {} days is below minimum of {}h",
                    longest, WEEKLY_REST_WINDOW_DAYS, required
                )
            };
            Ok(
                CheckOutcome::measured(passed, longest, required, MeasureUnit::Hours, message)
                    .with_history_from(window.start),
            )
        }
    }
}

fn hours_duration(hours: Decimal) -> Option<Duration> {
    let minutes = hours.checked_mul(Decimal::from(60))?.ceil().to_i64()?;
    Duration::try_minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftRecord, WorkLocation, WorkerLedger, WorkerProfile};
    use chrono::{NaiveDateTime, Weekday};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_shift(id: &str, start: &str, end: &str) -> ShiftRecord {
        ShiftRecord {
            id: id.to_string(),
            worker_id: "wkr_001".to_string(),
            jurisdiction: WorkLocation::country("FR"),
            start_time: make_datetime(start),
            end_time: make_datetime(end),
            is_night_eligible: false,
            breaks: vec![],
        }
    }

    fn ledger(shifts: Vec<ShiftRecord>) -> WorkerLedger {
        WorkerLedger::new(
            WorkerProfile {
                id: "wkr_001".to_string(),
                date_of_birth: None,
            },
            shifts,
        )
    }

    fn daily_rest() -> RestPeriodParams {
        RestPeriodParams {
            min_hours: dec("11"),
            scope: RestScope::Daily,
            additional_to_daily: false,
            daily_rest_hours: None,
        }
    }

    fn weekly_rest() -> RestPeriodParams {
        RestPeriodParams {
            min_hours: dec("24"),
            scope: RestScope::Weekly,
            additional_to_daily: true,
            daily_rest_hours: Some(dec("11")),
        }
    }

    /// RP-001: 23:00 to 06:30 leaves 7.5 hours of rest
    #[test]
    fn test_rp_001_short_daily_rest() {
        let ledger = ledger(vec![make_shift("s1", "2026-03-02 15:00:00", "2026-03-02 23:00:00")]);
        let candidate = make_shift("c1", "2026-03-03 06:30:00", "2026-03-03 14:30:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        let outcome = check(&daily_rest(), &aggregator).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.measured_value, Some(dec("7.5")));
        assert_eq!(outcome.threshold_value, Some(dec("11")));
        assert_eq!(
            outcome.depends_on_history_from,
            Some(make_datetime("2026-03-02 19:30:00"))
        );
    }

    /// RP-002: no earlier shift means unbounded rest
    #[test]
    fn test_rp_002_no_previous_shift() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-03 06:30:00", "2026-03-03 14:30:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        let outcome = check(&daily_rest(), &aggregator).unwrap();
        assert!(outcome.passed);
        assert!(outcome.measured_value.is_none());
    }

    #[test]
    fn test_exactly_minimum_rest_passes() {
        let ledger = ledger(vec![make_shift("s1", "2026-03-02 11:00:00", "2026-03-02 19:00:00")]);
        let candidate = make_shift("c1", "2026-03-03 06:00:00", "2026-03-03 14:00:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        assert!(check(&daily_rest(), &aggregator).unwrap().passed);
    }

    #[test]
    fn test_weekly_rest_requires_daily_rest_on_top() {
        // Every day 08:00-20:00 leaves only 12 hours between shifts;
        // a 30 hour gap passes 24 but not 24 + 11.
        let ledger = ledger(vec![
            make_shift("s1", "2026-03-02 08:00:00", "2026-03-02 20:00:00"),
            make_shift("s2", "2026-03-03 08:00:00", "2026-03-03 20:00:00"),
            make_shift("s3", "2026-03-05 02:00:00", "2026-03-05 20:00:00"),
            make_shift("s4", "2026-03-06 08:00:00", "2026-03-06 20:00:00"),
            make_shift("s5", "2026-03-07 08:00:00", "2026-03-07 20:00:00"),
        ]);
        let candidate = make_shift("c1", "2026-03-08 08:00:00", "2026-03-08 20:00:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        let outcome = check(&weekly_rest(), &aggregator).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.measured_value, Some(dec("30")));
        assert_eq!(outcome.threshold_value, Some(dec("35")));
    }

    #[test]
    fn test_rest_reaching_before_representable_dates_is_an_error() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-03 06:30:00", "2026-03-03 14:30:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);
        let endless = RestPeriodParams {
            min_hours: dec("1000000000000"),
            ..daily_rest()
        };

        assert!(check(&endless, &aggregator).is_err());
    }
}
