//! Night-work limits.

use crate::calculation::ShiftHistoryAggregator;
use crate::error::EngineResult;
use crate::models::{MeasureUnit, NightWorkParams};

use super::{CheckOutcome, out_of_range};

/// Compares night hours with `max_hours_per_night` for night-eligible shifts.
///
/// Without a reference period the candidate's own night hours are measured.
/// With one, the measure is the average night hours per night shift worked
/// in the trailing window, the candidate included.
pub fn check(
    params: &NightWorkParams,
    aggregator: &ShiftHistoryAggregator<'_>,
) -> EngineResult<CheckOutcome> {
    if !aggregator.candidate().is_night_eligible {
        return Ok(CheckOutcome::not_applicable(
            MeasureUnit::Hours,
            "shift is not marked night-eligible",
        ));
    }

    let window = params.night_window();
    let max = params.max_hours_per_night;

    match params.reference_period_weeks {
        None => {
            let measured = aggregator.candidate_night_hours(window);
            let passed = measured <= max;
            let message = format!(
                "{}h worked between {:02}:00 and {:02}:00, limit {}h",
                measured, window.start_hour, window.end_hour, max
            );
            Ok(CheckOutcome::measured(passed, measured, max, MeasureUnit::Hours, message))
        }
        Some(weeks) => {
            let metric = aggregator
                .night_reference_period(window, weeks)
                .ok_or_else(|| out_of_range("reference_period_weeks", weeks))?;
            let measured = metric.night_hours_per_night_shift();
            let passed = measured <= max;
            let message = format!(
                "average of {}h per night over {} night shifts in {} weeks, limit {}h",
                measured, metric.night_shift_count, weeks, max
            );
            Ok(
                CheckOutcome::measured(passed, measured, max, MeasureUnit::Hours, message)
                    .with_history_from(metric.window_start),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftRecord, WorkLocation, WorkerLedger, WorkerProfile};
    use chrono::{NaiveDateTime, Weekday};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_shift(id: &str, start: &str, end: &str, night: bool) -> ShiftRecord {
        ShiftRecord {
            id: id.to_string(),
            worker_id: "wkr_001".to_string(),
            jurisdiction: WorkLocation::country("FR"),
            start_time: make_datetime(start),
            end_time: make_datetime(end),
            is_night_eligible: night,
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

    fn params(weeks: Option<u32>) -> NightWorkParams {
        NightWorkParams {
            night_start_hour: 22,
            night_end_hour: 6,
            max_hours_per_night: dec("8"),
            reference_period_weeks: weeks,
        }
    }

    /// NW-101: only hours inside the night window count
    #[test]
    fn test_nw_101_single_night_exceeded() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-02 20:00:00", "2026-03-03 07:00:00", true);
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        // Night window is eight hours long, so the candidate measures exactly 8
        let outcome = check(&params(None), &aggregator).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.measured_value, Some(dec("8")));

        let strict = NightWorkParams {
            max_hours_per_night: dec("7"),
            ..params(None)
        };
        assert!(!check(&strict, &aggregator).unwrap().passed);
    }

    /// NW-102: shifts not marked night-eligible are skipped
    #[test]
    fn test_nw_102_not_night_eligible() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-02 20:00:00", "2026-03-03 07:00:00", false);
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        let outcome = check(&params(None), &aggregator).unwrap();
        assert!(outcome.passed);
        assert!(outcome.measured_value.is_none());
    }

    #[test]
    fn test_reference_period_average_per_night() {
        let ledger = ledger(vec![
            make_shift("s1", "2026-03-02 22:00:00", "2026-03-03 06:00:00", true),
            make_shift("s2", "2026-03-03 22:00:00", "2026-03-04 06:00:00", true),
        ]);
        let candidate = make_shift("c1", "2026-03-05 02:00:00", "2026-03-05 06:00:00", true);
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        let strict = NightWorkParams {
            max_hours_per_night: dec("6"),
            ..params(Some(1))
        };
        let outcome = check(&strict, &aggregator).unwrap();
        // (8 + 8 + 4) / 3
        assert_eq!(outcome.measured_value, Some(dec("6.666667")));
        assert!(!outcome.passed);
    }

    #[test]
    fn test_reference_period_before_representable_dates_is_an_error() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-02 22:00:00", "2026-03-03 06:00:00", true);
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);

        assert!(check(&params(Some(u32::MAX)), &aggregator).is_err());
    }
}
