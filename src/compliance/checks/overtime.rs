//! Overtime and premium wage classification.

use rust_decimal::Decimal;

use crate::calculation::{OvertimeCalculator, OvertimePosition, ShiftHistoryAggregator};
use crate::models::{MeasureUnit, OvertimeParams};

use super::CheckOutcome;

/// Classifies the candidate's hours against the rule's tiers.
///
/// The outcome passes when no hour attracts a premium; otherwise it fails
/// with the premium hours as the measured value, which only matters for
/// enforcement if the rule is configured above `log_only`. A shift crossing
/// midnight is walked as one block from the day it starts.
pub fn check(
    rule_code: &str,
    params: &OvertimeParams,
    aggregator: &ShiftHistoryAggregator<'_>,
) -> CheckOutcome {
    let daily = aggregator.daily_hours();
    let weekly = aggregator.weekly_hours();
    let position = OvertimePosition {
        prior_daily_hours: daily.prior_hours,
        prior_weekly_hours: weekly.prior_hours,
        shift_hours: aggregator.candidate().worked_hours(),
    };

    let breakdown = OvertimeCalculator::breakdown(rule_code, params, position);
    let premium = breakdown.premium_hours();
    let passed = premium.is_zero();
    let message = format!(
        "{}h straight, {}h overtime, {}h double time after {}h earlier in the day and {}h in the week",
        breakdown.straight_hours,
        breakdown.overtime_hours,
        breakdown.double_hours,
        position.prior_daily_hours,
        position.prior_weekly_hours
    );

    let mut outcome = CheckOutcome::measured(
        passed,
        premium,
        Decimal::ZERO,
        MeasureUnit::Hours,
        message,
    )
    .with_history_from(weekly.window_start.min(daily.window_start));
    outcome.overtime = Some(breakdown);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OvertimeTier, ShiftRecord, WorkLocation, WorkerLedger, WorkerProfile};
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
            jurisdiction: WorkLocation::subdivision("US", "CA"),
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

    fn tier(from: &str, multiplier: &str) -> OvertimeTier {
        OvertimeTier {
            from_hours: dec(from),
            multiplier: dec(multiplier),
        }
    }

    fn california() -> OvertimeParams {
        OvertimeParams {
            daily_tiers: vec![tier("0", "1.0"), tier("8", "1.5"), tier("12", "2.0")],
            weekly_tiers: vec![tier("0", "1.0"), tier("40", "1.5")],
        }
    }

    /// OT-001: eight hours is all straight time
    #[test]
    fn test_ot_001_eight_hours_straight() {
        let ledger = ledger(vec![]);
        let candidate = make_shift("c1", "2026-03-02 08:00:00", "2026-03-02 16:00:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Sun);

        let outcome = check("CA_DAILY_OVERTIME", &california(), &aggregator);
        assert!(outcome.passed);
        let breakdown = outcome.overtime.unwrap();
        assert_eq!(breakdown.straight_hours, dec("8"));
        assert_eq!(breakdown.source_rule.as_deref(), Some("CA_DAILY_OVERTIME"));
    }

    /// OT-002: a split shift continues from the earlier daily hours
    #[test]
    fn test_ot_002_split_shift_continues_daily_count() {
        let ledger = ledger(vec![make_shift("s1", "2026-03-02 06:00:00", "2026-03-02 12:00:00")]);
        let candidate = make_shift("c1", "2026-03-02 14:00:00", "2026-03-02 18:00:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Sun);

        let outcome = check("CA_DAILY_OVERTIME", &california(), &aggregator);
        assert!(!outcome.passed);
        assert_eq!(outcome.measured_value, Some(dec("2")));
        let breakdown = outcome.overtime.unwrap();
        assert_eq!(breakdown.straight_hours, dec("2"));
        assert_eq!(breakdown.overtime_hours, dec("2"));
    }

    #[test]
    fn test_weekly_threshold_applies_on_short_day() {
        // Five eight-hour days from Sunday leave 40 hours in the week
        let shifts = ["01", "02", "03", "04", "05"]
            .iter()
            .enumerate()
            .map(|(i, d)| {
                make_shift(
                    &format!("s{}", i),
                    &format!("2026-03-{} 08:00:00", d),
                    &format!("2026-03-{} 16:00:00", d),
                )
            })
            .collect();
        let ledger = ledger(shifts);
        let candidate = make_shift("c1", "2026-03-06 08:00:00", "2026-03-06 12:00:00");
        let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Sun);

        let outcome = check("CA_DAILY_OVERTIME", &california(), &aggregator);
        let breakdown = outcome.overtime.unwrap();
        assert_eq!(breakdown.straight_hours, Decimal::ZERO);
        assert_eq!(breakdown.overtime_hours, dec("4"));
        assert_eq!(
            outcome.depends_on_history_from,
            Some(make_datetime("2026-03-01 00:00:00"))
        );
    }
}
