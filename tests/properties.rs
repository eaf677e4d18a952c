//! Property tests for the calculation and consent primitives.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use compliance_engine::calculation::{night_overlap_minutes, OvertimeCalculator, OvertimePosition};
use compliance_engine::compliance::OptOutRegistry;
use compliance_engine::models::{NightWindow, OptOutState, OvertimeParams, OvertimeTier};

fn tier(from: i64, multiplier: Decimal) -> OvertimeTier {
    OvertimeTier {
        from_hours: Decimal::from(from),
        multiplier,
    }
}

fn california_params() -> OvertimeParams {
    OvertimeParams {
        daily_tiers: vec![
            tier(0, Decimal::ONE),
            tier(8, Decimal::new(15, 1)),
            tier(12, Decimal::TWO),
        ],
        weekly_tiers: vec![tier(0, Decimal::ONE), tier(40, Decimal::new(15, 1))],
    }
}

/// Quarter hours as a decimal.
fn quarters(n: u32) -> Decimal {
    Decimal::from(n) / Decimal::from(4)
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

proptest! {
    /// The three buckets always add up to the shift's hours.
    #[test]
    fn overtime_buckets_sum_to_total(
        prior_daily in 0u32..64,
        prior_weekly_extra in 0u32..200,
        shift in 0u32..96,
    ) {
        let position = OvertimePosition {
            prior_daily_hours: quarters(prior_daily),
            prior_weekly_hours: quarters(prior_daily + prior_weekly_extra),
            shift_hours: quarters(shift),
        };

        let breakdown = OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &california_params(), position);

        prop_assert_eq!(
            breakdown.straight_hours + breakdown.overtime_hours + breakdown.double_hours,
            breakdown.total_hours
        );
        prop_assert_eq!(breakdown.total_hours, quarters(shift));
        prop_assert!(breakdown.straight_hours >= Decimal::ZERO);
        prop_assert!(breakdown.overtime_hours >= Decimal::ZERO);
        prop_assert!(breakdown.double_hours >= Decimal::ZERO);
        prop_assert!(breakdown.weighted_hours >= breakdown.total_hours);
    }

    /// Splitting a span anywhere never changes its night minutes.
    #[test]
    fn night_overlap_is_additive(
        start_minute in 0i64..(3 * 24 * 60),
        length in 1i64..(30 * 60),
        split in 0i64..(30 * 60),
        start_hour in 0u32..24,
        end_hour in 0u32..24,
    ) {
        let window = NightWindow { start_hour, end_hour };
        let start = epoch() + Duration::minutes(start_minute);
        let end = start + Duration::minutes(length);
        let mid = start + Duration::minutes(split.min(length));

        let whole = night_overlap_minutes(window, start, end);
        let parts = night_overlap_minutes(window, start, mid) + night_overlap_minutes(window, mid, end);

        prop_assert_eq!(whole, parts);
        prop_assert!(whole >= 0);
        prop_assert!(whole <= length);
    }

    /// Consent holds for exactly the notice period after a withdrawal request.
    #[test]
    fn withdrawal_holds_for_notice_period(
        notice_days in 0u32..60,
        requested_after_days in 0i64..365,
        observed_after_hours in 0i64..(90 * 24),
    ) {
        let mut registry = OptOutRegistry::new();
        let opted_in_at = epoch();
        registry.opt_in("wkr_001", "WTD_WEEKLY_MAX", opted_in_at);

        let requested_at = opted_in_at + Duration::days(requested_after_days);
        let record = registry
            .request_withdrawal("wkr_001", "WTD_WEEKLY_MAX", notice_days, requested_at)
            .unwrap();
        prop_assert_eq!(
            record.withdrawal_effective_at,
            Some(requested_at + Duration::days(i64::from(notice_days)))
        );

        let observed = requested_at + Duration::hours(observed_after_hours);
        let still_active = observed_after_hours < i64::from(notice_days) * 24;
        prop_assert_eq!(registry.is_active("wkr_001", "WTD_WEEKLY_MAX", observed), still_active);

        let expected_state = if still_active {
            OptOutState::WithdrawalPending
        } else {
            OptOutState::None
        };
        prop_assert_eq!(registry.state("wkr_001", "WTD_WEEKLY_MAX", observed), expected_state);

        // Materializing the withdrawal later changes no answer
        registry.expire(requested_at + Duration::days(i64::from(notice_days) + 1));
        prop_assert_eq!(registry.is_active("wkr_001", "WTD_WEEKLY_MAX", observed), still_active);
        prop_assert_eq!(registry.state("wkr_001", "WTD_WEEKLY_MAX", observed), expected_state);
    }
}
