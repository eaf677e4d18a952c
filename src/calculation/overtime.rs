//! Overtime hour buckets.
//!
//! The candidate's worked hours are walked from where the worker already
//! stands in the day and in the week. Each stretch between tier boundaries
//! is paid at the higher of the daily and weekly multipliers, and lands in
//! one of three buckets:
//!
//! - multiplier ≤ 1: straight time
//! - 1 < multiplier < 2: overtime
//! - multiplier ≥ 2: double time

use rust_decimal::Decimal;

use crate::models::{OvertimeBreakdown, OvertimeParams, OvertimeTier};

/// Where the worker stands before the candidate shift starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimePosition {
    /// Hours already worked in the candidate's calendar day.
    pub prior_daily_hours: Decimal,
    /// Hours already worked in the candidate's calendar week.
    pub prior_weekly_hours: Decimal,
    /// Worked hours of the candidate.
    pub shift_hours: Decimal,
}

/// Splits shift hours into straight, overtime and double-time buckets.
pub struct OvertimeCalculator;

impl OvertimeCalculator {
    /// Computes the breakdown for one overtime or wage rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use compliance_engine::calculation::{OvertimeCalculator, OvertimePosition};
    /// use compliance_engine::models::{OvertimeParams, OvertimeTier};
    /// use rust_decimal::Decimal;
    ///
    /// let tier = |from: i64, multiplier: Decimal| OvertimeTier {
    ///     from_hours: Decimal::from(from),
    ///     multiplier,
    /// };
    /// let params = OvertimeParams {
    ///     daily_tiers: vec![
    ///         tier(0, Decimal::ONE),
    ///         tier(8, Decimal::new(15, 1)),
    ///         tier(12, Decimal::TWO),
    ///     ],
    ///     weekly_tiers: vec![],
    /// };
    /// let position = OvertimePosition {
    ///     prior_daily_hours: Decimal::ZERO,
    ///     prior_weekly_hours: Decimal::ZERO,
    ///     shift_hours: Decimal::from(13),
    /// };
    ///
    /// let breakdown = OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &params, position);
    /// assert_eq!(breakdown.straight_hours, Decimal::from(8));
    /// assert_eq!(breakdown.overtime_hours, Decimal::from(4));
    /// assert_eq!(breakdown.double_hours, Decimal::from(1));
    /// ```
    pub fn breakdown(
        rule_code: &str,
        params: &OvertimeParams,
        position: OvertimePosition,
    ) -> OvertimeBreakdown {
        let total = position.shift_hours.max(Decimal::ZERO);
        let mut straight = Decimal::ZERO;
        let mut overtime = Decimal::ZERO;
        let mut weighted = Decimal::ZERO;

        let mut offset = Decimal::ZERO;
        while offset < total {
            let daily_at = position.prior_daily_hours + offset;
            let weekly_at = position.prior_weekly_hours + offset;

            let mut segment_end = total;
            if let Some(next) = next_boundary(&params.daily_tiers, daily_at) {
                segment_end = segment_end.min(offset + (next - daily_at));
            }
            if let Some(next) = next_boundary(&params.weekly_tiers, weekly_at) {
                segment_end = segment_end.min(offset + (next - weekly_at));
            }

            let multiplier = match (
                multiplier_at(&params.daily_tiers, daily_at),
                multiplier_at(&params.weekly_tiers, weekly_at),
            ) {
                (Some(d), Some(w)) => d.max(w),
                (Some(m), None) | (None, Some(m)) => m,
                (None, None) => Decimal::ONE,
            };

            let hours = segment_end - offset;
            if multiplier <= Decimal::ONE {
                straight += hours;
            } else if multiplier < Decimal::TWO {
                overtime += hours;
            }
            weighted += hours * multiplier;
            offset = segment_end;
        }

        OvertimeBreakdown {
            straight_hours: straight,
            overtime_hours: overtime,
            double_hours: total - straight - overtime,
            total_hours: total,
            weighted_hours: weighted.normalize(),
            source_rule: Some(rule_code.to_string()),
        }
    }

    /// Picks the breakdown most protective to the worker: the highest
    /// weighted hours. Ties keep the earliest, i.e. the more specific
    /// jurisdiction when inputs are ordered most specific first.
    pub fn most_protective(breakdowns: Vec<OvertimeBreakdown>) -> Option<OvertimeBreakdown> {
        breakdowns.into_iter().fold(None, |best, candidate| match best {
            Some(b) if b.weighted_hours >= candidate.weighted_hours => Some(b),
            _ => Some(candidate),
        })
    }
}

/// Multiplier of the last tier starting at or before `position`.
fn multiplier_at(tiers: &[OvertimeTier], position: Decimal) -> Option<Decimal> {
    tiers
        .iter()
        .take_while(|t| t.from_hours <= position)
        .last()
        .map(|t| t.multiplier)
}

/// The first tier boundary strictly after `position`.
fn next_boundary(tiers: &[OvertimeTier], position: Decimal) -> Option<Decimal> {
    tiers
        .iter()
        .map(|t| t.from_hours)
        .find(|&from| from > position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
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

    fn flsa() -> OvertimeParams {
        OvertimeParams {
            daily_tiers: vec![],
            weekly_tiers: vec![tier("0", "1.0"), tier("40", "1.5")],
        }
    }

    fn position(daily: &str, weekly: &str, hours: &str) -> OvertimePosition {
        OvertimePosition {
            prior_daily_hours: dec(daily),
            prior_weekly_hours: dec(weekly),
            shift_hours: dec(hours),
        }
    }

    /// OT-001: 13 hours from zero under California tiers
    #[test]
    fn test_ot_001_california_13_hours() {
        let breakdown =
            OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &california(), position("0", "0", "13"));

        assert_eq!(breakdown.straight_hours, dec("8"));
        assert_eq!(breakdown.overtime_hours, dec("4"));
        assert_eq!(breakdown.double_hours, dec("1"));
        assert_eq!(breakdown.total_hours, dec("13"));
        assert_eq!(breakdown.weighted_hours, dec("16"));
        assert_eq!(breakdown.source_rule.as_deref(), Some("CA_DAILY_OVERTIME"));
    }

    /// OT-002: weekly threshold crossed mid-shift takes precedence over daily straight time
    #[test]
    fn test_ot_002_weekly_boundary_mid_shift() {
        let breakdown =
            OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &california(), position("0", "36", "8"));

        assert_eq!(breakdown.straight_hours, dec("4"));
        assert_eq!(breakdown.overtime_hours, dec("4"));
        assert_eq!(breakdown.double_hours, Decimal::ZERO);
    }

    /// OT-003: prior hours in the day shift the daily tiers
    #[test]
    fn test_ot_003_prior_daily_hours() {
        let breakdown =
            OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &california(), position("6", "6", "7"));

        assert_eq!(breakdown.straight_hours, dec("2"));
        assert_eq!(breakdown.overtime_hours, dec("4"));
        assert_eq!(breakdown.double_hours, dec("1"));
    }

    #[test]
    fn test_fractional_hours_sum_exactly() {
        let breakdown = OvertimeCalculator::breakdown(
            "CA_DAILY_OVERTIME",
            &california(),
            position("7.333333", "0", "5.333333"),
        );

        assert_eq!(
            breakdown.straight_hours + breakdown.overtime_hours + breakdown.double_hours,
            breakdown.total_hours
        );
        assert_eq!(breakdown.straight_hours, dec("0.666667"));
        assert_eq!(breakdown.overtime_hours, dec("4"));
        assert_eq!(breakdown.double_hours, dec("0.666666"));
    }

    #[test]
    fn test_zero_hours() {
        let breakdown = OvertimeCalculator::breakdown("US_FLSA_OVERTIME", &flsa(), position("0", "0", "0"));
        assert_eq!(breakdown.total_hours, Decimal::ZERO);
        assert_eq!(breakdown.straight_hours, Decimal::ZERO);
    }

    #[test]
    fn test_most_protective_prefers_highest_weighted() {
        let ca = OvertimeCalculator::breakdown("CA_DAILY_OVERTIME", &california(), position("0", "0", "13"));
        let federal = OvertimeCalculator::breakdown("US_FLSA_OVERTIME", &flsa(), position("0", "0", "13"));

        let chosen = OvertimeCalculator::most_protective(vec![federal, ca]).unwrap();
        assert_eq!(chosen.source_rule.as_deref(), Some("CA_DAILY_OVERTIME"));
    }

    #[test]
    fn test_most_protective_tie_keeps_first() {
        let first = OvertimeCalculator::breakdown("FIRST", &flsa(), position("0", "0", "8"));
        let second = OvertimeCalculator::breakdown("SECOND", &flsa(), position("0", "0", "8"));

        let chosen = OvertimeCalculator::most_protective(vec![first, second]).unwrap();
        assert_eq!(chosen.source_rule.as_deref(), Some("FIRST"));
        assert!(OvertimeCalculator::most_protective(vec![]).is_none());
    }
}
