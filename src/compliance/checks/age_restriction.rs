//! Minimum ages and night work by young workers.

use rust_decimal::Decimal;

use crate::calculation::night_overlap_minutes;
use crate::error::EngineResult;
use crate::models::{AgeRestrictionParams, CandidateShift, MeasureUnit, WorkerProfile};

use super::CheckOutcome;

/// Checks the worker's age at the candidate start.
///
/// Fails below `min_working_age`, or below `min_age_for_night_work` when
/// the shift overlaps the night window. The worker's age is only needed
/// when one of those limits could apply.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidWorker`] when the age is
/// needed but the date of birth is missing or after the shift date.
pub fn check(
    params: &AgeRestrictionParams,
    worker: &WorkerProfile,
    candidate: &CandidateShift,
) -> EngineResult<CheckOutcome> {
    let night_limit = match (params.min_age_for_night_work, params.night_window()) {
        (Some(min_age), Some(window))
            if night_overlap_minutes(window, candidate.start_time, candidate.end_time) > 0 =>
        {
            Some((min_age, window))
        }
        _ => None,
    };

    if params.min_working_age.is_none() && night_limit.is_none() {
        return Ok(CheckOutcome::not_applicable(
            MeasureUnit::Years,
            "shift does not overlap the restricted night window",
        ));
    }

    let age = worker.age_on(candidate.start_time.date())?;
    let measured = Decimal::from(age);

    if let Some(min_age) = params.min_working_age {
        if age < min_age {
            return Ok(CheckOutcome::measured(
                false,
                measured,
                Decimal::from(min_age),
                MeasureUnit::Years,
                format!("worker aged {} is below minimum working age {}", age, min_age),
            ));
        }
    }

    if let Some((min_age, window)) = night_limit {
        let passed = age >= min_age;
        let message = if passed {
            format!("worker aged {} may work at night", age)
        } else {
            format!(
                "worker aged {} may not work between {:02}:00 and {:02}:00 under age {}",
                age, window.start_hour, window.end_hour, min_age
            )
        };
        return Ok(CheckOutcome::measured(
            passed,
            measured,
            Decimal::from(min_age),
            MeasureUnit::Years,
            message,
        ));
    }

    let min_age = params.min_working_age.unwrap_or_default();
    Ok(CheckOutcome::measured(
        true,
        measured,
        Decimal::from(min_age),
        MeasureUnit::Years,
        format!("worker aged {} meets minimum working age {}", age, min_age),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::WorkLocation;
    use chrono::{NaiveDate, NaiveDateTime};

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn youth_night() -> AgeRestrictionParams {
        AgeRestrictionParams {
            min_working_age: Some(15),
            min_age_for_night_work: Some(18),
            night_start_hour: Some(22),
            night_end_hour: Some(6),
        }
    }

    fn worker(dob: Option<NaiveDate>) -> WorkerProfile {
        WorkerProfile {
            id: "wkr_001".to_string(),
            date_of_birth: dob,
        }
    }

    fn make_shift(start: &str, end: &str) -> CandidateShift {
        CandidateShift {
            id: "c1".to_string(),
            worker_id: "wkr_001".to_string(),
            jurisdiction: WorkLocation::country("FR"),
            start_time: make_datetime(start),
            end_time: make_datetime(end),
            is_night_eligible: true,
            breaks: vec![],
        }
    }

    /// AR-001: seventeen-year-old on a night shift fails
    #[test]
    fn test_ar_001_minor_at_night() {
        let seventeen = worker(NaiveDate::from_ymd_opt(2008, 9, 1));
        let shift = make_shift("2026-03-02 23:00:00", "2026-03-03 07:00:00");

        let outcome = check(&youth_night(), &seventeen, &shift).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.measured_value, Some(Decimal::from(17)));
        assert_eq!(outcome.threshold_value, Some(Decimal::from(18)));
        assert_eq!(outcome.unit, MeasureUnit::Years);
    }

    /// AR-002: the same worker on a day shift passes
    #[test]
    fn test_ar_002_minor_by_day() {
        let seventeen = worker(NaiveDate::from_ymd_opt(2008, 9, 1));
        let shift = make_shift("2026-03-02 08:00:00", "2026-03-02 16:00:00");

        assert!(check(&youth_night(), &seventeen, &shift).unwrap().passed);
    }

    #[test]
    fn test_below_minimum_working_age() {
        let fourteen = worker(NaiveDate::from_ymd_opt(2011, 6, 1));
        let shift = make_shift("2026-03-02 08:00:00", "2026-03-02 12:00:00");

        let outcome = check(&youth_night(), &fourteen, &shift).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.threshold_value, Some(Decimal::from(15)));
    }

    #[test]
    fn test_adult_at_night_passes() {
        let adult = worker(NaiveDate::from_ymd_opt(1990, 1, 1));
        let shift = make_shift("2026-03-02 23:00:00", "2026-03-03 07:00:00");

        assert!(check(&youth_night(), &adult, &shift).unwrap().passed);
    }

    #[test]
    fn test_missing_date_of_birth_is_error() {
        let shift = make_shift("2026-03-02 23:00:00", "2026-03-03 07:00:00");
        let result = check(&youth_night(), &worker(None), &shift);
        assert!(matches!(result, Err(EngineError::InvalidWorker { .. })));
    }

    #[test]
    fn test_night_only_rule_skips_age_by_day() {
        let params = AgeRestrictionParams {
            min_working_age: None,
            ..youth_night()
        };
        let shift = make_shift("2026-03-02 08:00:00", "2026-03-02 16:00:00");

        let outcome = check(&params, &worker(None), &shift).unwrap();
        assert!(outcome.passed);
        assert!(outcome.measured_value.is_none());
    }
}
