//! Night-window overlap.
//!
//! A [`NightWindow`] recurs every day. When its end hour is not after its
//! start hour it crosses midnight, so one occurrence runs from the start
//! hour on day D to the end hour on day D+1.

use chrono::{Duration, NaiveDateTime};

use crate::models::{NightWindow, ShiftRecord, overlap_minutes};

use super::time_window::midnight_of;

/// Minutes of `[start, end)` falling inside any occurrence of the night window.
///
/// # Examples
///
/// ```
/// use compliance_engine::calculation::night_overlap_minutes;
/// use compliance_engine::models::NightWindow;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let night = NightWindow { start_hour: 22, end_hour: 6 };
///
/// // 23:00 to 07:00 overlaps 22:00-06:00 for seven hours
/// let minutes = night_overlap_minutes(night, at("2026-03-02 23:00:00"), at("2026-03-03 07:00:00"));
/// assert_eq!(minutes, 7 * 60);
/// ```
pub fn night_overlap_minutes(window: NightWindow, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    if end <= start {
        return 0;
    }

    // An occurrence that crosses midnight may begin on the day before `start`.
    let mut day = midnight_of(start) - Duration::days(1);
    let last_day = midnight_of(end);
    let mut total = 0;

    while day <= last_day {
        let (occ_start, occ_end) = occurrence_on(window, day);
        total += overlap_minutes(start, end, occ_start, occ_end);
        day += Duration::days(1);
    }

    total
}

/// Night minutes actually worked during a shift, excluding unpaid breaks.
pub fn night_worked_minutes(window: NightWindow, shift: &ShiftRecord) -> i64 {
    shift
        .worked_intervals()
        .into_iter()
        .map(|(start, end)| night_overlap_minutes(window, start, end))
        .sum()
}

/// Night minutes of a shift's worked time that also fall inside `[from, to)`.
pub fn night_worked_minutes_within(
    window: NightWindow,
    shift: &ShiftRecord,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> i64 {
    shift
        .worked_intervals()
        .into_iter()
        .filter_map(|(start, end)| {
            let clipped_start = start.max(from);
            let clipped_end = end.min(to);
            (clipped_end > clipped_start).then_some((clipped_start, clipped_end))
        })
        .map(|(start, end)| night_overlap_minutes(window, start, end))
        .sum()
}

fn occurrence_on(window: NightWindow, day: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = day + Duration::hours(i64::from(window.start_hour));
    let end_day = if window.crosses_midnight() {
        day + Duration::days(1)
    } else {
        day
    };
    (start, end_day + Duration::hours(i64::from(window.end_hour)))
}
