//! Shift model and related types.
//!
//! This module defines the [`ShiftRecord`] and [`Break`] structs for
//! representing worked or scheduled shifts. Shift times are local
//! wall-clock times in the work location's calendar.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::WorkLocation;

/// Number of decimal places kept when converting minutes to hours.
pub const HOURS_DECIMAL_PLACES: u32 = 6;

/// Converts a number of minutes to hours, rounded to [`HOURS_DECIMAL_PLACES`].
///
/// # Examples
///
/// ```
/// use compliance_engine::models::hours_from_minutes;
/// use rust_decimal::Decimal;
///
/// assert_eq!(hours_from_minutes(450), Decimal::new(75, 1)); // 7.5
/// ```
pub fn hours_from_minutes(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(HOURS_DECIMAL_PLACES)
}

/// Minutes shared by the half-open intervals `[a_start, a_end)` and `[b_start, b_end)`.
pub fn overlap_minutes(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start {
        (end - start).num_minutes()
    } else {
        0
    }
}

/// Represents a break taken during a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    /// The start time of the break.
    pub start_time: NaiveDateTime,
    /// The end time of the break.
    pub end_time: NaiveDateTime,
    /// Whether the break is paid (true) or unpaid (false).
    #[serde(default)]
    pub is_paid: bool,
}

impl Break {
    /// Returns the duration of the break in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// One completed or scheduled shift in a worker's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The worker this shift belongs to.
    pub worker_id: String,
    /// Where the shift is worked.
    pub jurisdiction: WorkLocation,
    /// The start time of the shift.
    pub start_time: NaiveDateTime,
    /// The end time of the shift.
    pub end_time: NaiveDateTime,
    /// Whether the shift counts as night work for night-work limits.
    #[serde(default)]
    pub is_night_eligible: bool,
    /// Breaks taken during the shift.
    #[serde(default)]
    pub breaks: Vec<Break>,
}

/// A shift submitted for evaluation that has not been committed yet.
pub type CandidateShift = ShiftRecord;

impl ShiftRecord {
    /// Checks that the shift and its breaks are well formed.
    ///
    /// A shift must end after it starts, and every break must lie inside the
    /// shift and end after it starts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_time <= self.start_time {
            return Err(EngineError::InvalidShift {
                shift_id: self.id.clone(),
                message: "end time must be after start time".to_string(),
            });
        }
        if self.start_time.second() != 0 || self.end_time.second() != 0 {
            return Err(EngineError::InvalidShift {
                shift_id: self.id.clone(),
                message: "shift times must be whole minutes".to_string(),
            });
        }
        for b in &self.breaks {
            if b.end_time <= b.start_time {
                return Err(EngineError::InvalidShift {
                    shift_id: self.id.clone(),
                    message: format!("break starting {} ends before it starts", b.start_time),
                });
            }
            if b.start_time < self.start_time || b.end_time > self.end_time {
                return Err(EngineError::InvalidShift {
                    shift_id: self.id.clone(),
                    message: format!("break starting {} lies outside the shift", b.start_time),
                });
            }
        }
        Ok(())
    }

    /// Total elapsed minutes from start to end, breaks included.
    pub fn span_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Worked minutes: the shift span minus unpaid breaks.
    pub fn worked_minutes(&self) -> i64 {
        self.worked_minutes_within(self.start_time, self.end_time)
    }

    /// Calculates the total worked hours for the shift.
    ///
    /// Unpaid breaks are subtracted; paid breaks count as worked time.
    ///
    /// # Examples
    ///
    /// ```
    /// use compliance_engine::models::{Break, ShiftRecord, WorkLocation};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let shift = ShiftRecord {
    ///     id: "shift_001".to_string(),
    ///     worker_id: "wkr_001".to_string(),
    ///     jurisdiction: WorkLocation::subdivision("US", "CA"),
    ///     start_time: at("2026-01-15 09:00:00"),
    ///     end_time: at("2026-01-15 17:30:00"),
    ///     is_night_eligible: false,
    ///     breaks: vec![Break {
    ///         start_time: at("2026-01-15 12:00:00"),
    ///         end_time: at("2026-01-15 12:30:00"),
    ///         is_paid: false,
    ///     }],
    /// };
    /// assert_eq!(shift.worked_hours(), Decimal::new(80, 1)); // 8.0 hours
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        hours_from_minutes(self.worked_minutes())
    }

    /// Worked minutes falling inside `[window_start, window_end)`.
    ///
    /// The overlap of the shift with the window, minus the overlap of each
    /// unpaid break with the window.
    pub fn worked_minutes_within(
        &self,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> i64 {
        let span = overlap_minutes(self.start_time, self.end_time, window_start, window_end);
        let unpaid: i64 = self
            .breaks
            .iter()
            .filter(|b| !b.is_paid)
            .map(|b| overlap_minutes(b.start_time, b.end_time, window_start, window_end))
            .sum();
        (span - unpaid).max(0)
    }

    /// Worked intervals of the shift: the span split around unpaid breaks.
    pub fn worked_intervals(&self) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let mut unpaid: Vec<&Break> = self.breaks.iter().filter(|b| !b.is_paid).collect();
        unpaid.sort_by_key(|b| b.start_time);

        let mut intervals = Vec::new();
        let mut cursor = self.start_time;
        for b in unpaid {
            if b.start_time > cursor {
                intervals.push((cursor, b.start_time));
            }
            cursor = cursor.max(b.end_time);
        }
        if self.end_time > cursor {
            intervals.push((cursor, self.end_time));
        }
        intervals
    }
}
