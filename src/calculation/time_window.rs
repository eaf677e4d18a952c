//! Calendar windows used to measure worked hours.
//!
//! Windows are half-open `[start, end)` intervals of local wall-clock time.
//! Days run midnight to midnight; weeks start at midnight on the
//! jurisdiction's configured first weekday.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Which kind of window a measurement was taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// The calendar day containing the shift start.
    Day,
    /// The calendar week containing the shift start.
    Week,
    /// A trailing window of whole weeks ending at the shift end.
    ReferencePeriod,
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowKind::Day => write!(f, "day"),
            WindowKind::Week => write!(f, "week"),
            WindowKind::ReferencePeriod => write!(f, "reference_period"),
        }
    }
}

/// A half-open interval of local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// What the window represents.
    pub kind: WindowKind,
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// Exclusive end.
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// The calendar day containing `instant`.
    ///
    /// # Examples
    ///
    /// ```
    /// use compliance_engine::calculation::TimeWindow;
    /// use chrono::NaiveDateTime;
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let day = TimeWindow::day_containing(at("2026-01-15 22:00:00"));
    /// assert_eq!(day.start, at("2026-01-15 00:00:00"));
    /// assert_eq!(day.end, at("2026-01-16 00:00:00"));
    /// ```
    pub fn day_containing(instant: NaiveDateTime) -> Self {
        let start = midnight_of(instant);
        Self {
            kind: WindowKind::Day,
            start,
            end: start + Duration::days(1),
        }
    }

    /// The seven-day week containing `instant`, starting on `week_start`.
    pub fn week_containing(instant: NaiveDateTime, week_start: Weekday) -> Self {
        let days_back = (instant.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        let start = midnight_of(instant) - Duration::days(i64::from(days_back));
        Self {
            kind: WindowKind::Week,
            start,
            end: start + Duration::weeks(1),
        }
    }

    /// The `weeks`-week window ending at `end`.
    ///
    /// Returns `None` when the window would start before the earliest
    /// representable date.
    pub fn trailing_weeks(end: NaiveDateTime, weeks: u32) -> Option<Self> {
        let start = end.checked_sub_signed(Duration::try_weeks(i64::from(weeks))?)?;
        Some(Self {
            kind: WindowKind::ReferencePeriod,
            start,
            end,
        })
    }

    /// Returns true if `instant` lies within the window.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Midnight at the start of the day containing `instant`.
pub fn midnight_of(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(NaiveTime::MIN)
}
