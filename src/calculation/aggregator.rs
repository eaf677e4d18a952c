//! Shift history aggregation.
//!
//! [`ShiftHistoryAggregator`] answers every history question a rule check
//! asks about a candidate shift: hours in the day, week or a trailing
//! reference period, night hours, and rest gaps. The aggregator only reads
//! the ledger snapshot it was built from.

use chrono::{Duration, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CandidateShift, NightWindow, ShiftRecord, WorkerLedger, hours_from_minutes};

use super::night_window::{night_overlap_minutes, night_worked_minutes, night_worked_minutes_within};
use super::time_window::{TimeWindow, WindowKind};

/// Hours measured over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingWindowMetric {
    /// What the window represents.
    pub window_kind: WindowKind,
    /// Inclusive start of the window.
    pub window_start: NaiveDateTime,
    /// Exclusive end of the window.
    pub window_end: NaiveDateTime,
    /// Worked hours in the window, candidate included.
    pub hours_total: Decimal,
    /// Ledger hours in the window before the candidate starts.
    pub prior_hours: Decimal,
    /// Worked night hours in the window, when a night window was requested.
    pub night_hours: Decimal,
    /// Shifts with any worked night hours in the window.
    pub night_shift_count: u32,
}

impl RollingWindowMetric {
    /// Average hours per week over the window.
    pub fn average_per_week(&self) -> Decimal {
        let weeks = (self.window_end - self.window_start).num_days() / 7;
        if weeks <= 0 {
            return self.hours_total;
        }
        (self.hours_total / Decimal::from(weeks)).round_dp(crate::models::HOURS_DECIMAL_PLACES)
    }

    /// Average night hours per shift that worked any night hours.
    pub fn night_hours_per_night_shift(&self) -> Decimal {
        if self.night_shift_count == 0 {
            return Decimal::ZERO;
        }
        (self.night_hours / Decimal::from(self.night_shift_count))
            .round_dp(crate::models::HOURS_DECIMAL_PLACES)
    }
}

/// The rest between the previous shift and the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestGap {
    /// The shift that precedes the candidate.
    pub previous_shift_id: String,
    /// When the previous shift ended.
    pub previous_end: NaiveDateTime,
    /// Hours from the previous end to the candidate start; zero when they overlap.
    pub hours: Decimal,
}

/// Aggregates one worker's ledger around a candidate shift.
#[derive(Debug, Clone)]
pub struct ShiftHistoryAggregator<'a> {
    candidate: &'a CandidateShift,
    history: Vec<&'a ShiftRecord>,
    week_start: Weekday,
    history_start: Option<NaiveDateTime>,
}

impl<'a> ShiftHistoryAggregator<'a> {
    /// Builds an aggregator for `candidate` over `ledger`.
    ///
    /// Ledger entries for other workers, the candidate's own id, and
    /// shifts that do not end after they start are ignored.
    pub fn new(ledger: &'a WorkerLedger, candidate: &'a CandidateShift, week_start: Weekday) -> Self {
        let mut history: Vec<&ShiftRecord> = ledger
            .shifts
            .iter()
            .filter(|s| {
                s.worker_id == candidate.worker_id
                    && s.id != candidate.id
                    && s.end_time > s.start_time
            })
            .collect();
        history.sort_by_key(|s| (s.start_time, s.end_time));

        Self {
            candidate,
            history,
            week_start,
            history_start: ledger.history_start,
        }
    }

    /// The candidate shift.
    pub fn candidate(&self) -> &CandidateShift {
        self.candidate
    }

    /// Ledger shifts considered, in chronological order.
    pub fn history(&self) -> &[&'a ShiftRecord] {
        &self.history
    }

    /// Returns true if the ledger is known to be complete from `instant` onwards.
    pub fn is_complete_from(&self, instant: NaiveDateTime) -> bool {
        self.history_start.is_none_or(|start| start <= instant)
    }

    /// Hours in the calendar day containing the candidate start.
    pub fn daily_hours(&self) -> RollingWindowMetric {
        self.anchored_metric(TimeWindow::day_containing(self.candidate.start_time))
    }

    /// Hours in the calendar week containing the candidate start.
    pub fn weekly_hours(&self) -> RollingWindowMetric {
        self.anchored_metric(TimeWindow::week_containing(
            self.candidate.start_time,
            self.week_start,
        ))
    }

    /// Hours in the `weeks`-week window ending at the candidate end.
    ///
    /// Returns `None` when the window would start before the earliest
    /// representable date.
    ///
    /// # Example
    ///
    /// ```
    /// use compliance_engine::calculation::ShiftHistoryAggregator;
    /// use compliance_engine::models::{ShiftRecord, WorkLocation, WorkerLedger, WorkerProfile};
    /// use chrono::{NaiveDateTime, Weekday};
    /// use rust_decimal::Decimal;
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let shift = |id: &str, start: &str, end: &str| ShiftRecord {
    ///     id: id.to_string(),
    ///     worker_id: "wkr_001".to_string(),
    ///     jurisdiction: WorkLocation::country("FR"),
    ///     start_time: at(start),
    ///     end_time: at(end),
    ///     is_night_eligible: false,
    ///     breaks: vec![],
    /// };
    ///
    /// let ledger = WorkerLedger::new(
    ///     WorkerProfile { id: "wkr_001".to_string(), date_of_birth: None },
    ///     vec![shift("s1", "2026-05-25 08:00:00", "2026-05-25 18:00:00")],
    /// );
    /// let candidate = shift("c1", "2026-06-01 08:00:00", "2026-06-01 18:00:00");
    /// let aggregator = ShiftHistoryAggregator::new(&ledger, &candidate, Weekday::Mon);
    ///
    /// let metric = aggregator.reference_period(2).unwrap();
    /// assert_eq!(metric.hours_total, Decimal::from(20));
    /// assert_eq!(metric.average_per_week(), Decimal::from(10));
    /// ```
    pub fn reference_period(&self, weeks: u32) -> Option<RollingWindowMetric> {
        let window = TimeWindow::trailing_weeks(self.candidate.end_time, weeks)?;
        let ledger_minutes = self.ledger_minutes(window.start, window.end);
        let candidate_minutes = self
            .candidate
            .worked_minutes_within(window.start, window.end);

        Some(RollingWindowMetric {
            window_kind: window.kind,
            window_start: window.start,
            window_end: window.end,
            hours_total: hours_from_minutes(ledger_minutes + candidate_minutes),
            prior_hours: hours_from_minutes(
                self.ledger_minutes(window.start, self.candidate.start_time),
            ),
            night_hours: Decimal::ZERO,
            night_shift_count: 0,
        })
    }

    /// Night hours and night shifts in the `weeks`-week window ending at the candidate end.
    pub fn night_reference_period(
        &self,
        night: NightWindow,
        weeks: u32,
    ) -> Option<RollingWindowMetric> {
        let mut metric = self.reference_period(weeks)?;

        let mut night_minutes = 0;
        let mut night_shifts = 0;
        for shift in self.history.iter().copied().chain(std::iter::once(self.candidate)) {
            let minutes =
                night_worked_minutes_within(night, shift, metric.window_start, metric.window_end);
            if minutes > 0 {
                night_minutes += minutes;
                night_shifts += 1;
            }
        }

        metric.night_hours = hours_from_minutes(night_minutes);
        metric.night_shift_count = night_shifts;
        Some(metric)
    }

    /// Night hours the candidate works, unpaid breaks excluded.
    pub fn candidate_night_hours(&self, night: NightWindow) -> Decimal {
        hours_from_minutes(night_worked_minutes(night, self.candidate))
    }

    /// Night minutes the candidate spans, breaks included.
    pub fn candidate_night_span_minutes(&self, night: NightWindow) -> i64 {
        night_overlap_minutes(night, self.candidate.start_time, self.candidate.end_time)
    }

    /// Rest since the most recent shift in the same country that started before the candidate.
    ///
    /// Returns `None` when there is no such shift, i.e. the rest is unbounded.
    pub fn rest_gap(&self) -> Option<RestGap> {
        let previous = self
            .history
            .iter()
            .filter(|s| {
                s.start_time < self.candidate.start_time
                    && s.jurisdiction.same_country(&self.candidate.jurisdiction)
            })
            .max_by_key(|s| s.end_time)?;

        let minutes = (self.candidate.start_time - previous.end_time)
            .num_minutes()
            .max(0);

        Some(RestGap {
            previous_shift_id: previous.id.clone(),
            previous_end: previous.end_time,
            hours: hours_from_minutes(minutes),
        })
    }

    /// Longest uninterrupted rest in the `days`-day window ending at the candidate end.
    ///
    /// Rest is time not covered by any shift span; breaks do not count as rest.
    pub fn longest_rest(&self, days: i64) -> (Decimal, TimeWindow) {
        let window = TimeWindow {
            kind: WindowKind::ReferencePeriod,
            start: self.candidate.end_time - Duration::days(days),
            end: self.candidate.end_time,
        };

        let mut spans: Vec<(NaiveDateTime, NaiveDateTime)> = self
            .history
            .iter()
            .copied()
            .chain(std::iter::once(self.candidate))
            .filter(|s| s.start_time < window.end && s.end_time > window.start)
            .map(|s| (s.start_time.max(window.start), s.end_time.min(window.end)))
            .collect();
        spans.sort();

        let mut longest = Duration::zero();
        let mut cursor = window.start;
        for (start, end) in spans {
            if start > cursor {
                longest = longest.max(start - cursor);
            }
            cursor = cursor.max(end);
        }
        if window.end > cursor {
            longest = longest.max(window.end - cursor);
        }

        (hours_from_minutes(longest.num_minutes()), window)
    }

    fn anchored_metric(&self, window: TimeWindow) -> RollingWindowMetric {
        let ledger_minutes = self.ledger_minutes(window.start, window.end);
        let prior_minutes = self.ledger_minutes(window.start, self.candidate.start_time);

        RollingWindowMetric {
            window_kind: window.kind,
            window_start: window.start,
            window_end: window.end,
            hours_total: hours_from_minutes(ledger_minutes + self.candidate.worked_minutes()),
            prior_hours: hours_from_minutes(prior_minutes),
            night_hours: Decimal::ZERO,
            night_shift_count: 0,
        }
    }

    fn ledger_minutes(&self, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        if end <= start {
            return 0;
        }
        self.history
            .iter()
            .map(|s| s.worked_minutes_within(start, end))
            .sum()
    }
}
