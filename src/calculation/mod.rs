//! Time arithmetic for the compliance engine.
//!
//! This module contains the calendar windows hours are measured over,
//! night-window overlap, the shift history aggregator every rule check
//! reads from, and the overtime calculator.

mod aggregator;
mod night_window;
mod overtime;
mod time_window;

pub use aggregator::{RestGap, RollingWindowMetric, ShiftHistoryAggregator};
pub use night_window::{night_overlap_minutes, night_worked_minutes, night_worked_minutes_within};
pub use overtime::{OvertimeCalculator, OvertimePosition};
pub use time_window::{TimeWindow, WindowKind, midnight_of};
