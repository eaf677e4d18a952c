//! Worker profile and shift ledger snapshot.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::ShiftRecord;

/// The parts of a worker's profile the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Unique identifier for the worker.
    pub id: String,
    /// The worker's date of birth, required by age restriction rules.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl WorkerProfile {
    /// Returns the worker's age in whole years on the given date.
    ///
    /// # Examples
    ///
    /// ```
    /// use compliance_engine::models::WorkerProfile;
    /// use chrono::NaiveDate;
    ///
    /// let worker = WorkerProfile {
    ///     id: "wkr_001".to_string(),
    ///     date_of_birth: NaiveDate::from_ymd_opt(2008, 6, 15),
    /// };
    /// let day_before = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
    /// let birthday = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
    /// assert_eq!(worker.age_on(day_before).unwrap(), 17);
    /// assert_eq!(worker.age_on(birthday).unwrap(), 18);
    /// ```
    pub fn age_on(&self, date: NaiveDate) -> EngineResult<u32> {
        let dob = self.date_of_birth.ok_or_else(|| EngineError::InvalidWorker {
            field: "date_of_birth".to_string(),
            message: "required to evaluate age restrictions".to_string(),
        })?;

        if dob > date {
            return Err(EngineError::InvalidWorker {
                field: "date_of_birth".to_string(),
                message: format!("{} is after {}", dob, date),
            });
        }

        let mut age = date.year() - dob.year();
        if (date.month(), date.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Ok(age as u32)
    }
}

/// A snapshot of one worker's shift history, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerLedger {
    /// The worker the ledger belongs to.
    pub worker: WorkerProfile,
    /// Completed and scheduled shifts. Entries for other workers are ignored.
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    /// The instant from which the ledger is known to be complete.
    #[serde(default)]
    pub history_start: Option<NaiveDateTime>,
}

impl WorkerLedger {
    /// Creates a ledger with no known completeness bound.
    pub fn new(worker: WorkerProfile, shifts: Vec<ShiftRecord>) -> Self {
        Self {
            worker,
            shifts,
            history_start: None,
        }
    }
}
