//! Opt-out consent registry.
//!
//! [`OptOutRegistry`] is a pure state machine keyed by worker and rule.
//! Every transition takes the instant it happens at; the registry never
//! reads a clock. [`SharedOptOutRegistry`] wraps it for callers that keep
//! it resident across requests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{OptOutRecord, OptOutState};

/// Per-worker, per-rule consent records.
///
/// # Example
///
/// ```
/// use compliance_engine::compliance::OptOutRegistry;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let mut registry = OptOutRegistry::new();
///
/// registry.opt_in("wkr_001", "WTD_WEEKLY_MAX", at("2026-01-05 09:00:00"));
/// registry
///     .request_withdrawal("wkr_001", "WTD_WEEKLY_MAX", 7, at("2026-02-02 09:00:00"))
///     .unwrap();
///
/// assert!(registry.is_active("wkr_001", "WTD_WEEKLY_MAX", at("2026-02-08 23:59:00")));
/// assert!(!registry.is_active("wkr_001", "WTD_WEEKLY_MAX", at("2026-02-09 09:00:00")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptOutRegistry {
    records: HashMap<(String, String), OptOutRecord>,
}

impl OptOutRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record for a worker and rule, if any.
    pub fn record(&self, worker_id: &str, rule_code: &str) -> Option<&OptOutRecord> {
        self.records
            .get(&(worker_id.to_string(), rule_code.to_string()))
    }

    /// All stored records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &OptOutRecord> {
        self.records.values()
    }

    /// The consent state at `as_of`.
    pub fn state(&self, worker_id: &str, rule_code: &str, as_of: NaiveDateTime) -> OptOutState {
        self.record(worker_id, rule_code)
            .map(|r| r.state_at(as_of))
            .unwrap_or_default()
    }

    /// Returns true if the worker's consent for the rule is in force at `as_of`.
    pub fn is_active(&self, worker_id: &str, rule_code: &str, as_of: NaiveDateTime) -> bool {
        self.record(worker_id, rule_code)
            .is_some_and(|r| r.is_active(as_of))
    }

    /// Records the worker's consent.
    ///
    /// Opting in while already opted in keeps the original consent time.
    /// Opting in while a withdrawal is pending cancels the withdrawal.
    pub fn opt_in(&mut self, worker_id: &str, rule_code: &str, as_of: NaiveDateTime) -> OptOutRecord {
        let record = self
            .records
            .entry((worker_id.to_string(), rule_code.to_string()))
            .or_insert_with(|| OptOutRecord::new(worker_id, rule_code));

        match record.state_at(as_of) {
            OptOutState::OptedIn => {}
            OptOutState::WithdrawalPending => {
                record.state = OptOutState::OptedIn;
                record.withdrawal_requested_at = None;
                record.withdrawal_effective_at = None;
            }
            OptOutState::None => {
                record.state = OptOutState::OptedIn;
                record.opted_in_at = Some(as_of);
                record.withdrawal_requested_at = None;
                record.withdrawal_effective_at = None;
            }
        }

        record.clone()
    }

    /// Starts withdrawing the worker's consent.
    ///
    /// Consent stays in force until `as_of + notice_days`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidOptOutTransition`] unless the worker is
    /// currently opted in, or when the notice period ends past the
    /// representable date range.
    pub fn request_withdrawal(
        &mut self,
        worker_id: &str,
        rule_code: &str,
        notice_days: u32,
        as_of: NaiveDateTime,
    ) -> EngineResult<OptOutRecord> {
        let invalid = |message: &str| EngineError::InvalidOptOutTransition {
            worker_id: worker_id.to_string(),
            rule_code: rule_code.to_string(),
            message: message.to_string(),
        };

        let record = self
            .records
            .get_mut(&(worker_id.to_string(), rule_code.to_string()))
            .ok_or_else(|| invalid("no active opt-out to withdraw"))?;

        match record.state_at(as_of) {
            OptOutState::OptedIn => {
                let effective = Duration::try_days(i64::from(notice_days))
                    .and_then(|notice| as_of.checked_add_signed(notice))
                    .ok_or_else(|| invalid("notice period ends past the representable date range"))?;
                record.state = OptOutState::WithdrawalPending;
                record.withdrawal_requested_at = Some(as_of);
                record.withdrawal_effective_at = Some(effective);
                Ok(record.clone())
            }
            OptOutState::WithdrawalPending => Err(invalid("withdrawal already pending")),
            OptOutState::None => Err(invalid("no active opt-out to withdraw")),
        }
    }

    /// Moves every withdrawal whose notice period has ended at `as_of` to `NONE`.
    ///
    /// The effective instant is kept, so queries for earlier instants still
    /// see the withdrawal as pending. Returns the number of records that changed.
    pub fn expire(&mut self, as_of: NaiveDateTime) -> usize {
        let mut expired = 0;
        for record in self.records.values_mut() {
            if record.state == OptOutState::WithdrawalPending
                && record.state_at(as_of) == OptOutState::None
            {
                record.state = OptOutState::None;
                expired += 1;
            }
        }
        expired
    }
}

/// An [`OptOutRegistry`] shared across threads.
///
/// Writers are serialized; the last write wins. Evaluations read from a
/// [`snapshot`](Self::snapshot) taken once per batch.
#[derive(Debug, Clone, Default)]
pub struct SharedOptOutRegistry {
    inner: Arc<RwLock<OptOutRegistry>>,
}

impl SharedOptOutRegistry {
    /// Wraps an existing registry.
    pub fn new(registry: OptOutRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// A point-in-time copy of the registry.
    pub fn snapshot(&self) -> OptOutRegistry {
        self.inner.read().clone()
    }

    /// Records consent; see [`OptOutRegistry::opt_in`].
    pub fn opt_in(&self, worker_id: &str, rule_code: &str, as_of: NaiveDateTime) -> OptOutRecord {
        let mut registry = self.inner.write();
        let previous = registry.state(worker_id, rule_code, as_of);
        let record = registry.opt_in(worker_id, rule_code, as_of);
        info!(
            worker_id = %worker_id,
            rule_code = %rule_code,
            previous_state = ?previous,
            state = ?record.state,
            as_of = %as_of,
            "Opt-in recorded"
        );
        record
    }

    /// Starts a withdrawal; see [`OptOutRegistry::request_withdrawal`].
    pub fn request_withdrawal(
        &self,
        worker_id: &str,
        rule_code: &str,
        notice_days: u32,
        as_of: NaiveDateTime,
    ) -> EngineResult<OptOutRecord> {
        let mut registry = self.inner.write();
        let previous = registry.state(worker_id, rule_code, as_of);
        match registry.request_withdrawal(worker_id, rule_code, notice_days, as_of) {
            Ok(record) => {
                info!(
                    worker_id = %worker_id,
                    rule_code = %rule_code,
                    previous_state = ?previous,
                    effective_at = ?record.withdrawal_effective_at,
                    "Opt-out withdrawal requested"
                );
                Ok(record)
            }
            Err(error) => {
                warn!(
                    worker_id = %worker_id,
                    rule_code = %rule_code,
                    previous_state = ?previous,
                    error = %error,
                    "Opt-out withdrawal rejected"
                );
                Err(error)
            }
        }
    }
}
