//! Opt-out consent records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Consent state of one worker for one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptOutState {
    /// No consent on record.
    #[default]
    None,
    /// The worker has consented to exceed the rule's limit.
    OptedIn,
    /// The worker has asked to withdraw; consent holds until the notice period ends.
    WithdrawalPending,
}

/// The consent record for one worker and one rule.
///
/// # Example
///
/// ```
/// use compliance_engine::models::{OptOutRecord, OptOutState};
///
/// let record = OptOutRecord::new("wkr_001", "WTD_WEEKLY_MAX");
/// assert_eq!(record.state, OptOutState::None);
/// assert!(record.opted_in_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptOutRecord {
    /// The worker who gave consent.
    pub worker_id: String,
    /// The rule the consent applies to.
    pub rule_code: String,
    /// Current state.
    pub state: OptOutState,
    /// When the current consent was given.
    #[serde(default)]
    pub opted_in_at: Option<NaiveDateTime>,
    /// When withdrawal was requested.
    #[serde(default)]
    pub withdrawal_requested_at: Option<NaiveDateTime>,
    /// When a pending withdrawal takes effect.
    #[serde(default)]
    pub withdrawal_effective_at: Option<NaiveDateTime>,
}

impl OptOutRecord {
    /// A record in the `NONE` state.
    pub fn new(worker_id: impl Into<String>, rule_code: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            rule_code: rule_code.into(),
            state: OptOutState::None,
            opted_in_at: None,
            withdrawal_requested_at: None,
            withdrawal_effective_at: None,
        }
    }

    /// The state as observed at `as_of`.
    ///
    /// A pending withdrawal whose effective instant has passed reads as `NONE`.
    /// A withdrawal already materialized as `NONE` still reads as pending
    /// before its effective instant, so expiry never changes an answer.
    pub fn state_at(&self, as_of: NaiveDateTime) -> OptOutState {
        match (self.state, self.withdrawal_effective_at) {
            (OptOutState::WithdrawalPending, Some(effective)) if as_of >= effective => {
                OptOutState::None
            }
            (OptOutState::None, Some(effective)) if as_of < effective => {
                OptOutState::WithdrawalPending
            }
            (state, _) => state,
        }
    }

    /// Returns true if consent is in force at `as_of`.
    pub fn is_active(&self, as_of: NaiveDateTime) -> bool {
        matches!(
            self.state_at(as_of),
            OptOutState::OptedIn | OptOutState::WithdrawalPending
        )
    }
}
