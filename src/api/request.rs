//! Request types for the compliance engine API.
//!
//! Shifts and ledgers use the engine's own serde models; this module only
//! adds the envelopes around them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::compliance::RosterEntry;
use crate::models::{CandidateShift, WorkerLedger};

/// Request body for `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// The shift to decide.
    pub candidate: CandidateShift,
    /// The worker's committed history.
    pub ledger: WorkerLedger,
    /// The instant the decision is made at.
    pub as_of: NaiveDateTime,
}

/// Request body for `POST /evaluate/roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// The instant the decisions are made at.
    pub as_of: NaiveDateTime,
    /// Each worker's ledger and candidates.
    pub workers: Vec<RosterEntry>,
}

/// Request body for `POST /opt-outs` and `POST /opt-outs/withdrawal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptOutRequest {
    /// The worker giving or withdrawing consent.
    pub worker_id: String,
    /// The rule the consent applies to.
    pub rule_code: String,
    /// When the consent change happens.
    pub as_of: NaiveDateTime,
}
