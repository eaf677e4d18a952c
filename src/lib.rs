//! Labor-law and overtime compliance rule engine
//!
//! This crate decides, for a worker's candidate or actual shift, whether the
//! shift breaks a jurisdiction's working-time, rest, break, night-work or
//! minor-worker rules, and how its hours split across overtime multipliers.
//! Rules are loaded from a YAML catalog; evaluation is a pure function of the
//! catalog, the worker's shift ledger, opt-out consent and the decision instant.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod catalog;
pub mod compliance;
pub mod config;
pub mod error;
pub mod models;
