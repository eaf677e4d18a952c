//! Error types for the compliance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the error conditions that can occur while loading a rule catalog,
//! evaluating a shift, or mutating opt-out consent.
//!
//! Rule-level problems found during evaluation are not surfaced through
//! this type: they become configuration-error entries inside the verdict so
//! that one bad rule never aborts the evaluation of the others.

use thiserror::Error;

/// The main error type for the compliance engine.
///
/// # Example
///
/// ```
/// use compliance_engine::error::EngineError;
///
/// let error = EngineError::RuleNotFound {
///     rule_code: "WTD_WEEKLY_MAX".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rule not found: WTD_WEEKLY_MAX");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The jurisdiction tree is inconsistent: duplicate codes, unknown parents or cycles.
    #[error("Invalid jurisdiction '{code}': {message}")]
    InvalidJurisdiction {
        /// The jurisdiction code at fault.
        code: String,
        /// A description of the inconsistency.
        message: String,
    },

    /// A rule definition carried parameters that do not fit its rule type.
    #[error("Invalid rule definition '{rule_code}': {message}")]
    InvalidRuleDefinition {
        /// The code of the offending rule.
        rule_code: String,
        /// A description of what made the rule invalid.
        message: String,
    },

    /// No rule with the given code exists in the catalog.
    #[error("Rule not found: {rule_code}")]
    RuleNotFound {
        /// The rule code that was not found.
        rule_code: String,
    },

    /// The worker asked to opt out of a rule that does not permit it.
    #[error("Rule '{rule_code}' does not allow opt-out")]
    OptOutNotAllowed {
        /// The rule code.
        rule_code: String,
    },

    /// The requested opt-out transition is not valid from the current state.
    #[error("Invalid opt-out transition for worker '{worker_id}' on rule '{rule_code}': {message}")]
    InvalidOptOutTransition {
        /// The worker requesting the transition.
        worker_id: String,
        /// The rule code.
        rule_code: String,
        /// A description of why the transition was rejected.
        message: String,
    },

    /// A shift was invalid or contained inconsistent data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// A worker record was missing data a rule needs, or was inconsistent.
    #[error("Invalid worker field '{field}': {message}")]
    InvalidWorker {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
