//! Response types for the compliance engine API.
//!
//! This module defines the success bodies and the error response
//! structures for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::ComplianceVerdict;

/// Version reported with every evaluation.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response body for `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Correlation id of the request.
    pub evaluation_id: Uuid,
    /// Engine version that produced the verdict.
    pub engine_version: String,
    /// The verdict.
    pub verdict: ComplianceVerdict,
}

/// One candidate's outcome in a roster response.
///
/// Exactly one of `verdict` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterItemResponse {
    /// The worker the candidate belongs to.
    pub worker_id: String,
    /// The candidate's id.
    pub shift_id: String,
    /// The verdict, when the candidate could be evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ComplianceVerdict>,
    /// Why the candidate could not be evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for `POST /evaluate/roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    /// Correlation id of the request.
    pub evaluation_id: Uuid,
    /// Engine version that produced the verdicts.
    pub engine_version: String,
    /// One entry per candidate.
    pub results: Vec<RosterItemResponse>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable code, e.g. `RULE_NOT_FOUND`.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Extra context for the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Correlation id of the failed request, matching the server logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl ApiError {
    /// An error with a code and message only.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            correlation_id: None,
        }
    }

    /// Attaches details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches the request's correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// A request body that parsed but is missing required fields.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// A request body that is not valid JSON for the endpoint.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// An [`ApiError`] paired with its HTTP status.
pub struct ApiErrorResponse {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Body to respond with.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Attaches the request's correlation id to the body.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.error = self.error.with_correlation_id(correlation_id);
        self
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        // Catalog problems are the operator's fault, never the caller's
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidJurisdiction { .. }
            | EngineError::InvalidRuleDefinition { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::RuleNotFound { .. } => (StatusCode::NOT_FOUND, "RULE_NOT_FOUND"),
            EngineError::OptOutNotAllowed { .. } => (StatusCode::BAD_REQUEST, "OPT_OUT_NOT_ALLOWED"),
            EngineError::InvalidOptOutTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_OPT_OUT_TRANSITION")
            }
            EngineError::InvalidShift { .. } => (StatusCode::BAD_REQUEST, "INVALID_SHIFT"),
            EngineError::InvalidWorker { .. } => (StatusCode::BAD_REQUEST, "INVALID_WORKER"),
            EngineError::CalculationError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CALCULATION_ERROR")
            }
        };

        let details = match &error {
            EngineError::RuleNotFound { rule_code } => {
                Some(format!("No rule with code '{}' is loaded", rule_code))
            }
            EngineError::OptOutNotAllowed { rule_code } => Some(format!(
                "Rule '{}' does not permit workers to opt out",
                rule_code
            )),
            EngineError::InvalidOptOutTransition { worker_id, rule_code, .. } => Some(format!(
                "Current consent of worker '{}' for rule '{}' does not allow this change",
                worker_id, rule_code
            )),
            _ => None,
        };

        let mut api_error = ApiError::new(code, error.to_string());
        if let Some(details) = details {
            api_error = api_error.with_details(details);
        }

        ApiErrorResponse {
            status,
            error: api_error,
        }
    }
}
