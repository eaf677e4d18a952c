//! HTTP request handlers for the compliance engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::compliance::{evaluate, evaluate_roster, request_opt_out, request_opt_out_withdrawal};
use crate::error::EngineError;

use super::request::{EvaluateRequest, OptOutRequest, RosterRequest};
use super::response::{
    ApiError, ApiErrorResponse, ENGINE_VERSION, EvaluationResponse, RosterItemResponse,
    RosterResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/evaluate/roster", post(roster_handler))
        .route("/opt-outs", post(opt_in_handler))
        .route("/opt-outs/withdrawal", post(withdrawal_handler))
        .with_state(state)
}

/// Handler for POST /evaluate endpoint.
///
/// Decides one candidate shift against the catalog and a snapshot of the
/// resident opt-out registry.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let opt_outs = state.opt_outs().snapshot();
    let start_time = Instant::now();
    match evaluate(
        &request.candidate,
        &request.ledger,
        state.catalog(),
        &opt_outs,
        request.as_of,
    ) {
        Ok(verdict) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %request.candidate.worker_id,
                shift_id = %request.candidate.id,
                overall = ?verdict.overall,
                violations = verdict.violations.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Evaluation completed"
            );
            json_response(
                StatusCode::OK,
                EvaluationResponse {
                    evaluation_id: correlation_id,
                    engine_version: ENGINE_VERSION.to_string(),
                    verdict,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Evaluation failed"
            );
            error_response(correlation_id, err)
        }
    }
}

/// Handler for POST /evaluate/roster endpoint.
///
/// Roster evaluation is CPU bound, so it runs on the blocking pool.
async fn roster_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing roster request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let catalog = state.catalog_handle();
    let opt_outs = state.opt_outs().snapshot();
    let workers = request.workers;
    let as_of = request.as_of;
    let start_time = Instant::now();

    let joined = tokio::task::spawn_blocking(move || {
        evaluate_roster(&workers, &catalog, &opt_outs, as_of)
    })
    .await;

    let results = match joined {
        Ok(results) => results,
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Roster evaluation task failed"
            );
            return error_response(correlation_id, EngineError::CalculationError {
                message: format!("roster evaluation task failed: {}", join_error),
            });
        }
    };

    let results: Vec<RosterItemResponse> = results
        .into_iter()
        .map(|result| {
            let (verdict, error) = match result.verdict {
                Ok(verdict) => (Some(verdict), None),
                Err(err) => (None, Some(ApiErrorResponse::from(err).error)),
            };
            RosterItemResponse {
                worker_id: result.worker_id,
                shift_id: result.shift_id,
                verdict,
                error,
            }
        })
        .collect();

    info!(
        correlation_id = %correlation_id,
        candidates = results.len(),
        failed = results.iter().filter(|r| r.error.is_some()).count(),
        duration_us = start_time.elapsed().as_micros(),
        "Roster evaluation completed"
    );

    json_response(
        StatusCode::OK,
        RosterResponse {
            evaluation_id: correlation_id,
            engine_version: ENGINE_VERSION.to_string(),
            results,
        },
    )
}

/// Handler for POST /opt-outs endpoint.
async fn opt_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<OptOutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing opt-out request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match request_opt_out(
        state.opt_outs(),
        state.catalog(),
        &request.worker_id,
        &request.rule_code,
        request.as_of,
    ) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                worker_id = %request.worker_id,
                rule_code = %request.rule_code,
                error = %err,
                "Opt-out rejected"
            );
            error_response(correlation_id, err)
        }
    }
}

/// Handler for POST /opt-outs/withdrawal endpoint.
async fn withdrawal_handler(
    State(state): State<AppState>,
    payload: Result<Json<OptOutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing opt-out withdrawal request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match request_opt_out_withdrawal(
        state.opt_outs(),
        state.catalog(),
        &request.worker_id,
        &request.rule_code,
        request.as_of,
    ) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                worker_id = %request.worker_id,
                rule_code = %request.rule_code,
                error = %err,
                "Opt-out withdrawal rejected"
            );
            error_response(correlation_id, err)
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    let api_error = ApiErrorResponse::from(err).with_correlation_id(correlation_id);
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error.with_correlation_id(correlation_id))
}
