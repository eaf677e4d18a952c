//! HTTP API module for the compliance engine.
//!
//! This module provides the REST endpoints for evaluating shifts and
//! rosters and for recording opt-out consent.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EvaluateRequest, OptOutRequest, RosterRequest};
pub use response::{
    ApiError, ENGINE_VERSION, EvaluationResponse, RosterItemResponse, RosterResponse,
};
pub use state::AppState;
