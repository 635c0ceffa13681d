//! JSON HTTP API (presentation layer over the dashboard loader).
//!
//! - `/v1/dashboard`          : published dashboard state
//! - `/v1/dashboard/load`     : trigger a debounced load
//! - `/v1/dashboard/refresh`  : load with default pagination
//! - `/v1/dashboard/range`    : resolve a range key
//! - `/v1/registrations`      : registration form submission

pub mod dashboard;
pub mod error;
pub mod registrations;

pub use error::ApiError;

use axum::http::HeaderMap;

use regdash_core::error::Result;

use crate::app_state::AppState;
use crate::auth::{bearer_token, Session};

/// Resolve the caller's session from the `Authorization` header.
pub(crate) fn session(state: &AppState, headers: &HeaderMap) -> Result<Session> {
    state.resolve_session(bearer_token(headers)?)
}
