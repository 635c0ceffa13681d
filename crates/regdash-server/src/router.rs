//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/v1/dashboard", get(api::dashboard::get_state))
        .route("/v1/dashboard/load", post(api::dashboard::load))
        .route("/v1/dashboard/refresh", post(api::dashboard::refresh))
        .route("/v1/dashboard/range", get(api::dashboard::range))
        .route("/v1/registrations", post(api::registrations::submit))
        .with_state(state)
}
