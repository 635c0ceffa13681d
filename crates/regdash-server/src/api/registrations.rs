use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use regdash_core::model::{NewRegistration, Registration};

use crate::api::{session, ApiError};
use crate::app_state::AppState;

/// Form submission; open to anonymous sessions.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewRegistration>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let session = session(&state, &headers)?;
    let row = state.backend().submit(new)?;
    tracing::info!(
        id = row.id,
        step = row.current_step,
        by = session.user_id().unwrap_or("anonymous"),
        "registration submitted"
    );
    Ok((StatusCode::CREATED, Json(row)))
}
