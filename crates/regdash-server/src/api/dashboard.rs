use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use regdash_core::error::RegdashError;
use regdash_core::model::{DashboardState, RequestKey};
use regdash_core::{DateRange, RangeKey};

use crate::api::{session, ApiError};
use crate::app_state::AppState;
use crate::auth::Role;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadParams {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl LoadParams {
    fn range(&self) -> &str {
        self.range.as_deref().unwrap_or(RangeKey::Last7Days.as_str())
    }
}

pub async fn get_state(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardState>, ApiError> {
    session(&state, &headers)?.require_authenticated()?;
    Ok(Json(state.loader().snapshot()))
}

pub async fn load(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let session = session(&state, &headers)?;
    let user = session.require_role(Role::Admin)?;

    let opts = state.loader().options();
    let page = params.page.unwrap_or(opts.default_page);
    let limit = params.limit.unwrap_or(opts.default_limit);
    check_paging(&state, page, limit)?;

    let range = params.range();
    tracing::debug!(user, range, page, limit, "dashboard load requested");
    state.loader().load(range, page, limit);

    Ok(accepted(RequestKey::new(range, page, limit)))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let session = session(&state, &headers)?;
    let user = session.require_role(Role::Admin)?;

    if params.page.is_some() || params.limit.is_some() {
        let opts = state.loader().options();
        check_paging(
            &state,
            params.page.unwrap_or(opts.default_page),
            params.limit.unwrap_or(opts.default_limit),
        )?;
    }

    let range = params.range();
    tracing::debug!(user, range, "dashboard refresh requested");
    state.loader().refresh(range, params.page, params.limit);

    let opts = state.loader().options();
    Ok(accepted(RequestKey::new(
        range,
        params.page.unwrap_or(opts.default_page),
        params.limit.unwrap_or(opts.default_limit),
    )))
}

pub async fn range(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoadParams>,
) -> Result<Json<DateRange>, ApiError> {
    session(&state, &headers)?.require_authenticated()?;
    let resolved = state.loader().date_range_filter(params.range())?;
    Ok(Json(resolved))
}

fn check_paging(state: &AppState, page: u32, limit: u32) -> Result<(), RegdashError> {
    let max = state.cfg().loader.max_page_limit;
    if page == 0 {
        return Err(RegdashError::BadRequest("page must be at least 1".into()));
    }
    if limit == 0 || limit > max {
        return Err(RegdashError::BadRequest(format!(
            "limit must be between 1 and {max}"
        )));
    }
    Ok(())
}

fn accepted(key: RequestKey) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": true, "request": key.as_str() })),
    )
}
