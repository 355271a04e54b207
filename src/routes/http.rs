// GET/POST handlers: version, raw snapshot, status, chart, selection, reload

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::dashboard::DataState;
use crate::models::{Granularity, Lookback};
use crate::version::{NAME, VERSION};
use crate::worker::DashboardStatus;

/// Selector labels as the UI sends them; absent fields keep the current value.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SelectionRequest {
    pub granularity: Option<String>,
    pub lookback: Option<String>,
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /database.json — the stored raw snapshot, re-serialized.
pub(super) async fn raw_snapshot_handler(State(state): State<AppState>) -> Response {
    match state.dashboard.raw_snapshot().await {
        Ok(Some(snapshot)) => Json(snapshot).into_response(),
        Ok(None) => unavailable("loading"),
        Err(e) => internal_error(e),
    }
}

/// GET /api/status — data state plus current selection.
pub(super) async fn status_handler(State(state): State<AppState>) -> Response {
    match state.dashboard.status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/chart — latest resampled chart, 503 while loading or after a failed fetch.
pub(super) async fn chart_handler(State(state): State<AppState>) -> Response {
    match state.dashboard.status().await {
        Ok(status) => chart_response(&state, &status),
        Err(e) => internal_error(e),
    }
}

/// POST /api/selection — change granularity and/or lookback, returns the recomputed chart.
pub(super) async fn selection_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Response {
    let granularity = req.granularity.as_deref().map(Granularity::from_label);
    let lookback = req.lookback.as_deref().map(Lookback::from_label);
    match state.dashboard.select(granularity, lookback).await {
        Ok(status) => chart_response(&state, &status),
        Err(e) => internal_error(e),
    }
}

/// POST /api/reload — re-fetch the snapshot and report the resulting state.
pub(super) async fn reload_handler(State(state): State<AppState>) -> Response {
    match state.dashboard.reload().await {
        Ok(status) if status.state == DataState::Ready => Json(status).into_response(),
        Ok(status) => (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn chart_response(state: &AppState, status: &DashboardStatus) -> Response {
    match &status.state {
        DataState::Ready => match state.dashboard.chart() {
            Some(chart) => Json(chart).into_response(),
            None => unavailable("loading"),
        },
        DataState::Loading => unavailable("loading"),
        DataState::Unavailable(reason) => unavailable(reason),
    }
}

fn unavailable(reason: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": reason })),
    )
        .into_response()
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::warn!(error = %e, "dashboard request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}
