// HTTP routes over the dashboard task

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::worker::DashboardHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dashboard: DashboardHandle,
}

pub fn app(dashboard: DashboardHandle) -> Router {
    let state = AppState { dashboard };
    Router::new()
        .route("/", get(|| async { "tracker-stats: dashboard backend" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/database.json", get(http::raw_snapshot_handler)) // GET /database.json
        .route("/api/status", get(http::status_handler)) // GET /api/status
        .route("/api/chart", get(http::chart_handler)) // GET /api/chart
        .route("/api/selection", post(http::selection_handler)) // POST /api/selection
        .route("/api/reload", post(http::reload_handler)) // POST /api/reload
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
