use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dashboard::{InsightsSnapshot, RefreshOutcome};
use crate::{ApiResponse, AppError, AppState};

#[utoipa::path(
    get,
    path = "/api/insights",
    responses((status = 200, description = "Current insights and whether a refresh is running")),
    tag = "Insights"
)]
pub async fn get_insights(State(state): State<AppState>) -> Json<ApiResponse<InsightsSnapshot>> {
    Json(ApiResponse::success(state.dashboard.insights().await))
}

/// Start a background refresh of the insight feed
#[utoipa::path(
    post,
    path = "/api/insights/refresh",
    responses(
        (status = 200, description = "Refresh started"),
        (status = 409, description = "A refresh is already running")
    ),
    tag = "Insights"
)]
pub async fn refresh_insights(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InsightsSnapshot>>, AppError> {
    match state.dashboard.spawn_refresh() {
        RefreshOutcome::Accepted => Ok(Json(ApiResponse::success(
            state.dashboard.insights().await,
        ))),
        RefreshOutcome::AlreadyRunning => Err(AppError::Conflict(
            "Insights refresh already in progress".to_string(),
        )),
    }
}

pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/insights", get(get_insights))
        .route("/api/insights/refresh", post(refresh_insights))
}
