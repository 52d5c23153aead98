use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use screener_core::{FilterConfig, ScreenRequest, SortConfig, SortKey, StockRecord};
use screener_engine::{export_filename, ScreenView, COUNTRIES, SECTORS};
use serde::{Deserialize, Serialize};

use crate::{ApiJson, ApiResponse, AppError, AppState};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UniverseResponse {
    pub records: Vec<StockRecord>,
    pub sectors: Vec<String>,
    pub countries: Vec<String>,
}

/// Current view together with the settings that produced it
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub request: ScreenRequest,
    pub records: Vec<StockRecord>,
    pub total_universe: usize,
    pub total_matched: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ViewResponse {
    fn new(request: ScreenRequest, view: ScreenView) -> Self {
        Self {
            request,
            records: view.records,
            total_universe: view.total_universe,
            total_matched: view.total_matched,
            timestamp: view.timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Record store plus the sector and country option lists
#[utoipa::path(
    get,
    path = "/api/universe",
    responses((status = 200, description = "Full record store with sector and country lists")),
    tag = "Screener"
)]
pub async fn get_universe(State(state): State<AppState>) -> Json<ApiResponse<UniverseResponse>> {
    Json(ApiResponse::success(UniverseResponse {
        records: state.dashboard.universe().records().to_vec(),
        sectors: SECTORS.iter().map(|s| s.to_string()).collect(),
        countries: COUNTRIES.iter().map(|s| s.to_string()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/screener",
    responses((status = 200, description = "View under the stored filters, sort and search")),
    tag = "Screener"
)]
pub async fn get_view(State(state): State<AppState>) -> Json<ApiResponse<ViewResponse>> {
    Json(ApiResponse::success(current_view(&state).await))
}

/// Stateless screen: the stored settings are left untouched
#[utoipa::path(
    post,
    path = "/api/screener/scan",
    request_body = ScreenRequest,
    responses(
        (status = 200, description = "Screen of the universe under the given request"),
        (status = 400, description = "Malformed request body")
    ),
    tag = "Screener"
)]
pub async fn scan(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ScreenRequest>,
) -> Json<ApiResponse<ViewResponse>> {
    let dashboard = &state.dashboard;
    let view = dashboard
        .screener()
        .screen(dashboard.universe().records(), &req);
    Json(ApiResponse::success(ViewResponse::new(req, view)))
}

#[utoipa::path(
    put,
    path = "/api/screener/filters",
    request_body = FilterConfig,
    responses(
        (status = 200, description = "View after replacing the filters"),
        (status = 400, description = "Malformed filters or unknown region group")
    ),
    tag = "Screener"
)]
pub async fn put_filters(
    State(state): State<AppState>,
    ApiJson(filters): ApiJson<FilterConfig>,
) -> Json<ApiResponse<ViewResponse>> {
    state.dashboard.set_filters(filters).await;
    Json(ApiResponse::success(current_view(&state).await))
}

#[utoipa::path(
    put,
    path = "/api/screener/search",
    request_body = SearchRequest,
    responses((status = 200, description = "View after replacing the search text")),
    tag = "Screener"
)]
pub async fn put_search(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Json<ApiResponse<ViewResponse>> {
    state.dashboard.set_search(req.query).await;
    Json(ApiResponse::success(current_view(&state).await))
}

#[utoipa::path(
    post,
    path = "/api/screener/sort/{key}",
    params(("key" = String, Path, description = "Sort key, e.g. marketCap or peRatio")),
    responses(
        (status = 200, description = "New sort configuration"),
        (status = 400, description = "Unknown sort key")
    ),
    tag = "Screener"
)]
pub async fn toggle_sort(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<SortConfig>>, AppError> {
    let key: SortKey = key.parse()?;
    let sort = state.dashboard.toggle_sort(key).await;
    tracing::debug!("Sort now {} {:?}", sort.key, sort.direction);
    Ok(Json(ApiResponse::success(sort)))
}

#[utoipa::path(
    delete,
    path = "/api/screener/sort",
    responses((status = 200, description = "Sort cleared; view keeps store order")),
    tag = "Screener"
)]
pub async fn clear_sort(State(state): State<AppState>) -> Json<ApiResponse<ViewResponse>> {
    state.dashboard.clear_sort().await;
    Json(ApiResponse::success(current_view(&state).await))
}

#[utoipa::path(
    get,
    path = "/api/screener/export.csv",
    responses(
        (status = 200, description = "CSV of the current view", content_type = "text/csv")
    ),
    tag = "Screener"
)]
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.dashboard.export_csv().await?;
    let filename = export_filename(chrono::Utc::now().date_naive());

    tracing::info!("Exported {} ({} bytes)", filename, body.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

async fn current_view(state: &AppState) -> ViewResponse {
    let request = state.dashboard.view_request().await;
    let view = state
        .dashboard
        .screener()
        .screen(state.dashboard.universe().records(), &request);
    ViewResponse::new(request, view)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn screener_routes() -> Router<AppState> {
    Router::new()
        .route("/api/universe", get(get_universe))
        .route("/api/screener", get(get_view))
        .route("/api/screener/scan", post(scan))
        .route("/api/screener/filters", put(put_filters))
        .route("/api/screener/search", put(put_search))
        .route("/api/screener/sort", delete(clear_sort))
        .route("/api/screener/sort/:key", post(toggle_sort))
        .route("/api/screener/export.csv", get(export_csv))
}
