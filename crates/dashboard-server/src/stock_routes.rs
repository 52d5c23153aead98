use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use screener_core::{HistoryPoint, StockRecord};
use screener_engine::generate_history_now;
use serde::{Deserialize, Serialize};

use crate::dashboard::SelectionSnapshot;
use crate::{ApiQuery, ApiResponse, AppError, AppState};

const DEFAULT_HISTORY_POINTS: usize = 30;
const MAX_HISTORY_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    #[serde(flatten)]
    pub record: StockRecord,
    pub yahoo_url: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of yearly steps before the current year (default 30)
    pub points: Option<usize>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    pub ticker: String,
    pub history: Vec<HistoryPoint>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/stocks/{ticker}",
    params(("ticker" = String, Path, description = "Ticker, case-insensitive")),
    responses(
        (status = 200, description = "Stock record with quote link"),
        (status = 404, description = "Unknown ticker")
    ),
    tag = "Stocks"
)]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<StockDetail>>, AppError> {
    let record = state.dashboard.universe().get(&ticker)?.clone();
    let yahoo_url = record.yahoo_url();
    Ok(Json(ApiResponse::success(StockDetail { record, yahoo_url })))
}

/// Illustrative random-walk history ending at the current price
#[utoipa::path(
    get,
    path = "/api/stocks/{ticker}/history",
    params(
        ("ticker" = String, Path, description = "Ticker, case-insensitive"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Synthetic yearly price history"),
        (status = 400, description = "Invalid or too many points requested"),
        (status = 404, description = "Unknown ticker")
    ),
    tag = "Stocks"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponse>>, AppError> {
    let points = query.points.unwrap_or(DEFAULT_HISTORY_POINTS);
    if points > MAX_HISTORY_POINTS {
        return Err(AppError::BadRequest(format!(
            "points must be at most {}",
            MAX_HISTORY_POINTS
        )));
    }

    let record = state.dashboard.universe().get(&ticker)?;
    Ok(Json(ApiResponse::success(HistoryResponse {
        ticker: record.ticker.clone(),
        history: generate_history_now(record.price, points),
    })))
}

/// Select a stock; its analysis is fetched in the background
#[utoipa::path(
    post,
    path = "/api/stocks/{ticker}/select",
    params(("ticker" = String, Path, description = "Ticker, case-insensitive")),
    responses(
        (status = 200, description = "Selection with analysis pending"),
        (status = 404, description = "Unknown ticker")
    ),
    tag = "Stocks"
)]
pub async fn select_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<SelectionSnapshot>>, AppError> {
    let snapshot = state.dashboard.select_and_analyze(&ticker).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

#[utoipa::path(
    get,
    path = "/api/selection",
    responses((status = 200, description = "Selected stock, loading flag and analysis")),
    tag = "Stocks"
)]
pub async fn get_selection(State(state): State<AppState>) -> Json<ApiResponse<SelectionSnapshot>> {
    Json(ApiResponse::success(state.dashboard.selection().await))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/:ticker", get(get_stock))
        .route("/api/stocks/:ticker/history", get(get_history))
        .route("/api/stocks/:ticker/select", post(select_stock))
        .route("/api/selection", get(get_selection))
}
