pub mod config;
pub mod dashboard;
pub mod insight_routes;
pub mod request_id;
pub mod screener_routes;
pub mod stock_routes;

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use insight_client::{GeminiClient, InsightConfig, InsightProvider};
use screener_core::ScreenerError;
use screener_engine::Universe;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

pub use config::ServerConfig;
pub use dashboard::{DashboardController, RefreshOutcome};

// ---------------------------------------------------------------------------
// Shared state and response envelope
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardController>,
}

impl AppState {
    pub fn new(dashboard: DashboardController) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Uniform JSON envelope for every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                write!(f, "{}", msg)
            }
            AppError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl From<ScreenerError> for AppError {
    fn from(err: ScreenerError) -> Self {
        match err {
            ScreenerError::UnknownTicker(_) => AppError::NotFound(err.to_string()),
            ScreenerError::UnknownSortKey(_) | ScreenerError::UnknownRegion(_) => {
                AppError::BadRequest(err.to_string())
            }
            ScreenerError::Export(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

/// JSON body extractor that rejects with the API envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with the API envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

// ---------------------------------------------------------------------------
// OpenAPI
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QuantEdge Screener API",
        description = "Global equity screener with generative market insights"
    ),
    paths(
        screener_routes::get_universe,
        screener_routes::get_view,
        screener_routes::scan,
        screener_routes::put_filters,
        screener_routes::put_search,
        screener_routes::toggle_sort,
        screener_routes::clear_sort,
        screener_routes::export_csv,
        stock_routes::get_stock,
        stock_routes::get_history,
        stock_routes::select_stock,
        stock_routes::get_selection,
        insight_routes::get_insights,
        insight_routes::refresh_insights,
    ),
    components(schemas(
        screener_core::StockRecord,
        screener_core::PriorityStock,
        screener_core::NewsItem,
        screener_core::GroundingSource,
        screener_core::InstitutionalInsights,
        screener_core::StockAnalysis,
        screener_core::Valuation,
        screener_core::HistoryPoint,
        screener_core::FilterConfig,
        screener_core::RegionGroup,
        screener_core::SortKey,
        screener_core::SortDirection,
        screener_core::SortConfig,
        screener_core::ScreenRequest,
        screener_routes::UniverseResponse,
        screener_routes::ViewResponse,
        screener_routes::SearchRequest,
        stock_routes::StockDetail,
        stock_routes::HistoryResponse,
        dashboard::SelectionSnapshot,
        dashboard::InsightsSnapshot,
    )),
    tags(
        (name = "Screener", description = "Filtering, sorting, search and export"),
        (name = "Stocks", description = "Single-stock detail, history and selection"),
        (name = "Insights", description = "Institutional market commentary")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Router and server
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(screener_routes::screener_routes())
        .merge(stock_routes::stock_routes())
        .merge(insight_routes::insight_routes())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http());

    let router = if config.cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// Install the global subscriber; `RUST_LOG_FORMAT=json` switches to JSON lines
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let insight_config = InsightConfig::from_env();
    let client = GeminiClient::new(insight_config)?;
    if client.has_api_key() {
        tracing::info!("Insight service enabled (model {})", client.model());
    } else {
        tracing::warn!("GEMINI_API_KEY not set; insights and analyses will use fallbacks");
    }

    let provider: Arc<dyn InsightProvider> = Arc::new(client);
    let universe = Universe::sample();
    tracing::info!("Loaded universe of {} stocks", universe.len());

    let state = AppState::new(DashboardController::new(universe, provider));
    if config.refresh_on_start {
        state.dashboard.spawn_refresh();
    }

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Dashboard server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
