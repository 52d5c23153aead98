//! Dashboard controller
//!
//! Single owner of the mutable dashboard state: screener settings, the
//! selected stock with its analysis, and the institutional insight feed.
//! Every selection bumps a generation counter; an analysis result is only
//! committed if its generation is still current, so a slow response for a
//! previously selected stock can never overwrite the current one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use insight_client::{analysis_or_fallback, insights_or_fallback, InsightProvider};
use screener_core::{
    FilterConfig, InstitutionalInsights, ScreenRequest, ScreenerResult, SortConfig, SortKey,
    StockAnalysis, StockRecord,
};
use screener_engine::{CsvExporter, ScreenView, StockScreener, Universe};
use serde::Serialize;
use tokio::sync::RwLock;

/// Handle for one analysis request, tied to the selection that issued it
#[derive(Debug, Clone)]
pub struct SelectionTicket {
    pub generation: u64,
    pub record: StockRecord,
}

#[derive(Debug, Default)]
struct SelectionState {
    generation: u64,
    selected: Option<StockRecord>,
    analysis: Option<StockAnalysis>,
    loading: bool,
}

/// Point-in-time view of the selection panel
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SelectionSnapshot {
    pub generation: u64,
    pub selected: Option<StockRecord>,
    pub loading: bool,
    pub analysis: Option<StockAnalysis>,
}

/// Point-in-time view of the insight feed
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct InsightsSnapshot {
    pub refreshing: bool,
    pub insights: InstitutionalInsights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    Accepted,
    AlreadyRunning,
}

/// Holds the busy flag for the duration of one refresh; released on drop
pub struct RefreshGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct DashboardController {
    universe: Universe,
    screener: StockScreener,
    exporter: CsvExporter,
    provider: Arc<dyn InsightProvider>,
    view: RwLock<ScreenRequest>,
    selection: RwLock<SelectionState>,
    insights: RwLock<InstitutionalInsights>,
    refreshing: Arc<AtomicBool>,
}

impl DashboardController {
    pub fn new(universe: Universe, provider: Arc<dyn InsightProvider>) -> Self {
        Self::with_screener(universe, StockScreener::new(), provider)
    }

    pub fn with_screener(
        universe: Universe,
        screener: StockScreener,
        provider: Arc<dyn InsightProvider>,
    ) -> Self {
        Self {
            universe,
            screener,
            exporter: CsvExporter::new(),
            provider,
            view: RwLock::new(ScreenRequest::default()),
            selection: RwLock::new(SelectionState::default()),
            insights: RwLock::new(InstitutionalInsights::fallback()),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn screener(&self) -> &StockScreener {
        &self.screener
    }

    // -- Screener ------------------------------------------------------------

    pub async fn view_request(&self) -> ScreenRequest {
        self.view.read().await.clone()
    }

    /// Screen the universe with the stored settings
    pub async fn current_view(&self) -> ScreenView {
        let request = self.view_request().await;
        self.screener.screen(self.universe.records(), &request)
    }

    pub async fn set_filters(&self, filters: FilterConfig) {
        tracing::debug!("Filters updated: {:?}", filters);
        self.view.write().await.filters = filters;
    }

    pub async fn set_search(&self, search: String) {
        self.view.write().await.search = search;
    }

    /// Apply a user sort request on `key`, returning the new sort
    pub async fn toggle_sort(&self, key: SortKey) -> SortConfig {
        let mut view = self.view.write().await;
        let next = SortConfig::toggle(view.sort, key);
        view.sort = Some(next);
        next
    }

    pub async fn clear_sort(&self) {
        self.view.write().await.sort = None;
    }

    /// CSV text of the current view
    pub async fn export_csv(&self) -> ScreenerResult<String> {
        let view = self.current_view().await;
        self.exporter.to_csv(&view.records)
    }

    // -- Selection -----------------------------------------------------------

    /// Make `ticker` the selected stock, discarding any displayed or pending
    /// analysis for the previous selection.
    pub async fn select(&self, ticker: &str) -> ScreenerResult<SelectionTicket> {
        let record = self.universe.get(ticker)?.clone();

        let mut selection = self.selection.write().await;
        selection.generation += 1;
        selection.selected = Some(record.clone());
        selection.analysis = None;
        selection.loading = true;

        tracing::info!(
            "Selected {} (generation {})",
            record.ticker,
            selection.generation
        );

        Ok(SelectionTicket {
            generation: selection.generation,
            record,
        })
    }

    /// Fetch the analysis for `ticket` and commit it if the selection has
    /// not moved on. Returns whether the result was committed.
    pub async fn run_analysis(&self, ticket: SelectionTicket) -> bool {
        let analysis = analysis_or_fallback(self.provider.as_ref(), &ticket.record).await;

        let mut selection = self.selection.write().await;
        if selection.generation != ticket.generation {
            tracing::debug!(
                "Discarding stale analysis for {} (generation {}, current {})",
                ticket.record.ticker,
                ticket.generation,
                selection.generation
            );
            return false;
        }

        selection.analysis = Some(analysis);
        selection.loading = false;
        true
    }

    /// Select `ticker` and fetch its analysis in the background
    pub async fn select_and_analyze(
        self: &Arc<Self>,
        ticker: &str,
    ) -> ScreenerResult<SelectionSnapshot> {
        let ticket = self.select(ticker).await?;
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            controller.run_analysis(ticket).await;
        });
        Ok(self.selection().await)
    }

    pub async fn selection(&self) -> SelectionSnapshot {
        let selection = self.selection.read().await;
        SelectionSnapshot {
            generation: selection.generation,
            selected: selection.selected.clone(),
            loading: selection.loading,
            analysis: selection.analysis.clone(),
        }
    }

    // -- Insights ------------------------------------------------------------

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Claim the refresh slot; `None` if a refresh is already outstanding
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard {
                flag: Arc::clone(&self.refreshing),
            })
    }

    /// Fetch and store insights while holding `guard`
    pub async fn run_refresh(&self, guard: RefreshGuard) {
        let insights = insights_or_fallback(self.provider.as_ref()).await;
        *self.insights.write().await = insights;
        drop(guard);
    }

    pub async fn refresh_insights(&self) -> RefreshOutcome {
        match self.try_begin_refresh() {
            Some(guard) => {
                self.run_refresh(guard).await;
                RefreshOutcome::Accepted
            }
            None => RefreshOutcome::AlreadyRunning,
        }
    }

    /// Start a background refresh unless one is already running
    pub fn spawn_refresh(self: &Arc<Self>) -> RefreshOutcome {
        match self.try_begin_refresh() {
            Some(guard) => {
                let controller = Arc::clone(self);
                tokio::spawn(async move {
                    controller.run_refresh(guard).await;
                });
                RefreshOutcome::Accepted
            }
            None => RefreshOutcome::AlreadyRunning,
        }
    }

    pub async fn insights(&self) -> InsightsSnapshot {
        InsightsSnapshot {
            refreshing: self.is_refreshing(),
            insights: self.insights.read().await.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_client::{InsightError, InsightResult};
    use screener_core::{RegionGroup, Valuation};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Provider whose responses are released per ticker by the test
    #[derive(Default)]
    struct GatedProvider {
        analysis_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
        insight_gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl GatedProvider {
        fn gate_analysis(&self, ticker: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.analysis_gates
                .lock()
                .unwrap()
                .insert(ticker.to_string(), rx);
            tx
        }

        fn gate_insights(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.insight_gate.lock().unwrap() = Some(rx);
            tx
        }
    }

    #[async_trait]
    impl InsightProvider for GatedProvider {
        async fn institutional_insights(&self) -> InsightResult<InstitutionalInsights> {
            let gate = self.insight_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(InstitutionalInsights {
                market_summary: "Dollar weakness favours EM".into(),
                ..Default::default()
            })
        }

        async fn analyze_stock(&self, stock: &StockRecord) -> InsightResult<StockAnalysis> {
            let gate = self.analysis_gates.lock().unwrap().remove(&stock.ticker);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(StockAnalysis {
                summary: format!("Analysis of {}", stock.ticker),
                valuation: Valuation::Fair,
                risk_score: 4.0,
                investment_thesis: vec![],
                risks: vec![],
            })
        }

        fn backend_name(&self) -> &'static str {
            "gated"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl InsightProvider for FailingProvider {
        async fn institutional_insights(&self) -> InsightResult<InstitutionalInsights> {
            Err(InsightError::MissingApiKey)
        }

        async fn analyze_stock(&self, _stock: &StockRecord) -> InsightResult<StockAnalysis> {
            Err(InsightError::MissingApiKey)
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    fn controller(provider: Arc<dyn InsightProvider>) -> Arc<DashboardController> {
        Arc::new(DashboardController::new(Universe::sample(), provider))
    }

    #[tokio::test]
    async fn test_out_of_order_analysis_is_discarded() {
        let provider = Arc::new(GatedProvider::default());
        let release_first = provider.gate_analysis("AAPL");
        let release_second = provider.gate_analysis("VALE");
        let ctrl = controller(provider.clone());

        let first = ctrl.select("AAPL").await.unwrap();
        let first_task = tokio::spawn({
            let ctrl = Arc::clone(&ctrl);
            async move { ctrl.run_analysis(first).await }
        });

        let second = ctrl.select("VALE").await.unwrap();
        let second_task = tokio::spawn({
            let ctrl = Arc::clone(&ctrl);
            async move { ctrl.run_analysis(second).await }
        });

        // Pending: new selection shows no analysis yet
        let pending = ctrl.selection().await;
        assert!(pending.loading);
        assert!(pending.analysis.is_none());
        assert_eq!(pending.selected.as_ref().unwrap().ticker, "VALE");

        // Second resolves first, then the stale first response arrives
        release_second.send(()).unwrap();
        assert!(second_task.await.unwrap());
        release_first.send(()).unwrap();
        assert!(!first_task.await.unwrap());

        let snapshot = ctrl.selection().await;
        assert_eq!(snapshot.selected.unwrap().ticker, "VALE");
        assert_eq!(snapshot.analysis.unwrap().summary, "Analysis of VALE");
        assert!(!snapshot.loading);
        assert_eq!(snapshot.generation, 2);
    }

    #[tokio::test]
    async fn test_failed_analysis_shows_fallback() {
        let ctrl = controller(Arc::new(FailingProvider));

        let ticket = ctrl.select("sap").await.unwrap();
        assert_eq!(ticket.record.ticker, "SAP");
        assert!(ctrl.run_analysis(ticket).await);

        let snapshot = ctrl.selection().await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.analysis, Some(StockAnalysis::fallback()));
    }

    #[tokio::test]
    async fn test_select_unknown_ticker_keeps_state() {
        let ctrl = controller(Arc::new(FailingProvider));
        assert!(ctrl.select("ZZZZ").await.is_err());

        let snapshot = ctrl.selection().await;
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.selected.is_none());
    }

    #[tokio::test]
    async fn test_refresh_is_not_reentrant() {
        let provider = Arc::new(GatedProvider::default());
        let release = provider.gate_insights();
        let ctrl = controller(provider.clone());

        let guard = ctrl.try_begin_refresh().unwrap();
        assert!(ctrl.is_refreshing());
        assert_eq!(ctrl.refresh_insights().await, RefreshOutcome::AlreadyRunning);
        assert_eq!(ctrl.spawn_refresh(), RefreshOutcome::AlreadyRunning);

        let task = tokio::spawn({
            let ctrl = Arc::clone(&ctrl);
            async move { ctrl.run_refresh(guard).await }
        });
        release.send(()).unwrap();
        task.await.unwrap();

        let snapshot = ctrl.insights().await;
        assert!(!snapshot.refreshing);
        assert_eq!(snapshot.insights.market_summary, "Dollar weakness favours EM");
    }

    #[tokio::test]
    async fn test_failed_refresh_shows_fallback_and_clears_flag() {
        let ctrl = controller(Arc::new(FailingProvider));
        assert_eq!(ctrl.refresh_insights().await, RefreshOutcome::Accepted);

        let snapshot = ctrl.insights().await;
        assert!(!snapshot.refreshing);
        assert_eq!(snapshot.insights, InstitutionalInsights::fallback());
    }

    #[tokio::test]
    async fn test_sort_toggle_and_filters_drive_view() {
        let ctrl = controller(Arc::new(FailingProvider));

        ctrl.set_filters(FilterConfig {
            region: RegionGroup::Emerging,
            ..Default::default()
        })
        .await;
        assert_eq!(ctrl.toggle_sort(SortKey::Price).await, SortConfig::ascending(SortKey::Price));

        let view = ctrl.current_view().await;
        assert_eq!(view.records.len(), 8);
        assert_eq!(view.records[0].ticker, "VALE");

        assert_eq!(ctrl.toggle_sort(SortKey::Price).await, SortConfig::descending(SortKey::Price));
        let view = ctrl.current_view().await;
        assert_eq!(view.records[0].ticker, "RELIANCE.NS");

        ctrl.set_search("walmart".into()).await;
        let csv = ctrl.export_csv().await.unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().starts_with("WALMEX.MX,"));
    }
}
