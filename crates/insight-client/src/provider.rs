use async_trait::async_trait;
use screener_core::{InstitutionalInsights, StockAnalysis, StockRecord};

use crate::error::InsightResult;
use crate::gemini::{GeminiClient, Generated};
use crate::prompts;

/// Backend-agnostic source of narrative market commentary.
///
/// Implemented by the HTTP client; tests substitute scripted providers.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Market summary, priority picks and news feed
    async fn institutional_insights(&self) -> InsightResult<InstitutionalInsights>;

    /// Narrative analysis of a single record
    async fn analyze_stock(&self, stock: &StockRecord) -> InsightResult<StockAnalysis>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn institutional_insights(&self) -> InsightResult<InstitutionalInsights> {
        let Generated { mut value, grounding } = self
            .generate_json::<InstitutionalInsights>(
                prompts::INSTITUTIONAL_PROMPT,
                prompts::institutional_schema(),
                true,
            )
            .await?;

        if value.grounding_sources.is_empty() {
            value.grounding_sources = grounding;
        }
        Ok(value)
    }

    async fn analyze_stock(&self, stock: &StockRecord) -> InsightResult<StockAnalysis> {
        let generated = self
            .generate_json::<StockAnalysis>(
                &prompts::analysis_prompt(stock),
                prompts::analysis_schema(),
                false,
            )
            .await?;
        Ok(generated.value)
    }

    fn backend_name(&self) -> &'static str {
        "gemini"
    }
}

/// Fetch insights, substituting the empty-state placeholder on any failure
pub async fn insights_or_fallback(provider: &dyn InsightProvider) -> InstitutionalInsights {
    match provider.institutional_insights().await {
        Ok(insights) => {
            tracing::info!(
                "Insights refreshed via {}: {} priority stocks, {} news items, {} sources",
                provider.backend_name(),
                insights.priority_stocks.len(),
                insights.news_feed.len(),
                insights.grounding_sources.len()
            );
            insights
        }
        Err(e) => {
            tracing::warn!("Insight sync unavailable, running in deterministic mode: {}", e);
            InstitutionalInsights::fallback()
        }
    }
}

/// Analyze `stock`, substituting the fixed placeholder analysis on failure
pub async fn analysis_or_fallback(
    provider: &dyn InsightProvider,
    stock: &StockRecord,
) -> StockAnalysis {
    match provider.analyze_stock(stock).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("Analysis for {} failed: {}", stock.ticker, e);
            StockAnalysis::fallback()
        }
    }
}
