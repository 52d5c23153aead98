use serde::{Deserialize, Serialize};

/// Canned market summary shown while no insight data is available
pub const FALLBACK_MARKET_SUMMARY: &str = "Synchronizing cross-border feeds from Bloomberg, Reuters, FT and Biztoc. Correlating Polymarket predictions with structural macro shifts...";

/// Fundamental snapshot of a single listed equity.
///
/// Field names serialize in camelCase so the same shape can be handed to
/// (and read back from) the insight service schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct StockRecord {
    pub ticker: String,
    pub name: String,
    pub country: String,
    pub sector: String,
    pub price: f64,
    /// Billions, reporting currency
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    /// Percent
    pub roe: f64,
    /// Percent
    pub dividend_yield: f64,
    pub debt_to_equity: f64,
    /// Percent, 3-year
    #[serde(rename = "revenueGrowth3Yr")]
    pub revenue_growth_3yr: f64,
    /// Percent
    pub roic: f64,
    /// Percent
    pub fcf_yield: f64,
}

impl StockRecord {
    /// Yahoo Finance quote page for this ticker
    pub fn yahoo_url(&self) -> String {
        yahoo_quote_url(&self.ticker)
    }
}

pub fn yahoo_quote_url(ticker: &str) -> String {
    format!("https://finance.yahoo.com/quote/{}", ticker)
}

/// A stock promoted by the insight service, with attribution and a thesis.
///
/// The service only guarantees ticker, name and country; the remaining
/// metric fields default to zero when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PriorityStock {
    #[serde(flatten)]
    pub record: StockRecord,
    #[serde(default)]
    pub recommended_by: Vec<String>,
    #[serde(default)]
    pub thesis_snippet: String,
}

/// News headline surfaced alongside the market summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsItem {
    pub headline: String,
    pub source: String,
    pub url: String,
    /// Free-form timestamp label ("2h ago", "Today 09:30", ...)
    pub time: String,
    #[serde(default)]
    pub summary: String,
}

/// Valuation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Valuation {
    Under,
    Fair,
    Over,
}

impl Valuation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Valuation::Under => "Under",
            Valuation::Fair => "Fair",
            Valuation::Over => "Over",
        }
    }
}

/// Narrative analysis of one stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub summary: String,
    pub valuation: Valuation,
    /// Intended range 1-10, not enforced
    pub risk_score: f64,
    pub investment_thesis: Vec<String>,
    pub risks: Vec<String>,
}

impl StockAnalysis {
    /// Placeholder used when the analysis request fails
    pub fn fallback() -> Self {
        Self {
            summary: "Data sync error. Check local connection.".to_string(),
            valuation: Valuation::Fair,
            risk_score: 5.0,
            investment_thesis: vec!["Reliable historical floor".to_string()],
            risks: vec!["Connectivity issues".to_string()],
        }
    }
}

/// Source citation attached to a grounded response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GroundingSource {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Market-wide commentary: summary, priority picks, news feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalInsights {
    pub market_summary: String,
    #[serde(default)]
    pub priority_stocks: Vec<PriorityStock>,
    #[serde(default)]
    pub news_feed: Vec<NewsItem>,
    #[serde(default)]
    pub grounding_sources: Vec<GroundingSource>,
}

impl InstitutionalInsights {
    /// Empty-state insights used before the first fetch and after a failure
    pub fn fallback() -> Self {
        Self {
            market_summary: FALLBACK_MARKET_SUMMARY.to_string(),
            priority_stocks: Vec::new(),
            news_feed: Vec::new(),
            grounding_sources: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.priority_stocks.is_empty() && self.news_feed.is_empty()
    }
}

/// One point of a yearly price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryPoint {
    pub year: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_stock_parses_partial_record() {
        let json = r#"{
            "ticker": "VALE",
            "name": "Vale S.A.",
            "country": "Brazil",
            "recommendedBy": ["Lyn Alden", "Michael Burry"],
            "thesisSnippet": "Iron ore cycle bottoming"
        }"#;

        let stock: PriorityStock = serde_json::from_str(json).unwrap();
        assert_eq!(stock.record.ticker, "VALE");
        assert_eq!(stock.record.country, "Brazil");
        assert_eq!(stock.record.market_cap, 0.0);
        assert_eq!(stock.recommended_by.len(), 2);
        assert_eq!(stock.thesis_snippet, "Iron ore cycle bottoming");
    }

    #[test]
    fn test_analysis_rejects_unknown_valuation() {
        let json = r#"{
            "summary": "x",
            "valuation": "Cheap",
            "riskScore": 3,
            "investmentThesis": [],
            "risks": []
        }"#;
        assert!(serde_json::from_str::<StockAnalysis>(json).is_err());
    }

    #[test]
    fn test_record_uses_camel_case() {
        let record = StockRecord {
            ticker: "SAP".to_string(),
            revenue_growth_3yr: 9.1,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["revenueGrowth3Yr"], 9.1);
        assert!(value.get("marketCap").is_some());
    }

    #[test]
    fn test_fallbacks_are_deterministic() {
        assert_eq!(StockAnalysis::fallback(), StockAnalysis::fallback());
        let insights = InstitutionalInsights::fallback();
        assert!(insights.is_empty());
        assert_eq!(insights.market_summary, FALLBACK_MARKET_SUMMARY);
    }

    #[test]
    fn test_yahoo_url() {
        assert_eq!(
            yahoo_quote_url("NOVO-B.CO"),
            "https://finance.yahoo.com/quote/NOVO-B.CO"
        );
    }
}
