use screener_core::{FilterConfig, RegionTable, ScreenRequest, StockRecord};
use serde::{Deserialize, Serialize};

/// Ordered subset of the universe produced by one screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenView {
    pub records: Vec<StockRecord>,
    pub total_universe: usize,
    pub total_matched: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Pure filter/sort engine over a record slice
#[derive(Debug, Clone, Default)]
pub struct StockScreener {
    regions: RegionTable,
}

impl StockScreener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom region membership table
    pub fn with_regions(regions: RegionTable) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Filter and order `records`. Never fails: an empty view is valid.
    ///
    /// Sorting is stable, so records with equal keys keep store order.
    pub fn screen(&self, records: &[StockRecord], request: &ScreenRequest) -> ScreenView {
        let query = request.search.to_lowercase();

        let mut matched: Vec<StockRecord> = records
            .iter()
            .filter(|r| matches_query(r, &query) && self.passes_filters(r, &request.filters))
            .cloned()
            .collect();

        if let Some(sort) = request.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        tracing::debug!(
            "Screen complete: {}/{} records matched (sort: {:?}, query: {:?})",
            matched.len(),
            records.len(),
            request.sort,
            query
        );

        ScreenView {
            total_universe: records.len(),
            total_matched: matched.len(),
            records: matched,
            timestamp: chrono::Utc::now(),
        }
    }

    /// All threshold, sector and region predicates, conjunctively
    pub fn passes_filters(&self, record: &StockRecord, filters: &FilterConfig) -> bool {
        let pe_ok = record.pe_ratio <= filters.max_pe
            || (filters.allow_negative_pe && record.pe_ratio < 0.0);

        filters.sector.matches(&record.sector)
            && pe_ok
            && record.roe >= filters.min_roe
            && record.market_cap >= filters.min_market_cap
            && self.regions.contains(filters.region, &record.country)
    }
}

/// Case-insensitive substring match on name or ticker. `query` must already
/// be lowercased; empty matches everything.
fn matches_query(record: &StockRecord, query: &str) -> bool {
    query.is_empty()
        || record.name.to_lowercase().contains(query)
        || record.ticker.to_lowercase().contains(query)
}
