//! Screening criteria: region groups, filter thresholds and sort order.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{ScreenerError, StockRecord};

/// Default G7 membership, by country name as it appears on records
pub const G7_COUNTRIES: &[&str] = &["USA", "Canada", "UK", "Germany", "France", "Italy", "Japan"];

/// Default emerging-market membership, by country name
pub const EMERGING_COUNTRIES: &[&str] = &["India", "Brazil", "Peru", "Chile", "Mexico"];

/// Wildcard sector label
pub const ALL_SECTORS: &str = "All";

/// Coarse macroeconomic bucket used to filter records by country
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionGroup {
    #[default]
    All,
    G7,
    /// OECD members outside the emerging set
    Oecd,
    Emerging,
}

impl FromStr for RegionGroup {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(RegionGroup::All),
            "G7" => Ok(RegionGroup::G7),
            "OECD" => Ok(RegionGroup::Oecd),
            "EMERGING" | "EM" => Ok(RegionGroup::Emerging),
            other => Err(ScreenerError::UnknownRegion(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RegionGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Country-name membership lists backing the region groups.
///
/// OECD has no list of its own: it is the complement of the emerging set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    pub g7: Vec<String>,
    pub emerging: Vec<String>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self {
            g7: G7_COUNTRIES.iter().map(|s| s.to_string()).collect(),
            emerging: EMERGING_COUNTRIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RegionTable {
    pub fn is_g7(&self, country: &str) -> bool {
        self.g7.iter().any(|c| c == country)
    }

    pub fn is_emerging(&self, country: &str) -> bool {
        self.emerging.iter().any(|c| c == country)
    }

    /// Whether `country` belongs to `group`
    pub fn contains(&self, group: RegionGroup, country: &str) -> bool {
        match group {
            RegionGroup::All => true,
            RegionGroup::G7 => self.is_g7(country),
            RegionGroup::Emerging => self.is_emerging(country),
            RegionGroup::Oecd => !self.is_emerging(country),
        }
    }
}

/// Sector predicate: wildcard or exact sector name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectorFilter {
    #[default]
    All,
    Exact(String),
}

impl SectorFilter {
    pub fn matches(&self, sector: &str) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Exact(name) => name == sector,
        }
    }
}

impl From<String> for SectorFilter {
    fn from(value: String) -> Self {
        if value.is_empty() || value == ALL_SECTORS {
            SectorFilter::All
        } else {
            SectorFilter::Exact(value)
        }
    }
}

impl From<SectorFilter> for String {
    fn from(value: SectorFilter) -> Self {
        match value {
            SectorFilter::All => ALL_SECTORS.to_string(),
            SectorFilter::Exact(name) => name,
        }
    }
}

/// Threshold filters applied to every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(alias = "countryGroup")]
    pub region: RegionGroup,
    /// Billions
    pub min_market_cap: f64,
    #[serde(alias = "maxPE")]
    pub max_pe: f64,
    #[serde(alias = "minROE")]
    pub min_roe: f64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "All"))]
    pub sector: SectorFilter,
    /// Admit negative P/E records regardless of `max_pe`
    pub allow_negative_pe: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            region: RegionGroup::All,
            min_market_cap: 0.0,
            max_pe: 500.0,
            min_roe: -100.0,
            sector: SectorFilter::All,
            allow_negative_pe: true,
        }
    }
}

/// Record field a view can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Ticker,
    Name,
    Country,
    Sector,
    Price,
    MarketCap,
    PeRatio,
    PbRatio,
    Roe,
    DividendYield,
    DebtToEquity,
    #[serde(rename = "revenueGrowth3Yr")]
    RevenueGrowth3Yr,
    Roic,
    FcfYield,
}

impl SortKey {
    pub const ALL: [SortKey; 14] = [
        SortKey::Ticker,
        SortKey::Name,
        SortKey::Country,
        SortKey::Sector,
        SortKey::Price,
        SortKey::MarketCap,
        SortKey::PeRatio,
        SortKey::PbRatio,
        SortKey::Roe,
        SortKey::DividendYield,
        SortKey::DebtToEquity,
        SortKey::RevenueGrowth3Yr,
        SortKey::Roic,
        SortKey::FcfYield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Ticker => "ticker",
            SortKey::Name => "name",
            SortKey::Country => "country",
            SortKey::Sector => "sector",
            SortKey::Price => "price",
            SortKey::MarketCap => "marketCap",
            SortKey::PeRatio => "peRatio",
            SortKey::PbRatio => "pbRatio",
            SortKey::Roe => "roe",
            SortKey::DividendYield => "dividendYield",
            SortKey::DebtToEquity => "debtToEquity",
            SortKey::RevenueGrowth3Yr => "revenueGrowth3Yr",
            SortKey::Roic => "roic",
            SortKey::FcfYield => "fcfYield",
        }
    }

    /// Compare two records on this key. Text keys compare bytewise,
    /// numeric keys by IEEE total order.
    pub fn compare(&self, a: &StockRecord, b: &StockRecord) -> Ordering {
        match self {
            SortKey::Ticker => a.ticker.cmp(&b.ticker),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Country => a.country.cmp(&b.country),
            SortKey::Sector => a.sector.cmp(&b.sector),
            numeric => {
                let (x, y) = (numeric.numeric_value(a), numeric.numeric_value(b));
                x.total_cmp(&y)
            }
        }
    }

    fn numeric_value(&self, r: &StockRecord) -> f64 {
        match self {
            SortKey::Price => r.price,
            SortKey::MarketCap => r.market_cap,
            SortKey::PeRatio => r.pe_ratio,
            SortKey::PbRatio => r.pb_ratio,
            SortKey::Roe => r.roe,
            SortKey::DividendYield => r.dividend_yield,
            SortKey::DebtToEquity => r.debt_to_equity,
            SortKey::RevenueGrowth3Yr => r.revenue_growth_3yr,
            SortKey::Roic => r.roic,
            SortKey::FcfYield => r.fcf_yield,
            SortKey::Ticker | SortKey::Name | SortKey::Country | SortKey::Sector => 0.0,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ScreenerError;

    /// Accepts the camelCase wire name or its snake_case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ScreenerError::UnknownSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single-key sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// Next sort after the user requests `key`: the active key flips from
    /// ascending to descending, anything else starts ascending.
    pub fn toggle(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        match current {
            Some(active) if active.key == key && active.direction == SortDirection::Ascending => {
                SortConfig::descending(key)
            }
            _ => SortConfig::ascending(key),
        }
    }

    pub fn compare(&self, a: &StockRecord, b: &StockRecord) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig::descending(SortKey::MarketCap)
    }
}

/// Everything that determines a screener view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScreenRequest {
    #[serde(default)]
    pub filters: FilterConfig,
    /// `None` leaves records in store order
    #[serde(default = "default_sort")]
    pub sort: Option<SortConfig>,
    #[serde(default)]
    pub search: String,
}

fn default_sort() -> Option<SortConfig> {
    Some(SortConfig::default())
}

impl Default for ScreenRequest {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            sort: default_sort(),
            search: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_table_membership() {
        let table = RegionTable::default();

        assert!(table.contains(RegionGroup::G7, "Japan"));
        assert!(!table.contains(RegionGroup::Emerging, "Japan"));
        assert!(table.contains(RegionGroup::Oecd, "Japan"));

        assert!(table.contains(RegionGroup::Emerging, "Chile"));
        assert!(!table.contains(RegionGroup::G7, "Chile"));
        assert!(!table.contains(RegionGroup::Oecd, "Chile"));

        // Neither list: only ALL and the OECD complement admit it
        assert!(table.contains(RegionGroup::All, "Denmark"));
        assert!(table.contains(RegionGroup::Oecd, "Denmark"));
        assert!(!table.contains(RegionGroup::G7, "Denmark"));
        assert!(!table.contains(RegionGroup::Emerging, "Denmark"));
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("g7".parse::<RegionGroup>().unwrap(), RegionGroup::G7);
        assert_eq!("EM".parse::<RegionGroup>().unwrap(), RegionGroup::Emerging);
        assert!("APAC".parse::<RegionGroup>().is_err());
    }

    #[test]
    fn test_region_deserializes_through_parser() {
        let em: RegionGroup = serde_json::from_str("\"em\"").unwrap();
        assert_eq!(em, RegionGroup::Emerging);
        assert_eq!(serde_json::to_string(&RegionGroup::Oecd).unwrap(), "\"OECD\"");

        let err = serde_json::from_str::<RegionGroup>("\"APAC\"").unwrap_err();
        assert!(err.to_string().contains("Unknown region group: APAC"));
    }

    #[test]
    fn test_filter_config_accepts_dashboard_field_names() {
        let filters: FilterConfig = serde_json::from_str(
            r#"{"countryGroup":"G7","minMarketCap":100,"maxPE":25,"minROE":15,"sector":"Technology"}"#,
        )
        .unwrap();

        assert_eq!(filters.region, RegionGroup::G7);
        assert_eq!(filters.min_market_cap, 100.0);
        assert_eq!(filters.max_pe, 25.0);
        assert_eq!(filters.min_roe, 15.0);
        assert!(filters.sector.matches("Technology"));
        assert!(filters.allow_negative_pe);

        let camel: FilterConfig =
            serde_json::from_str(r#"{"region":"OECD","maxPe":40,"minRoe":0}"#).unwrap();
        assert_eq!(camel.region, RegionGroup::Oecd);
        assert_eq!(camel.max_pe, 40.0);
        assert_eq!(camel.min_roe, 0.0);
    }

    #[test]
    fn test_sector_filter_serde() {
        let all: SectorFilter = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(all, SectorFilter::All);

        let energy: SectorFilter = serde_json::from_str("\"Energy\"").unwrap();
        assert!(energy.matches("Energy"));
        assert!(!energy.matches("Utilities"));
        assert_eq!(serde_json::to_string(&energy).unwrap(), "\"Energy\"");
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("marketCap".parse::<SortKey>().unwrap(), SortKey::MarketCap);
        assert_eq!("market_cap".parse::<SortKey>().unwrap(), SortKey::MarketCap);
        assert_eq!(
            "revenue_growth_3yr".parse::<SortKey>().unwrap(),
            SortKey::RevenueGrowth3Yr
        );
        assert!("cashOnHand".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_toggle() {
        let first = SortConfig::toggle(None, SortKey::Roe);
        assert_eq!(first, SortConfig::ascending(SortKey::Roe));

        let second = SortConfig::toggle(Some(first), SortKey::Roe);
        assert_eq!(second, SortConfig::descending(SortKey::Roe));

        // Descending flips back to ascending
        let third = SortConfig::toggle(Some(second), SortKey::Roe);
        assert_eq!(third, SortConfig::ascending(SortKey::Roe));

        // Switching keys always starts ascending
        let other = SortConfig::toggle(Some(second), SortKey::Price);
        assert_eq!(other, SortConfig::ascending(SortKey::Price));
    }

    #[test]
    fn test_screen_request_defaults() {
        let req: ScreenRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.sort, Some(SortConfig::descending(SortKey::MarketCap)));
        assert_eq!(req.filters, FilterConfig::default());

        let unsorted: ScreenRequest = serde_json::from_str(r#"{"sort": null}"#).unwrap();
        assert_eq!(unsorted.sort, None);
    }
}
