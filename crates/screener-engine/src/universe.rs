use screener_core::{ScreenerError, ScreenerResult, StockRecord};

pub const SECTORS: &[&str] = &[
    "Technology",
    "Healthcare",
    "Financial Services",
    "Consumer Cyclical",
    "Industrials",
    "Energy",
    "Communication Services",
    "Utilities",
    "Basic Materials",
    "Consumer Defensive",
];

pub const COUNTRIES: &[&str] = &[
    "USA", "Canada", "UK", "Germany", "France", "Italy", "Japan", "Australia", "South Korea",
    "Switzerland", "Netherlands", "Sweden", "Denmark", "Norway", "Spain", "India", "Brazil",
    "Peru", "Chile", "Mexico",
];

/// Immutable, ticker-keyed record store
#[derive(Debug, Clone)]
pub struct Universe {
    records: Vec<StockRecord>,
}

impl Universe {
    pub fn new(records: Vec<StockRecord>) -> Self {
        Self { records }
    }

    /// Built-in sample set of global equities
    pub fn sample() -> Self {
        Self::new(sample_records())
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, ticker: &str) -> ScreenerResult<&StockRecord> {
        self.records
            .iter()
            .find(|r| r.ticker.eq_ignore_ascii_case(ticker))
            .ok_or_else(|| ScreenerError::UnknownTicker(ticker.to_string()))
    }
}

#[allow(clippy::too_many_arguments)]
fn stock(
    ticker: &str,
    name: &str,
    country: &str,
    sector: &str,
    price: f64,
    market_cap: f64,
    pe_ratio: f64,
    pb_ratio: f64,
    roe: f64,
    dividend_yield: f64,
    debt_to_equity: f64,
    revenue_growth_3yr: f64,
    roic: f64,
    fcf_yield: f64,
) -> StockRecord {
    StockRecord {
        ticker: ticker.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        sector: sector.to_string(),
        price,
        market_cap,
        pe_ratio,
        pb_ratio,
        roe,
        dividend_yield,
        debt_to_equity,
        revenue_growth_3yr,
        roic,
        fcf_yield,
    }
}

fn sample_records() -> Vec<StockRecord> {
    vec![
        // G7: USA
        stock("AAPL", "Apple Inc.", "USA", "Technology", 235.45, 3500.0, 32.1, 48.2, 154.3, 0.45, 1.4, 8.5, 55.2, 3.2),
        stock("MSFT", "Microsoft Corp.", "USA", "Technology", 420.21, 3100.0, 35.4, 12.8, 38.5, 0.72, 0.2, 14.2, 32.1, 2.8),
        stock("NVDA", "NVIDIA Corp.", "USA", "Technology", 132.89, 3200.0, 72.5, 58.1, 115.6, 0.03, 0.1, 95.2, 82.4, 4.1),
        // G7: rest
        stock("AZN.L", "AstraZeneca", "UK", "Healthcare", 122.50, 190.0, 34.1, 4.5, 16.2, 2.1, 0.7, 15.2, 13.5, 3.8),
        stock("SAP", "SAP SE", "Germany", "Technology", 215.30, 250.0, 38.2, 5.4, 14.5, 1.2, 0.3, 9.1, 12.8, 5.2),
        stock("MC.PA", "LVMH", "France", "Consumer Cyclical", 685.12, 345.0, 22.8, 6.1, 24.2, 1.8, 0.5, 12.5, 18.2, 4.5),
        stock("RACE", "Ferrari N.V.", "Italy", "Consumer Cyclical", 430.20, 82.0, 52.4, 14.2, 42.1, 0.6, 0.8, 16.8, 22.5, 3.1),
        stock("7203.T", "Toyota Motor", "Japan", "Consumer Cyclical", 18.40, 280.0, 9.8, 1.1, 13.5, 2.8, 1.1, 15.4, 8.2, 6.5),
        stock("RY", "Royal Bank of Canada", "Canada", "Financial Services", 165.20, 235.0, 13.8, 1.8, 15.4, 3.4, 0.9, 6.2, 11.5, 8.2),
        // Other OECD
        stock("NOVO-B.CO", "Novo Nordisk", "Denmark", "Healthcare", 740.20, 560.0, 44.5, 32.4, 88.2, 1.1, 0.2, 28.5, 52.1, 2.4),
        stock("ASML", "ASML Holding", "Netherlands", "Technology", 780.45, 310.0, 42.1, 22.4, 52.8, 0.85, 0.4, 18.2, 35.6, 2.5),
        stock("NESN.SW", "Nestlé S.A.", "Switzerland", "Consumer Defensive", 82.40, 220.0, 18.5, 5.8, 19.4, 3.5, 1.2, 4.2, 14.1, 5.5),
        stock("BHP.AX", "BHP Group", "Australia", "Basic Materials", 44.20, 145.0, 12.1, 3.2, 28.5, 5.8, 0.4, 8.2, 19.4, 9.5),
        stock("ITX.MC", "Inditex", "Spain", "Consumer Cyclical", 48.50, 152.0, 22.4, 6.8, 31.2, 2.6, 0.1, 14.2, 28.1, 5.4),
        stock("ATCO-A.ST", "Atlas Copco", "Sweden", "Industrials", 182.40, 85.0, 28.5, 9.4, 32.8, 1.5, 0.3, 12.5, 24.8, 4.8),
        // Emerging
        stock("RELIANCE.NS", "Reliance Industries", "India", "Energy", 2985.40, 210.0, 28.4, 2.5, 9.4, 0.35, 0.4, 12.1, 10.5, 2.1),
        stock("HDB", "HDFC Bank", "India", "Financial Services", 68.20, 155.0, 18.4, 2.8, 17.2, 1.1, 0.1, 18.4, 14.2, 0.0),
        stock("VALE", "Vale S.A.", "Brazil", "Basic Materials", 12.45, 55.0, 5.8, 1.2, 22.4, 8.4, 0.6, -2.5, 18.2, 12.5),
        stock("PBR", "Petrobras", "Brazil", "Energy", 14.80, 98.0, 4.2, 1.1, 28.4, 12.5, 0.8, 10.2, 15.4, 18.2),
        stock("AMX", "América Móvil", "Mexico", "Communication Services", 15.40, 48.0, 12.4, 1.9, 14.8, 3.2, 1.1, 4.5, 9.8, 7.2),
        stock("WALMEX.MX", "Walmart de México", "Mexico", "Consumer Defensive", 68.40, 58.0, 24.1, 5.2, 22.4, 2.8, 0.1, 9.2, 18.5, 5.1),
        stock("SQM", "Sociedad Química y Minera", "Chile", "Basic Materials", 38.20, 11.0, 9.2, 1.8, 45.1, 5.2, 0.5, 42.1, 28.4, 9.1),
        stock("BAP", "Credicorp Ltd.", "Peru", "Financial Services", 155.30, 12.0, 10.1, 1.4, 15.2, 4.1, 0.0, 8.4, 12.1, 4.5),
    ]
}
