//! Prompt text and response schemas for the two insight requests.

use screener_core::StockRecord;
use serde_json::{json, Value};

pub const INSTITUTIONAL_PROMPT: &str = r#"Perform a high-precision global equity scan. Identify the top 5 'Mission Critical' priority stocks in G7, OECD, and Emerging Markets (India, Brazil, Mexico, Chile, Peru).

CRITICAL: You MUST evaluate these based on the overlapping high-conviction strategies of:
- Lyn Alden (Macro structure/Commodity cycles)
- Stanley Druckenmiller (Secular growth/Liquidity)
- Michael Burry (Deep value/Contrarian plays)
- David Rubenstein (PE Moats/Institutional stability)
- Vanguard/Bogleheads (Low-cost quality/Diversification)
- Stanley B. Resor/Mutual Fund Observer (Long-term track records)
- Polymarket (Prediction market sentiment)
- WallStreetBets/Bogleheads (Retail flow and fundamental bedrock)

Format the response as a JSON object with:
1. "marketSummary": A precise overview of global macro risks and opportunities.
2. "priorityStocks": Array of 5 stocks with ticker, name, country, 'recommendedBy' (citing specific names from the list above), and 'thesisSnippet'.
3. "newsFeed": Array of 5 news items with headline, source (Bloomberg, WSJ, FT, or Yahoo Finance ONLY), url, time and a one-sentence summary."#;

/// Per-stock analyst prompt, parameterized by the record's metrics
pub fn analysis_prompt(stock: &StockRecord) -> String {
    format!(
        "Quant Analyst Report: {name} ({ticker})\n\
         Analyze using 30 years of historical context.\n\
         Metrics: P/E: {pe}, ROE: {roe}%, ROIC: {roic}%, FCF Yield: {fcf}%.\n\
         \n\
         Output Requirements:\n\
         1. Summary of 30yr fundamental stability.\n\
         2. Valuation rating.\n\
         3. Risk score (1-10).\n\
         4. Thesis points.\n\
         5. Primary Risk Factors.",
        name = stock.name,
        ticker = stock.ticker,
        pe = stock.pe_ratio,
        roe = stock.roe,
        roic = stock.roic,
        fcf = stock.fcf_yield,
    )
}

pub fn institutional_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "marketSummary": { "type": "STRING" },
            "priorityStocks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "ticker": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "country": { "type": "STRING" },
                        "recommendedBy": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "thesisSnippet": { "type": "STRING" }
                    },
                    "required": ["ticker", "name", "country", "recommendedBy", "thesisSnippet"]
                }
            },
            "newsFeed": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "headline": { "type": "STRING" },
                        "source": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "time": { "type": "STRING" },
                        "summary": { "type": "STRING" }
                    },
                    "required": ["headline", "source", "url", "time"]
                }
            }
        },
        "required": ["marketSummary", "priorityStocks", "newsFeed"]
    })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "valuation": { "type": "STRING", "enum": ["Under", "Fair", "Over"] },
            "riskScore": { "type": "NUMBER" },
            "investmentThesis": { "type": "ARRAY", "items": { "type": "STRING" } },
            "risks": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["summary", "valuation", "riskScore", "investmentThesis", "risks"]
    })
}
