//! CSV export of screener views.

use chrono::NaiveDate;
use screener_core::{ScreenerError, ScreenerResult, StockRecord};

pub const CSV_HEADERS: [&str; 10] = [
    "Ticker",
    "Name",
    "Country",
    "Sector",
    "Price",
    "Market Cap",
    "P/E",
    "ROE",
    "ROIC",
    "FCF Yield",
];

/// Date-stamped download name, e.g. `QuantEdge_EOD_2025-01-31.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("QuantEdge_EOD_{}.csv", date.format("%Y-%m-%d"))
}

/// Serializes records as comma-separated text.
///
/// Fields containing delimiters, quotes or line breaks are quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_csv(&self, records: &[StockRecord]) -> ScreenerResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADERS).map_err(export_error)?;

        for r in records {
            writer
                .write_record([
                    r.ticker.clone(),
                    r.name.clone(),
                    r.country.clone(),
                    r.sector.clone(),
                    r.price.to_string(),
                    r.market_cap.to_string(),
                    r.pe_ratio.to_string(),
                    r.roe.to_string(),
                    r.roic.to_string(),
                    r.fcf_yield.to_string(),
                ])
                .map_err(export_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::Export(e.to_string()))
    }
}

fn export_error(e: csv::Error) -> ScreenerError {
    ScreenerError::Export(e.to_string())
}
