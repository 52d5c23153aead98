//! Screener engine
//!
//! Derives ordered, filtered views over the static stock universe, exports
//! views as CSV and produces synthetic price history for charting.

pub mod export;
pub mod history;
pub mod screener;
pub mod universe;

pub use export::{export_filename, CsvExporter, CSV_HEADERS};
pub use history::{generate_history, generate_history_now};
pub use screener::{ScreenView, StockScreener};
pub use universe::{Universe, COUNTRIES, SECTORS};
