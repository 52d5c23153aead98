use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown region group: {0}")]
    UnknownRegion(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type ScreenerResult<T> = Result<T, ScreenerError>;
