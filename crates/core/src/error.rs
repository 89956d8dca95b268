//! Error types for ledgerscan table extraction.

use thiserror::Error;

/// Terminal failure of a whole-document extraction.
///
/// A page without a recognisable header is not an error; see
/// [`ColumnSource`](crate::extract::ColumnSource).
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no pages found")]
    NoPagesFound,

    #[error("decoder failure: {0}")]
    Decoder(String),

    #[error("malformed document dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience Result type alias for ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;
