use thiserror::Error;

pub type Result<T> = std::result::Result<T, NwsError>;

#[derive(Debug, Error)]
pub enum NwsError {
    /// Connection failure or timeout.
    #[error("NWS alerts network error: {0}")]
    Network(String),

    #[error("NWS alerts API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("NWS alerts parse error: {0}")]
    Parse(String),

    /// Upstream kept advertising pages: a repeated `next` link or too many pages.
    #[error("NWS alerts pagination error: {0}")]
    Pagination(String),
}

impl From<reqwest::Error> for NwsError {
    fn from(err: reqwest::Error) -> Self {
        NwsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NwsError {
    fn from(err: serde_json::Error) -> Self {
        NwsError::Parse(err.to_string())
    }
}
