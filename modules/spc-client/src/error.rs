use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpcError>;

#[derive(Debug, Error)]
pub enum SpcError {
    /// Connection failure or timeout.
    #[error("SPC network error: {0}")]
    Network(String),

    /// MapServer discussion query rejected, by HTTP status or in-band error.
    #[error("MapServer query error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("MapServer response parse error: {0}")]
    Parse(String),

    /// SPC discussion text page answered with a non-success status.
    #[error("SPC text page {url} returned status {status}")]
    TextPage { url: String, status: u16 },
}

impl From<reqwest::Error> for SpcError {
    fn from(err: reqwest::Error) -> Self {
        SpcError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SpcError {
    fn from(err: serde_json::Error) -> Self {
        SpcError::Parse(err.to_string())
    }
}
