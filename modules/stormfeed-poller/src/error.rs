use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PollerError>;

#[derive(Debug, Error)]
pub enum PollerError {
    /// Alerts are fail-closed: any alert error skips the publish.
    #[error("Alert fetch failed: {0}")]
    Alerts(#[from] nws_client::NwsError),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Setup error: {0}")]
    Setup(String),
}
