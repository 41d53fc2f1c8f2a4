use board_core::SyncError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: HTTP {status}")]
    Status {
        context: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Malformed stream record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Stream record exceeds {limit} bytes without a line break")]
    RecordTooLong { limit: usize },

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
