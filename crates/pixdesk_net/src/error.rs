use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Submission was cancelled")]
    Cancelled,

    #[error("Failed to start submission worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Submission worker exited without a result")]
    WorkerLost,
}

impl NetError {
    /// Whether the error came from the abort flag rather than the network.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NetError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
