pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Uploaded data hash mismatch, expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {0} was not reached yet")]
    PageOutOfRange(usize),
}

impl ClientError {
    /// Same request may succeed when repeated later
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Api { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
