use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirerError {
    #[error("Receiver handshake channel closed before a URL was published.")]
    HandshakeClosed,
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid header name '{name}'.")]
    InvalidHeaderName { name: String },
    #[error("Invalid value for header '{name}'.")]
    InvalidHeaderValue { name: String },
}
