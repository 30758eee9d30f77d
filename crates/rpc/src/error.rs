#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
