use thiserror::Error;

/// Canonical result for the pull protocol.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Raised when the buffer pool cannot lease the requested capacity.
    // `pullseq-mem` maps its own error type into this variant.
    #[error("Allocation failed: {0}")]
    Allocation(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
