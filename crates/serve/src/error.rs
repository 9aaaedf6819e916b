#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Unknown conversation template: {0}")]
    UnknownTemplate(String),

    #[error("Failed to send request to generation service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation request failed: {0}")]
    Status(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, ServeError>;
