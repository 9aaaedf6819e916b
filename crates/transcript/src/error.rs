#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Unknown language: {0} (expected \"en\" or \"ru\")")]
    UnknownLanguage(String),

    #[error("No negative entity type available: all weighted types are used by this record ({used:?})")]
    SamplingExhausted { used: Vec<String> },

    #[error("Invalid negative sampling probability: {0}")]
    InvalidProbability(f64),

    #[error("Failed to encode answer: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;
