use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("sequence exhausted: {0}")]
    Exhausted(String),
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BenchError::InvalidInput(msg.into())
    }

    pub fn exhausted<T: Into<String>>(msg: T) -> Self {
        BenchError::Exhausted(msg.into())
    }

    pub fn unknown_candidate<T: Into<String>>(msg: T) -> Self {
        BenchError::UnknownCandidate(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        BenchError::Render(msg.into())
    }
}
