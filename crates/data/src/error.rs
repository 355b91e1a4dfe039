use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RetrievalError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for RetrievalError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<reqwest::Error> for RetrievalError {
    fn from(value: reqwest::Error) -> Self {
        if let Some(status) = value.status() {
            return Self::Status(status.as_u16());
        }
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }
        Self::Transport(value.to_string())
    }
}
