use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no stored entry named `{0}`")]
    NotFound(String),

    #[error("unknown speed unit `{0}`")]
    UnknownUnit(String),

    #[error("invalid result: {0}")]
    InvalidResult(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
